//! Type-annotation parsing: an identifier optionally
//! followed by `[ identifier ]` for a single generic parameter. The parser
//! keeps only the textual form (e.g. `"Array[String]"`); turning that text
//! into a `TypeInfo` is the semantic analyzer's job.

use gdsc_lex::TokenKind;

use crate::Parser;

impl<'t> Parser<'t> {
    /// Parses `: Type` if a `:` is present, otherwise returns `None`
    /// without consuming anything.
    pub(crate) fn parse_optional_type_annotation(&mut self) -> Option<String> {
        if self.match_kind(&TokenKind::Colon) {
            Some(self.parse_type_name())
        } else {
            None
        }
    }

    /// Parses `-> Type` if an arrow is present, otherwise returns `None`.
    pub(crate) fn parse_return_type(&mut self) -> Option<String> {
        if self.match_kind(&TokenKind::Arrow) {
            Some(self.parse_type_name())
        } else {
            None
        }
    }

    pub(crate) fn parse_type_name(&mut self) -> String {
        let base = self.expect(TokenKind::Ident(dummy_symbol()), "a type name").lexeme;
        if self.match_kind(&TokenKind::LBracket) {
            let inner = self.expect(TokenKind::Ident(dummy_symbol()), "a generic type parameter").lexeme;
            self.expect(TokenKind::RBracket, "']'");
            format!("{}[{}]", base, inner)
        } else {
            base
        }
    }
}

/// `expect` only compares the `TokenKind` discriminant, so the payload of
/// this placeholder is never inspected; it exists purely to pick out the
/// `Ident` variant.
fn dummy_symbol() -> gdsc_util::Symbol {
    gdsc_util::Symbol::intern("")
}

#[cfg(test)]
mod tests {
    use crate::{ast, parse};
    use gdsc_lex::tokenize;

    #[test]
    fn generic_type_annotation_round_trips_as_text() {
        let (tokens, _) = tokenize("var xs: Array[String]\n");
        let (program, handler) = parse(&tokens);
        assert!(!handler.has_errors());
        match &program.statements[0] {
            ast::Stmt::Var(v) => assert_eq!(v.type_name.as_deref(), Some("Array[String]")),
            other => panic!("expected var decl, got {:?}", other),
        }
    }
}
