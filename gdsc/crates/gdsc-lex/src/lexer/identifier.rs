//! Identifier, keyword, and annotation lexing.

use super::{is_ident_continue, Lexer};
use crate::token::{keyword_from_ident, Token, TokenKind};
use gdsc_util::Symbol;

impl<'a> Lexer<'a> {
    /// `[A-Za-z_][A-Za-z0-9_]*`, resolved against the keyword table; falls
    /// back to an interned `Ident` when no keyword matches.
    pub(super) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.lexeme();
        let kind = keyword_from_ident(&text).unwrap_or_else(|| TokenKind::Ident(Symbol::intern(&text)));
        Token::new(kind, text, self.token_start_line, self.token_start_column)
    }

    /// `@` followed by an identifier; the lexeme keeps the leading `@`.
    pub(super) fn lex_annotation(&mut self) -> Token {
        self.cursor.advance(); // consume '@'
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.lexeme();
        Token::new(TokenKind::Annotation(text.clone()), text, self.token_start_line, self.token_start_column)
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::token::TokenKind;
    use gdsc_util::Symbol;

    #[test]
    fn keywords_take_priority_over_identifiers() {
        let (tokens, _) = tokenize("func while");
        assert_eq!(tokens[0].kind, TokenKind::Func);
        assert_eq!(tokens[1].kind, TokenKind::While);
    }

    #[test]
    fn plain_identifier() {
        let (tokens, _) = tokenize("my_var");
        assert_eq!(tokens[0].kind, TokenKind::Ident(Symbol::intern("my_var")));
    }

    #[test]
    fn annotation_lexeme_includes_at() {
        let (tokens, _) = tokenize("@export");
        assert_eq!(tokens[0].kind, TokenKind::Annotation("@export".to_string()));
        assert_eq!(tokens[0].lexeme, "@export");
    }

    #[test]
    fn boolean_and_null_literals() {
        let (tokens, _) = tokenize("true false null");
        assert_eq!(tokens[0].kind, TokenKind::Bool(true));
        assert_eq!(tokens[1].kind, TokenKind::Bool(false));
        assert_eq!(tokens[2].kind, TokenKind::Null);
    }
}
