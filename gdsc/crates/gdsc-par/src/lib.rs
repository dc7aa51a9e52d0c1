//! gdsc-par — the parser.
//!
//! Recursive-descent with explicit precedence climbing over the token
//! stream `gdsc-lex` produces, building the AST in `ast` and reporting
//! recoverable errors into a [`Handler`].

pub mod ast;
mod expr;
mod items;
mod stmt;
mod types;

use gdsc_lex::{Token, TokenKind};
use gdsc_util::{Handler, Span};
use std::mem::discriminant;

pub use ast::Program;

/// Declaration keywords `synchronize` can resynchronize on.
const SYNC_KEYWORDS: &[TokenKind] = &[
    TokenKind::Class,
    TokenKind::Func,
    TokenKind::Var,
    TokenKind::Const,
    TokenKind::For,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Return,
];

/// Top-level loop iterations allowed at the same token index before the
/// stuck-parser heuristic forces an advance.
const STUCK_THRESHOLD: usize = 100;

pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    handler: Handler,
    /// Annotations accumulated ahead of the next declaration.
    pending_annotations: Vec<String>,
}

/// Parses a full token stream into a [`Program`], returning any
/// diagnostics collected along the way.
pub fn parse(tokens: &[Token]) -> (Program, Handler) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.handler)
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Parser { tokens, pos: 0, handler: Handler::new(), pending_annotations: Vec::new() }
    }

    fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        self.skip_newlines();

        let mut stuck_index = self.pos;
        let mut stuck_count = 0usize;

        while !self.is_at_end() {
            if self.pos == stuck_index {
                stuck_count += 1;
                if stuck_count >= STUCK_THRESHOLD {
                    self.error_at_current("Parser made no progress; forcing advance");
                    self.advance();
                    stuck_count = 0;
                }
            } else {
                stuck_index = self.pos;
                stuck_count = 0;
            }

            if self.is_at_end() {
                break;
            }

            statements.push(self.parse_top_level_statement());
            self.skip_newlines();
        }

        Program { statements }
    }

    // -- token stream helpers ------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn span(&self) -> Span {
        Span::new(self.peek().line, self.peek().column)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        discriminant(self.peek_kind()) == discriminant(kind)
    }

    fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the expected kind or records an error naming it and the
    /// current token's line, then advances once regardless so the parser
    /// can never stall on a missing token.
    fn expect(&mut self, kind: TokenKind, what: &str) -> Token {
        if self.check(&kind) {
            self.advance()
        } else {
            self.error_at_current(format!(
                "Expected {} but found '{}' at line {}",
                what,
                self.peek().lexeme,
                self.peek().line
            ));
            self.advance()
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek().kind, TokenKind::Newline) {
            self.advance();
        }
    }

    fn error_at_current(&mut self, message: impl Into<String>) {
        self.handler.error(message, self.span());
    }

    /// Advances to the next `NEWLINE` or the start of a declaration keyword
    /// (see `synchronize` below).
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if matches!(self.peek().kind, TokenKind::Newline) {
                self.advance();
                return;
            }
            if SYNC_KEYWORDS.iter().any(|k| self.check(k)) {
                return;
            }
            self.advance();
        }
    }

    fn take_pending_annotations(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdsc_lex::tokenize;

    fn parse_src(src: &str) -> (Program, Handler) {
        let (tokens, lex_handler) = tokenize(src);
        assert!(!lex_handler.has_errors(), "lex errors: {:?}", lex_handler.diagnostics());
        parse(&tokens)
    }

    #[test]
    fn type_infer_declaration_parses_as_walrus_assignment() {
        let (program, handler) = parse_src("a := 1 + 2\n");
        assert!(!handler.has_errors());
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            ast::Stmt::Expr(ast::Expr::Assign(assign)) => {
                assert_eq!(assign.op, ast::AssignOp::Walrus);
            }
            other => panic!("expected walrus assignment, got {:?}", other),
        }
    }

    #[test]
    fn class_with_forward_method_reference_parses() {
        let (program, handler) = parse_src(
            "class C:\n    func a(): return b()\n    func b(): return 1\n",
        );
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            ast::Stmt::Class(c) => assert_eq!(c.members.len(), 2),
            other => panic!("expected class decl, got {:?}", other),
        }
    }
}
