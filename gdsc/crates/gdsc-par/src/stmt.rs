//! Statement parsing: control flow, blocks, and the
//! dispatch between declarations and plain expression statements.

use gdsc_lex::TokenKind;

use crate::ast::*;
use crate::Parser;

impl<'t> Parser<'t> {
    /// Entry point for each statement at the top of the token stream or
    /// inside a class body. Declarations are also statements, so this is
    /// the same dispatch `parse_statement` uses inside a block — the only
    /// difference is that a bare `class_name`/`extends` is only meaningful
    /// here.
    pub(crate) fn parse_top_level_statement(&mut self) -> Stmt {
        self.collect_annotations();
        match self.peek_kind() {
            TokenKind::ClassName | TokenKind::Extends => self.parse_degenerate_class_stmt(),
            _ => self.parse_statement(),
        }
    }

    /// Consumes any run of `@annotation` tokens (each on its own line)
    /// ahead of a declaration, stashing them for the declaration parser
    /// to pick up.
    fn collect_annotations(&mut self) {
        while let TokenKind::Annotation(name) = self.peek_kind().clone() {
            self.advance();
            self.pending_annotations.push(name.trim_start_matches('@').to_string());
            self.skip_newlines();
        }
    }

    /// A top-level `class_name Foo` or `extends Bar` line, folded into a
    /// single implicit [`ClassDecl`] the semantic analyzer treats as the
    /// file's own class.
    fn parse_degenerate_class_stmt(&mut self) -> Stmt {
        let span = self.span();
        if self.match_kind(&TokenKind::ClassName) {
            let name = self.expect_ident("a class name");
            ClassDecl {
                name: Some(name),
                base_class_name: None,
                members: Vec::new(),
                span,
            }
        } else {
            self.expect(TokenKind::Extends, "'extends'");
            let base = self.expect_ident("a base class name");
            ClassDecl {
                name: None,
                base_class_name: Some(base),
                members: Vec::new(),
                span,
            }
        }
        .into_stmt()
    }

    pub(crate) fn parse_statement(&mut self) -> Stmt {
        self.collect_annotations();
        match self.peek_kind() {
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_in_stmt(),
            TokenKind::Match => self.parse_match_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => {
                let span = self.span();
                self.advance();
                self.finish_simple_stmt();
                Stmt::Break(span)
            }
            TokenKind::Continue => {
                let span = self.span();
                self.advance();
                self.finish_simple_stmt();
                Stmt::Continue(span)
            }
            TokenKind::Pass => {
                let span = self.span();
                self.advance();
                self.finish_simple_stmt();
                Stmt::Pass(span)
            }
            TokenKind::Var | TokenKind::Static => self.parse_var_decl(),
            TokenKind::Const => self.parse_const_decl(),
            TokenKind::Func => self.parse_func_decl(),
            TokenKind::Class => self.parse_class_decl(),
            TokenKind::Signal => self.parse_signal_decl(),
            TokenKind::Enum => self.parse_enum_decl(),
            TokenKind::Indent => {
                // A block can appear wherever a statement is expected once
                // the preceding colon has already been consumed by the
                // caller; an INDENT here without that context is an error,
                // but we recover by parsing it as a block anyway.
                Stmt::Block(self.parse_block())
            }
            _ => {
                let expr = self.parse_expression();
                self.finish_simple_stmt();
                Stmt::Expr(expr)
            }
        }
    }

    /// Consumes the trailing `NEWLINE` (or tolerates EOF/DEDENT) after a
    /// single-line statement.
    fn finish_simple_stmt(&mut self) {
        if matches!(self.peek_kind(), TokenKind::Newline) {
            self.advance();
        } else if !self.is_at_end() && !matches!(self.peek_kind(), TokenKind::Dedent) {
            self.error_at_current(format!(
                "Expected end of statement but found '{}' at line {}",
                self.peek().lexeme,
                self.peek().line
            ));
            self.synchronize();
        }
    }

    /// `":" NEWLINE INDENT statement+ DEDENT` — the suite that follows
    /// every compound statement and declaration header.
    pub(crate) fn parse_block(&mut self) -> Block {
        let span = self.span();
        self.expect(TokenKind::Colon, "':'");

        // A single-line suite, e.g. `if x: return 1`.
        if !matches!(self.peek_kind(), TokenKind::Newline) {
            let stmt = self.parse_statement();
            return Block { statements: vec![stmt], span };
        }

        self.advance(); // NEWLINE
        self.expect(TokenKind::Indent, "an indented block");

        let mut statements = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::Dedent) && !self.is_at_end() {
            statements.push(self.parse_statement());
            self.skip_newlines();
        }
        if matches!(self.peek_kind(), TokenKind::Dedent) {
            self.advance();
        }

        Block { statements, span }
    }

    fn parse_if_stmt(&mut self) -> Stmt {
        let span = self.span();
        self.expect(TokenKind::If, "'if'");
        let cond = self.parse_expression();
        let then_branch = Box::new(Stmt::Block(self.parse_block()));

        let else_branch = match self.peek_kind() {
            TokenKind::Elif => {
                // Recurse: an `elif` behaves exactly like a nested
                // `else: if ...`, keeping one `IfStmt` shape for both.
                let elif_span = self.span();
                self.advance();
                let elif_cond = self.parse_expression();
                let elif_body = Box::new(Stmt::Block(self.parse_block()));
                let elif_else = self.parse_trailing_elif_or_else();
                Some(Box::new(Stmt::If(IfStmt {
                    cond: elif_cond,
                    then_branch: elif_body,
                    else_branch: elif_else,
                    span: elif_span,
                })))
            }
            TokenKind::Else => {
                self.advance();
                Some(Box::new(Stmt::Block(self.parse_block())))
            }
            _ => None,
        };

        Stmt::If(IfStmt { cond, then_branch, else_branch, span })
    }

    /// Handles a run of `elif` clauses followed by an optional final
    /// `else`, called recursively from within `parse_if_stmt`.
    fn parse_trailing_elif_or_else(&mut self) -> Option<Box<Stmt>> {
        match self.peek_kind() {
            TokenKind::Elif => {
                let span = self.span();
                self.advance();
                let cond = self.parse_expression();
                let body = Box::new(Stmt::Block(self.parse_block()));
                let rest = self.parse_trailing_elif_or_else();
                Some(Box::new(Stmt::If(IfStmt { cond, then_branch: body, else_branch: rest, span })))
            }
            TokenKind::Else => {
                self.advance();
                Some(Box::new(Stmt::Block(self.parse_block())))
            }
            _ => None,
        }
    }

    fn parse_while_stmt(&mut self) -> Stmt {
        let span = self.span();
        self.expect(TokenKind::While, "'while'");
        let cond = self.parse_expression();
        let body = Box::new(Stmt::Block(self.parse_block()));
        Stmt::While(WhileStmt { cond, body, span })
    }

    fn parse_for_in_stmt(&mut self) -> Stmt {
        let span = self.span();
        self.expect(TokenKind::For, "'for'");
        let var_name = self.expect_ident("a loop variable name");
        self.expect(TokenKind::In, "'in'");
        let iterable = self.parse_expression();
        let body = Box::new(Stmt::Block(self.parse_block()));
        Stmt::ForIn(ForInStmt { var_name, iterable, body, span })
    }

    fn parse_match_stmt(&mut self) -> Stmt {
        let span = self.span();
        self.expect(TokenKind::Match, "'match'");
        let scrutinee = self.parse_expression();
        self.expect(TokenKind::Colon, "':'");
        self.expect(TokenKind::Newline, "a newline");
        self.expect(TokenKind::Indent, "an indented match body");

        let mut cases = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::Dedent) && !self.is_at_end() {
            let case_span = self.span();
            let pattern = self.parse_expression();
            let body = self.parse_block();
            cases.push(MatchCase { pattern, body, span: case_span });
            self.skip_newlines();
        }
        if matches!(self.peek_kind(), TokenKind::Dedent) {
            self.advance();
        }

        Stmt::Match(MatchStmt { scrutinee, cases, span })
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        let span = self.span();
        self.expect(TokenKind::Return, "'return'");
        let value = if matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.finish_simple_stmt();
        Stmt::Return(ReturnStmt { value, span })
    }
}

/// Folds a bare [`ClassDecl`] into a [`Stmt`]; a small convenience used
/// only by the degenerate top-level `class_name`/`extends` path.
trait IntoStmt {
    fn into_stmt(self) -> Stmt;
}

impl IntoStmt for ClassDecl {
    fn into_stmt(self) -> Stmt {
        Stmt::Class(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ast, parse};
    use gdsc_lex::tokenize;

    fn parse_ok(src: &str) -> ast::Program {
        let (tokens, lh) = tokenize(src);
        assert!(!lh.has_errors(), "{:?}", lh.diagnostics());
        let (program, ph) = parse(&tokens);
        assert!(!ph.has_errors(), "{:?}", ph.diagnostics());
        program
    }

    #[test]
    fn if_elif_else_chain_nests_as_if() {
        let program = parse_ok("if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n");
        match &program.statements[0] {
            ast::Stmt::If(outer) => match outer.else_branch.as_deref() {
                Some(ast::Stmt::If(inner)) => assert!(inner.else_branch.is_some()),
                other => panic!("expected nested elif-as-if, got {:?}", other),
            },
            other => panic!("expected if stmt, got {:?}", other),
        }
    }

    #[test]
    fn while_loop_with_single_line_body() {
        let program = parse_ok("while true: pass\n");
        match &program.statements[0] {
            ast::Stmt::While(w) => match w.body.as_ref() {
                ast::Stmt::Pass(_) => {}
                other => panic!("expected pass, got {:?}", other),
            },
            other => panic!("expected while stmt, got {:?}", other),
        }
    }

    #[test]
    fn for_in_loop_parses_variable_and_iterable() {
        let program = parse_ok("for x in items:\n    pass\n");
        match &program.statements[0] {
            ast::Stmt::ForIn(f) => assert_eq!(f.var_name.as_str(), "x"),
            other => panic!("expected for-in stmt, got {:?}", other),
        }
    }

    #[test]
    fn match_statement_with_multiple_cases() {
        let program = parse_ok("match x:\n    1:\n        pass\n    2:\n        pass\n");
        match &program.statements[0] {
            ast::Stmt::Match(m) => assert_eq!(m.cases.len(), 2),
            other => panic!("expected match stmt, got {:?}", other),
        }
    }

    #[test]
    fn return_without_value() {
        let program = parse_ok("func f():\n    return\n");
        match &program.statements[0] {
            ast::Stmt::Func(f) => match &f.body.statements[0] {
                ast::Stmt::Return(r) => assert!(r.value.is_none()),
                other => panic!("expected return stmt, got {:?}", other),
            },
            other => panic!("expected func decl, got {:?}", other),
        }
    }
}
