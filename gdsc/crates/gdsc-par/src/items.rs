//! Declaration parsing: `var`, `const`, `func`, `class`,
//! `signal`, `enum`, and the parameter list they share.

use gdsc_lex::TokenKind;

use crate::ast::*;
use crate::Parser;

impl<'t> Parser<'t> {
    pub(crate) fn parse_var_decl(&mut self) -> Stmt {
        let span = self.span();
        let annotations = self.take_pending_annotations();
        let is_static = self.match_kind(&TokenKind::Static);
        self.expect(TokenKind::Var, "'var'");
        let name = self.expect_ident("a variable name");
        let type_name = self.parse_optional_type_annotation();
        let init = if self.match_kind(&TokenKind::Eq) {
            Some(self.parse_expression())
        } else {
            None
        };
        self.finish_simple_decl();
        Stmt::Var(VarDecl { name, type_name, init, is_static, annotations, span })
    }

    pub(crate) fn parse_const_decl(&mut self) -> Stmt {
        let span = self.span();
        let annotations = self.take_pending_annotations();
        self.expect(TokenKind::Const, "'const'");
        let name = self.expect_ident("a constant name");
        let type_name = self.parse_optional_type_annotation();
        self.expect(TokenKind::Eq, "'=' with a constant initializer");
        let init = self.parse_expression();
        self.finish_simple_decl();
        Stmt::Const(ConstDecl { name, type_name, init, annotations, span })
    }

    pub(crate) fn parse_func_decl(&mut self) -> Stmt {
        let span = self.span();
        let annotations = self.take_pending_annotations();
        let is_static = self.match_kind(&TokenKind::Static);
        self.expect(TokenKind::Func, "'func'");
        let name = self.expect_ident("a function name");
        let params = self.parse_params();
        let return_type = self.parse_return_type();
        let body = self.parse_block();
        Stmt::Func(FuncDecl { name, params, return_type, body, is_static, annotations, span })
    }

    /// `"(" ( param ( "," param )* )? ")"`, tolerant of interleaved
    /// `NEWLINE`/`INDENT`/`DEDENT` between parameters, same as argument
    /// lists.
    pub(crate) fn parse_params(&mut self) -> Vec<Param> {
        self.expect(TokenKind::LParen, "'('");
        let mut params = Vec::new();
        self.skip_container_noise();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            let param_span = self.span();
            let name = self.expect_ident("a parameter name");
            let type_name = self.parse_optional_type_annotation();
            let default = if self.match_kind(&TokenKind::Eq) {
                Some(self.parse_expression())
            } else {
                None
            };
            params.push(Param { name, type_name, default, span: param_span });
            self.skip_container_noise();
            if self.match_kind(&TokenKind::Comma) {
                self.skip_container_noise();
            } else {
                break;
            }
        }
        self.skip_container_noise();
        self.expect(TokenKind::RParen, "')'");
        params
    }

    pub(crate) fn parse_class_decl(&mut self) -> Stmt {
        let span = self.span();
        self.expect(TokenKind::Class, "'class'");
        let name = Some(self.expect_ident("a class name"));
        let base_class_name = if self.match_kind(&TokenKind::Extends) {
            Some(self.expect_ident("a base class name"))
        } else {
            None
        };
        self.expect(TokenKind::Colon, "':'");
        self.expect(TokenKind::Newline, "a newline");
        self.expect(TokenKind::Indent, "an indented class body");

        let mut members = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::Dedent) && !self.is_at_end() {
            self.collect_leading_annotations_inline();
            members.push(self.parse_class_member());
            self.skip_newlines();
        }
        if matches!(self.peek_kind(), TokenKind::Dedent) {
            self.advance();
        }

        Stmt::Class(ClassDecl { name, base_class_name, members, span })
    }

    /// A class body member: any declaration, or a nested `class`. Plain
    /// statements are rejected structurally by the semantic analyzer
    /// rather than here, matching the parser's policy of staying
    /// permissive and pushing semantic checks downstream.
    fn parse_class_member(&mut self) -> Stmt {
        match self.peek_kind() {
            TokenKind::Var | TokenKind::Static => self.parse_var_decl(),
            TokenKind::Const => self.parse_const_decl(),
            TokenKind::Func => self.parse_func_decl(),
            TokenKind::Class => self.parse_class_decl(),
            TokenKind::Signal => self.parse_signal_decl(),
            TokenKind::Enum => self.parse_enum_decl(),
            _ => self.parse_statement(),
        }
    }

    /// Like `collect_annotations` in `stmt.rs`, but exposed here so a
    /// class body can gather annotations ahead of each member without
    /// going through `parse_top_level_statement`.
    fn collect_leading_annotations_inline(&mut self) {
        while let TokenKind::Annotation(name) = self.peek_kind().clone() {
            self.advance();
            self.pending_annotations.push(name.trim_start_matches('@').to_string());
            self.skip_newlines();
        }
    }

    pub(crate) fn parse_signal_decl(&mut self) -> Stmt {
        let span = self.span();
        self.expect(TokenKind::Signal, "'signal'");
        let name = self.expect_ident("a signal name");
        let params = if self.check(&TokenKind::LParen) {
            self.parse_params()
        } else {
            Vec::new()
        };
        self.finish_simple_decl();
        Stmt::Signal(SignalDecl { name, params, span })
    }

    pub(crate) fn parse_enum_decl(&mut self) -> Stmt {
        let span = self.span();
        self.expect(TokenKind::Enum, "'enum'");
        let name = if matches!(self.peek_kind(), TokenKind::Ident(_)) {
            Some(self.expect_ident("an enum name"))
        } else {
            None
        };
        self.expect(TokenKind::LBrace, "'{'");
        self.skip_container_noise();
        let mut variants = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let variant_name = self.expect_ident("an enum variant name");
            let value = if self.match_kind(&TokenKind::Eq) {
                Some(self.parse_expression())
            } else {
                None
            };
            variants.push((variant_name, value));
            self.skip_container_noise();
            if self.match_kind(&TokenKind::Comma) {
                self.skip_container_noise();
            } else {
                break;
            }
        }
        self.skip_container_noise();
        self.expect(TokenKind::RBrace, "'}'");
        self.finish_simple_decl();
        Stmt::Enum(EnumDecl { name, variants, span })
    }

    /// Consumes the trailing `NEWLINE` after a declaration that doesn't
    /// end in a block (`var`, `const`, `signal`, `enum`).
    fn finish_simple_decl(&mut self) {
        if matches!(self.peek_kind(), TokenKind::Newline) {
            self.advance();
        } else if !self.is_at_end() && !matches!(self.peek_kind(), TokenKind::Dedent) {
            self.error_at_current(format!(
                "Expected end of declaration but found '{}' at line {}",
                self.peek().lexeme,
                self.peek().line
            ));
            self.synchronize();
        }
    }
}
