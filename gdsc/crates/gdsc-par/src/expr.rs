//! Expression parsing: precedence climbing over the full operator grammar.

use gdsc_lex::TokenKind;
use gdsc_util::Symbol;

use crate::ast::*;
use crate::Parser;

impl<'t> Parser<'t> {
    pub(crate) fn parse_expression(&mut self) -> Expr {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Expr {
        let expr = self.parse_ternary();

        let op = match self.peek_kind() {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::ColonEq => Some(AssignOp::Walrus),
            TokenKind::PlusEq => Some(AssignOp::AddAssign),
            TokenKind::MinusEq => Some(AssignOp::SubAssign),
            TokenKind::StarEq => Some(AssignOp::MulAssign),
            TokenKind::SlashEq => Some(AssignOp::DivAssign),
            TokenKind::PercentEq => Some(AssignOp::ModAssign),
            _ => None,
        };

        if let Some(op) = op {
            let span = expr.span();
            self.advance();
            // Right-associative: `a = b = c` parses as `a = (b = c)`.
            let value = self.parse_assignment();
            Expr::Assign(AssignExpr { op, target: Box::new(expr), value: Box::new(value), span })
        } else {
            expr
        }
    }

    /// `or ( "if" or "else" ternary )?` — `true_expr if cond else
    /// false_expr`.
    fn parse_ternary(&mut self) -> Expr {
        let true_expr = self.parse_or();
        if self.match_kind(&TokenKind::If) {
            let span = true_expr.span();
            let cond = self.parse_or();
            self.expect(TokenKind::Else, "'else' in ternary expression");
            let false_expr = self.parse_ternary();
            Expr::Ternary(TernaryExpr {
                true_expr: Box::new(true_expr),
                cond: Box::new(cond),
                false_expr: Box::new(false_expr),
                span,
            })
        } else {
            true_expr
        }
    }

    fn parse_or(&mut self) -> Expr {
        let mut left = self.parse_and();
        while matches!(self.peek_kind(), TokenKind::Or | TokenKind::PipePipe) {
            let span = left.span();
            self.advance();
            let right = self.parse_and();
            left = Expr::Binary(BinaryExpr { op: BinOp::Or, left: Box::new(left), right: Box::new(right), span });
        }
        left
    }

    fn parse_and(&mut self) -> Expr {
        let mut left = self.parse_equality();
        while matches!(self.peek_kind(), TokenKind::And | TokenKind::AmpAmp) {
            let span = left.span();
            self.advance();
            let right = self.parse_equality();
            left = Expr::Binary(BinaryExpr { op: BinOp::And, left: Box::new(left), right: Box::new(right), span });
        }
        left
    }

    fn parse_equality(&mut self) -> Expr {
        let mut left = self.parse_comparison();
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                _ => break,
            };
            let span = left.span();
            self.advance();
            let right = self.parse_comparison();
            left = Expr::Binary(BinaryExpr { op, left: Box::new(left), right: Box::new(right), span });
        }
        left
    }

    fn parse_comparison(&mut self) -> Expr {
        let mut left = self.parse_term();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Less => BinOp::Lt,
                TokenKind::LessEq => BinOp::Le,
                TokenKind::Greater => BinOp::Gt,
                TokenKind::GreaterEq => BinOp::Ge,
                TokenKind::In => BinOp::In,
                _ => break,
            };
            let span = left.span();
            self.advance();
            let right = self.parse_term();
            left = Expr::Binary(BinaryExpr { op, left: Box::new(left), right: Box::new(right), span });
        }
        left
    }

    fn parse_term(&mut self) -> Expr {
        let mut left = self.parse_factor();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let span = left.span();
            self.advance();
            let right = self.parse_factor();
            left = Expr::Binary(BinaryExpr { op, left: Box::new(left), right: Box::new(right), span });
        }
        left
    }

    fn parse_factor(&mut self) -> Expr {
        let mut left = self.parse_unary();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            let span = left.span();
            self.advance();
            let right = self.parse_unary();
            left = Expr::Binary(BinaryExpr { op, left: Box::new(left), right: Box::new(right), span });
        }
        left
    }

    fn parse_unary(&mut self) -> Expr {
        let op = match self.peek_kind() {
            TokenKind::Not | TokenKind::Bang => Some(UnOp::Not),
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Plus => Some(UnOp::Plus),
            _ => None,
        };
        if let Some(op) = op {
            let span = self.span();
            self.advance();
            let operand = self.parse_unary();
            Expr::Unary(UnaryExpr { op, operand: Box::new(operand), span })
        } else {
            self.parse_call()
        }
    }

    /// `primary ( "(" args ")" | "." ident | "[" expr "]" )*`
    fn parse_call(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    let span = expr.span();
                    self.advance();
                    let args = self.parse_args();
                    self.expect(TokenKind::RParen, "')'");
                    expr = Expr::Call(CallExpr { callee: Box::new(expr), args, span });
                }
                TokenKind::Dot => {
                    let span = expr.span();
                    self.advance();
                    let name = self.expect_ident("a member name");
                    expr = Expr::Member(MemberExpr { object: Box::new(expr), name, span });
                }
                TokenKind::LBracket => {
                    let span = expr.span();
                    self.advance();
                    let index = self.parse_expression();
                    self.expect(TokenKind::RBracket, "']'");
                    expr = Expr::Index(IndexExpr { object: Box::new(expr), index: Box::new(index), span });
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_args(&mut self) -> Vec<Expr> {
        let mut args = Vec::new();
        self.skip_container_noise();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            args.push(self.parse_expression());
            self.skip_container_noise();
            if self.match_kind(&TokenKind::Comma) {
                self.skip_container_noise();
            } else {
                break;
            }
        }
        self.skip_container_noise();
        args
    }

    fn parse_primary(&mut self) -> Expr {
        let span = self.span();
        match self.peek_kind().clone() {
            TokenKind::Int(v) => {
                self.advance();
                Expr::Literal(Literal::Int(v), span)
            }
            TokenKind::Float(v) => {
                self.advance();
                Expr::Literal(Literal::Float(v), span)
            }
            TokenKind::Str(ref s) => {
                let s = s.clone();
                self.advance();
                Expr::Literal(Literal::Str(s), span)
            }
            TokenKind::Bool(v) => {
                self.advance();
                Expr::Literal(Literal::Bool(v), span)
            }
            TokenKind::Null => {
                self.advance();
                Expr::Literal(Literal::Null, span)
            }
            TokenKind::Ident(sym) => {
                self.advance();
                Expr::Ident(sym, span)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression();
                self.expect(TokenKind::RParen, "')'");
                inner
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_dict_literal(),
            TokenKind::Func => self.parse_lambda(),
            _ => {
                let tok = self.advance();
                self.handler.error(
                    format!("Expected an expression but found '{}' at line {}", tok.lexeme, tok.line),
                    span,
                );
                Expr::Literal(Literal::Null, span)
            }
        }
    }

    fn parse_array_literal(&mut self) -> Expr {
        let span = self.span();
        self.expect(TokenKind::LBracket, "'['");
        let mut elements = Vec::new();
        self.skip_container_noise();
        while !self.check(&TokenKind::RBracket) && !self.is_at_end() {
            elements.push(self.parse_expression());
            self.skip_container_noise();
            if self.match_kind(&TokenKind::Comma) {
                self.skip_container_noise();
            } else {
                break;
            }
        }
        self.skip_container_noise();
        self.expect(TokenKind::RBracket, "']'");
        Expr::ArrayLiteral(ArrayLiteralExpr { elements, span })
    }

    fn parse_dict_literal(&mut self) -> Expr {
        let span = self.span();
        self.expect(TokenKind::LBrace, "'{'");
        let mut entries = Vec::new();
        self.skip_container_noise();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let key = self.parse_expression();
            self.expect(TokenKind::Colon, "':'");
            self.skip_container_noise();
            let value = self.parse_expression();
            entries.push((key, value));
            self.skip_container_noise();
            if self.match_kind(&TokenKind::Comma) {
                self.skip_container_noise();
            } else {
                break;
            }
        }
        self.skip_container_noise();
        self.expect(TokenKind::RBrace, "'}'");
        Expr::DictLiteral(DictLiteralExpr { entries, span })
    }

    fn parse_lambda(&mut self) -> Expr {
        let span = self.span();
        self.expect(TokenKind::Func, "'func'");
        if matches!(self.peek_kind(), TokenKind::Ident(_)) {
            self.advance(); // an optional name, kept anonymous in the AST
        }
        let params = self.parse_params();
        let return_type = self.parse_return_type();
        let body = self.parse_block();
        Expr::Lambda(LambdaExpr { params, return_type, body, span })
    }

    /// Skips `NEWLINE`/`INDENT`/`DEDENT` tokens interleaved inside a
    /// container literal or argument list.
    pub(crate) fn skip_container_noise(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent) {
            self.advance();
        }
    }

    pub(crate) fn expect_ident(&mut self, what: &str) -> Symbol {
        match self.peek_kind().clone() {
            TokenKind::Ident(sym) => {
                self.advance();
                sym
            }
            _ => {
                self.error_at_current(format!(
                    "Expected {} but found '{}' at line {}",
                    what,
                    self.peek().lexeme,
                    self.peek().line
                ));
                let placeholder = Symbol::intern("<error>");
                self.advance();
                placeholder
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ast, parse};
    use gdsc_lex::tokenize;

    fn parse_expr_stmt(src: &str) -> ast::Expr {
        let (tokens, lh) = tokenize(src);
        assert!(!lh.has_errors());
        let (program, ph) = parse(&tokens);
        assert!(!ph.has_errors(), "{:?}", ph.diagnostics());
        match program.statements.into_iter().next().unwrap() {
            ast::Stmt::Expr(e) => e,
            other => panic!("expected expr stmt, got {:?}", other),
        }
    }

    #[test]
    fn precedence_mul_before_add() {
        let e = parse_expr_stmt("1 + 2 * 3\n");
        match e {
            ast::Expr::Binary(b) => {
                assert_eq!(b.op, ast::BinOp::Add);
                match *b.right {
                    ast::Expr::Binary(inner) => assert_eq!(inner.op, ast::BinOp::Mul),
                    other => panic!("expected nested mul, got {:?}", other),
                }
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn ternary_true_expr_comes_first() {
        let e = parse_expr_stmt("1 if x else 2\n");
        match e {
            ast::Expr::Ternary(t) => {
                assert_eq!(*t.true_expr, ast::Expr::Literal(ast::Literal::Int(1), t.true_expr.span()));
                assert_eq!(*t.false_expr, ast::Expr::Literal(ast::Literal::Int(2), t.false_expr.span()));
            }
            other => panic!("expected ternary, got {:?}", other),
        }
    }

    #[test]
    fn call_member_index_chain() {
        let e = parse_expr_stmt("a.b(1)[2]\n");
        match e {
            ast::Expr::Index(idx) => match *idx.object {
                ast::Expr::Call(call) => match *call.callee {
                    ast::Expr::Member(member) => assert_eq!(member.name.as_str(), "b"),
                    other => panic!("expected member callee, got {:?}", other),
                },
                other => panic!("expected call, got {:?}", other),
            },
            other => panic!("expected index, got {:?}", other),
        }
    }

    #[test]
    fn trailing_comma_in_array_literal() {
        let e = parse_expr_stmt("[1, 2, 3,]\n");
        match e {
            ast::Expr::ArrayLiteral(a) => assert_eq!(a.elements.len(), 3),
            other => panic!("expected array literal, got {:?}", other),
        }
    }

    #[test]
    fn dict_literal_with_newlines_between_entries() {
        let e = parse_expr_stmt("{\n    \"a\": 1,\n    \"b\": 2,\n}\n");
        match e {
            ast::Expr::DictLiteral(d) => assert_eq!(d.entries.len(), 2),
            other => panic!("expected dict literal, got {:?}", other),
        }
    }

    #[test]
    fn single_line_lambda_body() {
        let e = parse_expr_stmt("x = func(): return 1\n");
        match e {
            ast::Expr::Assign(a) => match *a.value {
                ast::Expr::Lambda(l) => assert_eq!(l.body.statements.len(), 1),
                other => panic!("expected lambda, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn indented_lambda_body() {
        let e = parse_expr_stmt("x = func():\n    var y = 1\n    return y\n");
        match e {
            ast::Expr::Assign(a) => match *a.value {
                ast::Expr::Lambda(l) => assert_eq!(l.body.statements.len(), 2),
                other => panic!("expected lambda, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }
}
