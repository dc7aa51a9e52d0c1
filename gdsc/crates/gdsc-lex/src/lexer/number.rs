//! Numeric literal lexing.

use super::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// A run of digits, optionally `.` + digits (a trailing dot with no
    /// following digit is not consumed), optionally `e`/`E` with an
    /// optional sign and digits. Any of `.`/`e`/`E` promotes to a float.
    pub(super) fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut is_float = false;

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_float = true;
            self.cursor.advance(); // '.'
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        if self.cursor.current_char() == 'e' || self.cursor.current_char() == 'E' {
            let mut lookahead = 1;
            if self.cursor.peek_char(1) == '+' || self.cursor.peek_char(1) == '-' {
                lookahead = 2;
            }
            if self.cursor.peek_char(lookahead).is_ascii_digit() {
                is_float = true;
                self.cursor.advance(); // 'e'/'E'
                if self.cursor.current_char() == '+' || self.cursor.current_char() == '-' {
                    self.cursor.advance();
                }
                while self.cursor.current_char().is_ascii_digit() {
                    self.cursor.advance();
                }
            }
        }

        let text = self.lexeme();
        let kind = if is_float {
            TokenKind::Float(text.parse().unwrap_or(0.0))
        } else {
            TokenKind::Int(text.parse().unwrap_or(0))
        };
        Token::new(kind, text, self.token_start_line, self.token_start_column)
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::token::TokenKind;

    fn first_kind(src: &str) -> TokenKind {
        tokenize(src).0.into_iter().next().unwrap().kind
    }

    #[test]
    fn plain_integer() {
        assert_eq!(first_kind("42"), TokenKind::Int(42));
    }

    #[test]
    fn float_with_fraction() {
        assert_eq!(first_kind("3.14"), TokenKind::Float(3.14));
    }

    #[test]
    fn trailing_dot_is_not_consumed() {
        // "5." is Int(5) followed by Dot, not Float(5.0).
        let (tokens, _) = tokenize("5.");
        assert_eq!(tokens[0].kind, TokenKind::Int(5));
        assert_eq!(tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn exponent_without_fraction() {
        assert_eq!(first_kind("1e10"), TokenKind::Float(1e10));
    }

    #[test]
    fn signed_exponent() {
        assert_eq!(first_kind("2.5e-3"), TokenKind::Float(2.5e-3));
    }
}
