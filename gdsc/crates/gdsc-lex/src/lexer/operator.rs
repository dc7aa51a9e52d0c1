//! Operator and delimiter lexing.

use super::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Multi-character operators are resolved by one character of
    /// lookahead; everything else falls back to a single-character token.
    /// Unrecognized characters emit an `Invalid` token and an error.
    pub(super) fn lex_operator(&mut self) -> Token {
        use TokenKind::*;

        let c = self.cursor.current_char();
        self.cursor.advance();

        let kind = match c {
            '(' => LParen,
            ')' => RParen,
            '[' => LBracket,
            ']' => RBracket,
            '{' => LBrace,
            '}' => RBrace,
            ',' => Comma,
            ';' => Semicolon,
            '.' => Dot,
            ':' => {
                if self.cursor.match_char('=') {
                    ColonEq
                } else {
                    Colon
                }
            }
            '+' => {
                if self.cursor.match_char('=') {
                    PlusEq
                } else {
                    Plus
                }
            }
            '-' => {
                if self.cursor.match_char('=') {
                    MinusEq
                } else if self.cursor.match_char('>') {
                    Arrow
                } else {
                    Minus
                }
            }
            '*' => {
                if self.cursor.match_char('=') {
                    StarEq
                } else {
                    Star
                }
            }
            '/' => {
                if self.cursor.match_char('=') {
                    SlashEq
                } else {
                    Slash
                }
            }
            '%' => {
                if self.cursor.match_char('=') {
                    PercentEq
                } else {
                    Percent
                }
            }
            '=' => {
                if self.cursor.match_char('=') {
                    EqEq
                } else {
                    Eq
                }
            }
            '!' => {
                if self.cursor.match_char('=') {
                    NotEq
                } else {
                    Bang
                }
            }
            '<' => {
                if self.cursor.match_char('=') {
                    LessEq
                } else if self.cursor.match_char('<') {
                    Shl
                } else {
                    Less
                }
            }
            '>' => {
                if self.cursor.match_char('=') {
                    GreaterEq
                } else if self.cursor.match_char('>') {
                    Shr
                } else {
                    Greater
                }
            }
            '&' => {
                if self.cursor.match_char('&') {
                    AmpAmp
                } else {
                    Amp
                }
            }
            '|' => {
                if self.cursor.match_char('|') {
                    PipePipe
                } else {
                    Pipe
                }
            }
            '^' => Caret,
            '~' => Tilde,
            other => {
                self.error(format!("Unexpected character '{}'", other));
                Invalid
            }
        };

        Token::new(kind, self.lexeme(), self.token_start_line, self.token_start_column)
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::token::TokenKind;

    #[test]
    fn multi_char_operators_win_over_prefixes() {
        let got: Vec<_> = tokenize(":= == != <= >= << >> -> += -= *= /= %= && ||")
            .0
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !matches!(k, TokenKind::Newline | TokenKind::Eof))
            .collect();
        use TokenKind::*;
        assert_eq!(
            got,
            vec![
                ColonEq, EqEq, NotEq, LessEq, GreaterEq, Shl, Shr, Arrow, PlusEq, MinusEq, StarEq,
                SlashEq, PercentEq, AmpAmp, PipePipe,
            ]
        );
    }

    #[test]
    fn unknown_character_is_invalid_and_errors() {
        let (tokens, handler) = tokenize("`");
        assert!(handler.has_errors());
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
    }
}
