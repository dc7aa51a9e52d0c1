//! String literal lexing.

use super::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// `"`/`'`-delimited string with `\n \t \r \\ \" \'` escapes. Any other
    /// escaped character silently drops the backslash and keeps the
    /// character verbatim. An
    /// unterminated string records an error and stops without consuming a
    /// closing quote.
    pub(super) fn lex_string(&mut self, quote: char) -> Token {
        self.cursor.advance(); // opening quote
        let mut value = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.error("Unterminated string literal");
                break;
            }
            let c = self.cursor.current_char();
            if c == quote {
                self.cursor.advance();
                break;
            }
            if c == '\n' {
                // A newline within a string advances line count;
                // the cursor does this as part of `advance`.
                value.push('\n');
                self.cursor.advance();
                continue;
            }
            if c == '\\' {
                self.cursor.advance();
                let escaped = self.cursor.current_char();
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '\\' => value.push('\\'),
                    '"' => value.push('"'),
                    '\'' => value.push('\''),
                    other => value.push(other),
                }
                self.cursor.advance();
                continue;
            }
            value.push(c);
            self.cursor.advance();
        }

        let lexeme = self.lexeme();
        Token::new(TokenKind::Str(value), lexeme, self.token_start_line, self.token_start_column)
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::token::TokenKind;

    #[test]
    fn recognized_escapes() {
        let (tokens, _) = tokenize(r#""a\nb\tc""#);
        assert_eq!(tokens[0].kind, TokenKind::Str("a\nb\tc".to_string()));
    }

    #[test]
    fn unrecognized_escape_drops_backslash() {
        let (tokens, _) = tokenize(r#""a\qb""#);
        assert_eq!(tokens[0].kind, TokenKind::Str("aqb".to_string()));
    }

    #[test]
    fn unterminated_string_is_an_error_but_stream_continues() {
        let (tokens, handler) = tokenize("\"abc");
        assert!(handler.has_errors());
        assert!(matches!(tokens.last().unwrap().kind, TokenKind::Eof));
    }

    #[test]
    fn single_quote_strings() {
        let (tokens, _) = tokenize("'hi'");
        assert_eq!(tokens[0].kind, TokenKind::Str("hi".to_string()));
    }
}
