//! Comment skipping: `#` to end of line, not consuming the
//! newline itself so it is still emitted as its own token.

use super::Lexer;

impl<'a> Lexer<'a> {
    pub(super) fn skip_comment(&mut self) {
        while self.cursor.current_char() != '\n' && !self.cursor.is_at_end() {
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::token::TokenKind;

    #[test]
    fn comment_is_skipped_but_newline_survives() {
        let (tokens, _) = tokenize("pass # a comment\npass\n");
        let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Pass, TokenKind::Newline, TokenKind::Pass, TokenKind::Newline, TokenKind::Eof]);
    }
}
