//! Lexer core: dispatch, indentation synthesis, and the public `tokenize`
//! entry point. The character-class-specific scanners live in their own
//! submodules.

mod comment;
mod identifier;
mod number;
mod operator;
mod string;

use gdsc_util::{Handler, Span};
use tracing::trace;

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    handler: Handler,
    token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
}

/// Tokenizes an entire source file, synthesizing `NEWLINE`/`INDENT`/`DEDENT`
/// tokens, and returns the token stream together with the diagnostics
/// accumulated while lexing it. Lexing never aborts early: the token
/// stream is always delivered in full even if errors were recorded.
pub fn tokenize(source: &str) -> (Vec<Token>, Handler) {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    let mut indent_stack = vec![0u32];
    let mut at_line_start = true;
    let mut last_real_kind = TokenKind::Newline;

    loop {
        if at_line_start {
            lexer.handle_indentation(&mut indent_stack, &mut tokens);
            at_line_start = false;
        }

        let tok = lexer.next_token();
        trace!(kind = ?tok.kind, line = tok.line, "lexed token");
        match tok.kind {
            TokenKind::Eof => {
                if !matches!(last_real_kind, TokenKind::Newline) {
                    tokens.push(Token::new(TokenKind::Newline, "", tok.line, tok.column));
                }
                while indent_stack.len() > 1 {
                    indent_stack.pop();
                    tokens.push(Token::new(TokenKind::Dedent, "", tok.line, tok.column));
                }
                tokens.push(tok);
                break;
            }
            TokenKind::Newline => {
                last_real_kind = TokenKind::Newline;
                tokens.push(tok);
                at_line_start = true;
            }
            ref k => {
                last_real_kind = k.clone();
                tokens.push(tok);
            }
        }
    }

    (tokens, lexer.handler)
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            handler: Handler::new(),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    fn span(&self) -> Span {
        Span::new(self.token_start_line, self.token_start_column)
    }

    fn lexeme(&self) -> String {
        self.cursor.slice_from(self.token_start).to_string()
    }

    /// Counts leading spaces/tabs on the current line (tab = 4 spaces, per
    /// the indentation rule below), without consuming anything past the
    /// indentation. A
    /// blank line (next non-whitespace char is `\n`, `#`, or EOF) produces
    /// no INDENT/DEDENT token at all.
    fn handle_indentation(&mut self, indent_stack: &mut Vec<u32>, tokens: &mut Vec<Token>) {
        let mut indent = 0u32;
        loop {
            match self.cursor.current_char() {
                ' ' => {
                    indent += 1;
                    self.cursor.advance();
                }
                '\t' => {
                    indent += 4;
                    self.cursor.advance();
                }
                _ => break,
            }
        }

        let c = self.cursor.current_char();
        if c == '\n' || c == '#' || self.cursor.is_at_end() {
            return;
        }

        let line = self.cursor.line();
        let top = *indent_stack.last().unwrap();
        if indent > top {
            indent_stack.push(indent);
            tokens.push(Token::new(TokenKind::Indent, "", line, 1));
        } else if indent < top {
            while *indent_stack.last().unwrap() > indent {
                indent_stack.pop();
                tokens.push(Token::new(TokenKind::Dedent, "", line, 1));
            }
            if *indent_stack.last().unwrap() != indent {
                self.handler.error("Invalid indentation level", Span::new(line, 1));
                indent_stack.push(indent);
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' => self.cursor.advance(),
                '#' => self.skip_comment(),
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Token::new(TokenKind::Eof, "", self.token_start_line, self.token_start_column);
        }

        let c = self.cursor.current_char();
        if c == '\n' {
            self.cursor.advance();
            return Token::new(TokenKind::Newline, "\n", self.token_start_line, self.token_start_column);
        }
        if c.is_ascii_digit() {
            return self.lex_number();
        }
        if c == '"' || c == '\'' {
            return self.lex_string(c);
        }
        if c == '@' {
            return self.lex_annotation();
        }
        if c.is_ascii_alphabetic() || c == '_' {
            return self.lex_identifier();
        }
        self.lex_operator()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.handler.error(message, self.span());
    }
}

pub(self) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
