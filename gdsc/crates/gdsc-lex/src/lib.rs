//! gdsc-lex — the lexical analyzer.
//!
//! Turns source text into a token stream, synthesizing the `NEWLINE`/
//! `INDENT`/`DEDENT` tokens an indentation-structured grammar needs. Lexing
//! never stops early: errors are collected into the returned [`Handler`]
//! but the full token stream is always produced regardless.

mod cursor;
mod lexer;
mod token;

pub use lexer::tokenize;
pub use token::{keyword_from_ident, Token, TokenKind};
