//! Bundled demonstration suite.
//!
//! A four-token lexer and the tests that exercise it, plus a numeric smoke test. The CLI's `demo`
//! command registers this suite and runs it end to end.

use crate::engine::{Engine, EngineError};
use crate::report::RunReporter;
use crate::{check_eq, check_near, register};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Int,
    Plus,
    Minus,
    Eof,
}

/// A token and the remaining input it starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Lex the next token from `input`, advancing it past the token.
///
/// Leading spaces are skipped. Any character other than `+` or `-` is a single-character integer.
pub fn lex_next<'a>(input: &mut &'a str) -> Token<'a> {
    let rest = input.trim_start_matches(' ');
    let mut chars = rest.chars();
    let kind = match chars.next() {
        None => TokenKind::Eof,
        Some('+') => TokenKind::Plus,
        Some('-') => TokenKind::Minus,
        Some(_) => TokenKind::Int,
    };
    *input = chars.as_str();
    Token { kind, text: rest }
}

fn lexer_plus() {
    let mut input = "+";
    check_eq!(lex_next(&mut input).kind, TokenKind::Plus);
}

fn lexer_minus() {
    let mut input = "-";
    check_eq!(lex_next(&mut input).kind, TokenKind::Minus);
}

fn lexer_integer() {
    let mut input = "7";
    check_eq!(lex_next(&mut input).kind, TokenKind::Int);
}

fn lexer_sequence() {
    let mut input = "7 + - 3";
    for expected in [
        TokenKind::Int,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Int,
        TokenKind::Eof,
    ] {
        check_eq!(lex_next(&mut input).kind, expected);
    }
}

fn numeric_checks() {
    check_eq!(2, 2);
    check_near!(3.2, 3.2, 1e-9);
}

/// Register the demo suite in display order.
pub fn register_demo_suite<R: RunReporter>(engine: &mut Engine<R>) -> Result<(), EngineError> {
    register!(engine, lexer_plus, "Lexer")?;
    register!(engine, lexer_minus, "Lexer")?;
    register!(engine, lexer_integer, "Lexer")?;
    register!(engine, lexer_sequence, "Lexer")?;
    register!(engine, numeric_checks)?;
    Ok(())
}
