//! An interpreter for Ook!, Brainf**k spelt with orangutan words.
//!
//! Source text goes through three stages: the [`lexer`] strips whitespace and
//! `/* */` comments and keeps one [`lexer::Marker`] per `Ook.`/`Ook?`/`Ook!`
//! token, the [`parser`] pairs markers into instructions and nests loops, and
//! an interpreter walks the result against a growable tape of wrapping bytes.

pub mod bytecode;
pub mod interpreter;
pub mod lexer;
pub mod parser;

use std::io::Write;

use thiserror::Error;

use crate::{
    interpreter::{ast_interpreter::AstInterpreter, Runtime, RuntimeError},
    lexer::{lexer::Lexer, LexerError, Marker},
    parser::{parser::Parser, ParserError, Program},
};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub fn tokenize(source: &str) -> Result<Vec<Marker>, Error> {
    Ok(Lexer::new(source).collect_results()?)
}

pub fn parse(source: &str) -> Result<Program, Error> {
    let markers = tokenize(source)?;
    Ok(Parser::new(&markers).parse_program()?)
}

/// Lex, parse and run `source` on a fresh tape, writing output bytes to `out`.
///
/// Nothing runs unless the whole program lexes and parses. Output written
/// before a runtime error stays written.
pub fn run<W: Write>(source: &str, out: W) -> Result<(), Error> {
    let program = parse(source)?;
    let mut runtime = Runtime::new(out);
    let result = AstInterpreter::new().interpret(&mut runtime, &program);
    Ok(runtime.finish(result)?)
}
