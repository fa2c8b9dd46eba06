//! Combinator-based recursive descent parser for Jade.
//!
//! A parser is a function from [`ParseState`] to a value/error result;
//! [`combinators`] provides the primitives and composition operators, and
//! [`grammar`] builds Jade's concrete syntax on top of them. The public
//! entry points are the [`expression`], [`statement`], [`program`] and
//! [`module`] parser values plus the [`parse_program`]/[`parse_module`]
//! convenience functions, which also require the whole input to be consumed.

mod combinators;
mod error;
mod grammar;
mod state;

pub use combinators::{
    at_least_one, chainl, lazy, many, one_of, optional, sep_by, token_of, BoxedParser,
};
pub use error::{OperandSide, ParseError, ParseResult};
pub use grammar::{expression, factor, module, program, statement, union_declaration, variant};
pub use state::{ParseState, Parser};

use crate::ast::{Module, Program};
use crate::lexer::Token;

/// Parse a complete program, requiring every token to be consumed.
pub fn parse_program(tokens: Vec<Token>) -> ParseResult<Program<()>> {
    let mut state = ParseState::new(tokens);
    let parsed = program().parse(&mut state)?;
    expect_consumed(&mut state)?;
    Ok(parsed)
}

/// Parse a single module, requiring every token to be consumed.
pub fn parse_module(tokens: Vec<Token>) -> ParseResult<Module<()>> {
    let mut state = ParseState::new(tokens);
    let parsed = module().parse(&mut state)?;
    expect_consumed(&mut state)?;
    Ok(parsed)
}

/// Surface the error that stopped the statement loop when input remains.
fn expect_consumed(state: &mut ParseState) -> ParseResult<()> {
    let Some(next) = state.peek().cloned() else {
        return Ok(());
    };
    statement().parse(state)?;
    Err(ParseError::unexpected("end of input", &next))
}
