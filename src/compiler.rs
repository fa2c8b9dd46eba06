//! The compiler driver: source text in, generated Ruby out.
//!
//! Passes run in sequence and the pipeline stops at the first pass that
//! reports any error, surfacing that pass's full error collection. Later
//! passes never see a result that failed an earlier one.

use thiserror::Error;

use crate::analyzer::{self, SemanticError};
use crate::generator;
use crate::lexer::{self, LexError, TokenKind};
use crate::parser::{self, ParseError};
use crate::types::{self, Context, TypeError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{}", display_list(.0))]
    Semantic(Vec<SemanticError>),

    #[error("{}", display_list(.0))]
    Type(Vec<TypeError>),
}

fn display_list<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compile Jade source text to Ruby source text.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = lexer::scan(source)?;
    let is_module = tokens
        .first()
        .is_some_and(|token| token.kind == TokenKind::Module);

    if is_module {
        let module = parser::parse_module(tokens)?;
        let (context, errors) = analyzer::analyze_module(&module, Context::new());
        if !errors.is_empty() {
            return Err(CompileError::Semantic(errors));
        }
        let (typed, _) = types::check_module(&module, context).map_err(CompileError::Type)?;
        Ok(generator::generate_module(&typed))
    } else {
        let program = parser::parse_program(tokens)?;
        let (context, errors) = analyzer::analyze_program(&program, Context::new());
        if !errors.is_empty() {
            return Err(CompileError::Semantic(errors));
        }
        let (typed, _) = types::check_program(&program, context).map_err(CompileError::Type)?;
        Ok(generator::generate_program(&typed))
    }
}
