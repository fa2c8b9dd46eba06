use std::fmt;

use thiserror::Error;

use crate::ast::Position;
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSide {
    Left,
    Right,
}

impl fmt::Display for OperandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandSide::Left => f.write_str("left"),
            OperandSide::Right => f.write_str("right"),
        }
    }
}

/// Parse failures. `Eof` and `UnexpectedToken` are syntactic;
/// `MissingOperand` and `Semantic` describe operator/operand shape problems
/// and outrank syntactic failures when a choice has to pick one error to
/// surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Expected {expected}, got end of input")]
    Eof {
        expected: &'static str,
        position: Position,
    },

    #[error("Expected {expected}, got {found} ({value})")]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
        value: String,
        position: Position,
    },

    #[error("Operator '{operator}' lacks {side}-hand side")]
    MissingOperand {
        operator: String,
        side: OperandSide,
        position: Position,
    },

    #[error("{message}")]
    Semantic { message: String, position: Position },
}

impl ParseError {
    pub fn eof(expected: &'static str, position: Position) -> Self {
        ParseError::Eof { expected, position }
    }

    pub fn unexpected(expected: &'static str, token: &Token) -> Self {
        ParseError::UnexpectedToken {
            expected,
            found: token.kind.name(),
            value: token.value.clone(),
            position: token.position,
        }
    }

    pub fn missing_operand(operator: &Token, side: OperandSide) -> Self {
        ParseError::MissingOperand {
            operator: operator.value.clone(),
            side,
            position: operator.position,
        }
    }

    pub fn semantic(message: impl Into<String>, position: Position) -> Self {
        ParseError::Semantic {
            message: message.into(),
            position,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            ParseError::Eof { position, .. } => *position,
            ParseError::UnexpectedToken { position, .. } => *position,
            ParseError::MissingOperand { position, .. } => *position,
            ParseError::Semantic { position, .. } => *position,
        }
    }

    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            ParseError::MissingOperand { .. } | ParseError::Semantic { .. }
        )
    }

    /// Pick the error worth surfacing when both alternatives of a choice
    /// failed: a semantic error outranks a syntactic one, and within the
    /// same class the failure that got further into the input wins. A full
    /// tie keeps `self`, the earlier alternative.
    pub fn prefer(self, other: ParseError) -> ParseError {
        match (self.is_semantic(), other.is_semantic()) {
            (true, false) => self,
            (false, true) => other,
            _ => {
                if other.position() > self.position() {
                    other
                } else {
                    self
                }
            }
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
