use thiserror::Error;

use crate::ast::Range;

use super::ty::Type;

/// Failures raised by the type checking pass. Independent fields and
/// arguments accumulate their errors; return-type and positional-argument
/// checks stop at the first failure because they describe a single defect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String, range: Range },

    #[error("Undefined function '{name}'")]
    UndefinedFunction { name: String, range: Range },

    #[error("Unary '{operator}' not valid for {operand}")]
    InvalidUnaryOperand {
        operator: String,
        operand: Type,
        range: Range,
    },

    #[error("Left operand of '{operator}' must be {expected}, got {actual}")]
    InvalidLeftOperand {
        operator: String,
        /// Single type name, or "one of A, B, C" sorted by type name.
        expected: String,
        actual: Type,
        range: Range,
    },

    #[error("Right operand of '{operator}' must be {expected}, got {actual}")]
    InvalidRightOperand {
        operator: String,
        expected: Type,
        actual: Type,
        range: Range,
    },

    #[error("Undefined type {name}")]
    UndefinedType { name: String, range: Range },

    #[error("Expected return type {expected}, got {actual}")]
    ReturnTypeMismatch {
        expected: Type,
        actual: Type,
        range: Range,
    },

    #[error("Expected argument {index} of type {expected}, got {actual}")]
    ArgumentTypeMismatch {
        index: usize,
        expected: Type,
        actual: Type,
        range: Range,
    },

    #[error("Undefined record type '{name}'")]
    UndefinedRecordType { name: String, range: Range },

    #[error("Field '{field}' expects {expected}, got {actual}")]
    FieldTypeMismatch {
        field: String,
        expected: Type,
        actual: Type,
        range: Range,
    },

    #[error("Generic '{name}' was previously bound to {bound}, but is now expected to be {actual}")]
    GenericMismatch {
        name: String,
        bound: Type,
        actual: Type,
        range: Range,
    },

    #[error("Record {record} does not have a {field} field")]
    UnknownFieldAccess {
        record: String,
        field: String,
        range: Range,
    },

    #[error("{actual} is not a record and cannot be accessed with '.'")]
    NotARecord { actual: Type, range: Range },

    #[error("Undefined type for field {field} {type_name}")]
    UndefinedVariantFieldType {
        field: String,
        type_name: String,
        range: Range,
    },

    #[error("Undefined type for variant {variant} '{type_name}'")]
    UndefinedVariantParamType {
        variant: String,
        type_name: String,
        range: Range,
    },
}
