//! Abstract syntax tree for Jade.
//!
//! Every node owns a [`Range`] and an `info` annotation. The parser produces
//! `Program<()>`; the type checker rebuilds the tree as `Program<Type>`.

pub mod expression;
pub mod range;
pub mod statement;

pub use expression::{
    AnonymousRecord, Binary, BinaryOp, Expression, FieldAssign, FunctionCall, Grouping, Literal,
    LiteralValue, RecordAccess, RecordInstantiation, Unary, UnaryOp, Variable,
};
pub use range::{Position, Range};
pub use statement::{
    FunctionDeclaration, Parameter, RecordDeclaration, RecordField, Statement, TypeAnnotation,
    UnionDeclaration, VariableDeclaration, Variant, VariantField,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Program<T> {
    pub statements: Vec<Statement<T>>,
    pub range: Range,
}

/// A named module wrapping a statement list. Exposed names are validated
/// against the module body by the semantic analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct Module<T> {
    pub name: String,
    pub exposing: Vec<String>,
    pub statements: Vec<Statement<T>>,
    pub range: Range,
}
