//! # Jade compiler front end
//!
//! Jade source text is turned into a validated, fully-typed AST and then
//! rendered as Ruby source text.
//!
//! ## Pipeline
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [Lexer] → Token Stream (kind, value, line/column position)
//!     ↓
//! [Parser] → AST (ast::Program<()>), or the single best ParseError
//!     ↓
//! [Semantic Analyzer] → Context + accumulated SemanticErrors
//!     ↓
//! [Type Checker] → Typed AST (ast::Program<Type>), or accumulated TypeErrors
//!     ↓
//! [Generator] → Ruby source text
//! ```
//!
//! ## Key design decisions
//!
//! ### Combinator-based parsing
//! The parser is built from composable [`parser::BoxedParser`] values with
//! principled backtracking: a failed parser always restores the state to its
//! entry position, choices pick the surfaced error by a priority order that
//! ranks operator-shape errors above plain token mismatches and later
//! failures above earlier ones, and left-associative operator chains promote
//! "operator without operand" failures into dedicated errors.
//!
//! ### Info-annotated AST
//! AST nodes are generic over an `info` annotation: `()` after parsing, the
//! resolved [`types::Type`] after checking. Passes rebuild the tree rather
//! than mutating it.
//!
//! ### Functionally threaded context
//! Scope and substitution state travels through the passes as an explicit
//! copy-on-write [`types::Context`] value instead of global symbol tables.
//! The semantic analyzer accumulates errors across sibling subtrees; the type
//! checker accumulates across independent fields and arguments but stops at
//! the first failure for single-defect checks like return types.
//!
//! ## Getting started
//!
//! Drive the whole pipeline with [`compiler::compile`], or run the passes
//! individually: [`lexer::scan`], [`parser::parse_program`],
//! [`analyzer::analyze_program`], [`types::check_program`],
//! [`generator::generate_program`].

pub mod analyzer;
pub mod ast;
pub mod compiler;
pub mod generator;
pub mod lexer;
pub mod parser;
pub mod types;
