//! Type checking for Jade: the [`Type`] model, the threaded [`Context`],
//! generic [`substitute`]-ution, and the checking walk itself.

pub mod check;
mod context;
mod error;
mod function;
mod record;
mod subst;
mod ty;
mod union;

pub use check::{check_expression, check_module, check_program, check_statement, CheckResult};
pub use context::{Context, FunctionEntry, TypeDecl, TypeEntry, VarEntry};
pub use error::TypeError;
pub use subst::substitute;
pub use ty::Type;
