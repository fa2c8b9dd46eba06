//! Semantic analysis: a single walk over the parsed tree that threads a
//! [`Context`] and rejects duplicate or undefined names before any type
//! checking happens.
//!
//! Errors are collected additively across sibling subtrees (both operands
//! of a binary expression are analyzed even when the left one already
//! failed), so one pass surfaces as many problems as possible.

use thiserror::Error;

use crate::ast::{
    Expression, FunctionCall, FunctionDeclaration, Module, Program, Range, RecordDeclaration,
    RecordInstantiation, Statement, TypeAnnotation, UnionDeclaration,
};
use crate::types::{Context, TypeDecl};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String, range: Range },

    #[error("Already defined variable '{name}'")]
    AlreadyDefinedVariable { name: String, range: Range },

    #[error("Undefined function '{name}'")]
    UndefinedFunction { name: String, range: Range },

    #[error("Already defined function '{name}'")]
    AlreadyDefinedFunction { name: String, range: Range },

    #[error("Function '{name}' expects {expected} arguments, got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
        range: Range,
    },

    #[error("Already defined record type '{name}'")]
    AlreadyDefinedRecordType { name: String, range: Range },

    #[error("Already defined type '{name}'")]
    AlreadyDefinedType { name: String, range: Range },

    #[error("Duplicate field '{field}' in record '{record}'")]
    DuplicateField {
        field: String,
        record: String,
        range: Range,
    },

    #[error("Duplicate field '{field}' in anonymous record")]
    DuplicateAnonymousField { field: String, range: Range },

    #[error("Unbound type variable '{name}' for '{record}' definition")]
    UnboundTypeVariable {
        name: String,
        record: String,
        range: Range,
    },

    #[error("Undefined record type '{name}'")]
    UndefinedRecordType { name: String, range: Range },

    #[error("Missing required field '{field}' for record '{record}'")]
    MissingField {
        field: String,
        record: String,
        range: Range,
    },

    #[error("Unknown field '{field}' for record '{record}'")]
    UnknownField {
        field: String,
        record: String,
        range: Range,
    },

    #[error("Duplicate assignment to field '{field}' in record instantiation")]
    DuplicateAssignment { field: String, range: Range },

    #[error("Duplicate variant '{variant}' type '{union}'")]
    DuplicateVariant {
        variant: String,
        union: String,
        range: Range,
    },

    #[error("Duplicate field '{field}' in variant '{variant}'")]
    DuplicateVariantField {
        field: String,
        variant: String,
        range: Range,
    },

    #[error("Cannot find a {name} value to expose")]
    CannotExpose { name: String, range: Range },
}

/// Analyze a program, returning the final context (consumed by the type
/// checker) and every error found.
pub fn analyze_program(program: &Program<()>, context: Context) -> (Context, Vec<SemanticError>) {
    analyze_statements(&program.statements, context)
}

/// Analyze a module body, then validate that every exposed name resolves as
/// a function or type in the resulting context.
pub fn analyze_module(module: &Module<()>, context: Context) -> (Context, Vec<SemanticError>) {
    let (context, mut errors) = analyze_statements(&module.statements, context);
    for name in &module.exposing {
        let found = context.resolve_fn(name).is_some() || context.resolve_type(name).is_some();
        if !found {
            errors.push(SemanticError::CannotExpose {
                name: name.clone(),
                range: module.range,
            });
        }
    }
    (context, errors)
}

fn analyze_statements(
    statements: &[Statement<()>],
    mut context: Context,
) -> (Context, Vec<SemanticError>) {
    let mut errors = Vec::new();
    for statement in statements {
        let (next, mut errs) = analyze_statement(statement, context);
        context = next;
        errors.append(&mut errs);
    }
    (context, errors)
}

pub fn analyze_statement(
    statement: &Statement<()>,
    context: Context,
) -> (Context, Vec<SemanticError>) {
    match statement {
        Statement::VariableDeclaration(decl) => {
            // the declared name is not visible to its own initializer
            let mut errors = analyze_expression(&decl.expression, &context);
            if context.var_in_scope(&decl.name) {
                errors.push(SemanticError::AlreadyDefinedVariable {
                    name: decl.name.clone(),
                    range: decl.range,
                });
                (context, errors)
            } else {
                (context.define_var(&decl.name), errors)
            }
        }
        Statement::FunctionDeclaration(decl) => analyze_function(decl, context),
        Statement::RecordDeclaration(decl) => analyze_record(decl, context),
        Statement::UnionDeclaration(decl) => analyze_union(decl, context),
        Statement::Expression(expression) => {
            let errors = analyze_expression(expression, &context);
            (context, errors)
        }
    }
}

/// The function's own name is defined before its body is analyzed, enabling
/// direct recursion; parameters live in an inner scope only.
fn analyze_function(
    decl: &FunctionDeclaration<()>,
    context: Context,
) -> (Context, Vec<SemanticError>) {
    let mut errors = Vec::new();
    let next = if context.fn_in_scope(&decl.name) {
        errors.push(SemanticError::AlreadyDefinedFunction {
            name: decl.name.clone(),
            range: decl.range,
        });
        context
    } else {
        context.define_fn(
            &decl.name,
            decl.parameters.iter().map(|p| p.name.clone()).collect(),
        )
    };

    let mut inner = next.child();
    for param in &decl.parameters {
        inner = inner.define_var(&param.name);
    }
    let (_, mut body_errors) = analyze_statements(&decl.body, inner);
    errors.append(&mut body_errors);

    (next, errors)
}

fn analyze_record(
    decl: &RecordDeclaration<()>,
    context: Context,
) -> (Context, Vec<SemanticError>) {
    let mut errors = Vec::new();
    if context.type_in_scope(&decl.name) {
        errors.push(SemanticError::AlreadyDefinedRecordType {
            name: decl.name.clone(),
            range: decl.range,
        });
    }

    let pairs: Vec<(&str, Range)> = decl
        .fields
        .iter()
        .map(|field| (field.name.as_str(), field.range))
        .collect();
    for (field, range) in duplicate_names(&pairs) {
        errors.push(SemanticError::DuplicateField {
            field,
            record: decl.name.clone(),
            range,
        });
    }

    for field in &decl.fields {
        if let TypeAnnotation::GenericRef { name, range } = &field.type_ref {
            if !decl.params.contains(name) {
                errors.push(SemanticError::UnboundTypeVariable {
                    name: name.clone(),
                    record: decl.name.clone(),
                    range: *range,
                });
            }
        }
    }

    let next = if context.type_in_scope(&decl.name) {
        context
    } else {
        context.define_type(
            &decl.name,
            TypeDecl::Record {
                fields: decl.fields.iter().map(|field| field.name.clone()).collect(),
                params: decl.params.clone(),
            },
        )
    };
    (next, errors)
}

fn analyze_union(decl: &UnionDeclaration<()>, context: Context) -> (Context, Vec<SemanticError>) {
    let mut errors = Vec::new();
    if context.type_in_scope(&decl.name) {
        errors.push(SemanticError::AlreadyDefinedType {
            name: decl.name.clone(),
            range: decl.range,
        });
    }

    let pairs: Vec<(&str, Range)> = decl
        .variants
        .iter()
        .map(|variant| (variant.name.as_str(), variant.range))
        .collect();
    for (variant, range) in duplicate_names(&pairs) {
        errors.push(SemanticError::DuplicateVariant {
            variant,
            union: decl.name.clone(),
            range,
        });
    }

    for variant in &decl.variants {
        let pairs: Vec<(&str, Range)> = variant
            .fields
            .iter()
            .map(|field| (field.name.as_str(), field.range))
            .collect();
        for (field, range) in duplicate_names(&pairs) {
            errors.push(SemanticError::DuplicateVariantField {
                field,
                variant: variant.name.clone(),
                range,
            });
        }
    }

    let next = if context.type_in_scope(&decl.name) {
        context
    } else {
        context.define_type(
            &decl.name,
            TypeDecl::Union {
                variants: decl.variants.iter().map(|v| v.name.clone()).collect(),
            },
        )
    };
    (next, errors)
}

pub fn analyze_expression(expression: &Expression<()>, context: &Context) -> Vec<SemanticError> {
    match expression {
        Expression::Literal(_) => Vec::new(),
        Expression::Variable(variable) => {
            if context.resolve_var(&variable.name).is_some() {
                Vec::new()
            } else {
                vec![SemanticError::UndefinedVariable {
                    name: variable.name.clone(),
                    range: variable.range,
                }]
            }
        }
        Expression::Unary(unary) => analyze_expression(&unary.right, context),
        Expression::Binary(binary) => {
            let mut errors = analyze_expression(&binary.left, context);
            errors.extend(analyze_expression(&binary.right, context));
            errors
        }
        Expression::Grouping(grouping) => analyze_expression(&grouping.expression, context),
        Expression::FunctionCall(call) => analyze_call(call, context),
        Expression::RecordInstantiation(instantiation) => {
            analyze_instantiation(instantiation, context)
        }
        Expression::AnonymousRecord(anonymous) => {
            let pairs: Vec<(&str, Range)> = anonymous
                .fields
                .iter()
                .map(|field| (field.name.as_str(), field.range))
                .collect();
            let mut errors: Vec<SemanticError> = duplicate_names(&pairs)
                .into_iter()
                .map(|(field, range)| SemanticError::DuplicateAnonymousField { field, range })
                .collect();
            for field in &anonymous.fields {
                errors.extend(analyze_expression(&field.expression, context));
            }
            errors
        }
        Expression::RecordAccess(access) => analyze_expression(&access.target, context),
    }
}

fn analyze_call(call: &FunctionCall<()>, context: &Context) -> Vec<SemanticError> {
    let mut errors = Vec::new();
    match context.resolve_fn(&call.name) {
        None => errors.push(SemanticError::UndefinedFunction {
            name: call.name.clone(),
            range: call.range,
        }),
        Some(entry) => {
            if entry.params.len() != call.arguments.len() {
                errors.push(SemanticError::ArityMismatch {
                    name: call.name.clone(),
                    expected: entry.params.len(),
                    actual: call.arguments.len(),
                    range: call.range,
                });
            }
        }
    }
    for argument in &call.arguments {
        errors.extend(analyze_expression(argument, context));
    }
    errors
}

fn analyze_instantiation(
    instantiation: &RecordInstantiation<()>,
    context: &Context,
) -> Vec<SemanticError> {
    let mut errors = Vec::new();
    match context.resolve_type(&instantiation.name) {
        None => errors.push(SemanticError::UndefinedRecordType {
            name: instantiation.name.clone(),
            range: instantiation.range,
        }),
        Some(entry) => {
            if let TypeDecl::Record {
                fields: declared, ..
            } = &entry.decl
            {
                let pairs: Vec<(&str, Range)> = instantiation
                    .fields
                    .iter()
                    .map(|field| (field.name.as_str(), field.range))
                    .collect();
                for (field, range) in duplicate_names(&pairs) {
                    errors.push(SemanticError::DuplicateAssignment { field, range });
                }
                // missing and unknown fields are both reported
                for declared_field in declared {
                    if !instantiation.fields.iter().any(|f| &f.name == declared_field) {
                        errors.push(SemanticError::MissingField {
                            field: declared_field.clone(),
                            record: instantiation.name.clone(),
                            range: instantiation.range,
                        });
                    }
                }
                for field in &instantiation.fields {
                    if !declared.contains(&field.name) {
                        errors.push(SemanticError::UnknownField {
                            field: field.name.clone(),
                            record: instantiation.name.clone(),
                            range: field.range,
                        });
                    }
                }
            }
        }
    }
    for field in &instantiation.fields {
        errors.extend(analyze_expression(&field.expression, context));
    }
    errors
}

/// Distinct duplicated names paired with the range of their last occurrence.
fn duplicate_names(pairs: &[(&str, Range)]) -> Vec<(String, Range)> {
    let mut duplicates = Vec::new();
    for (index, (name, range)) in pairs.iter().enumerate() {
        let seen_before = pairs[..index].iter().any(|(other, _)| other == name);
        let last = !pairs[index + 1..].iter().any(|(other, _)| other == name);
        if seen_before && last {
            duplicates.push((name.to_string(), *range));
        }
    }
    duplicates
}
