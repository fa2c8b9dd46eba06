//! The type checking walk.
//!
//! Statements check to `(typed statement, new context)` so later statements
//! see earlier bindings; expressions are pure against a borrowed context.
//! Operator rules live in the fixed tables below.

use crate::ast::{
    Binary, BinaryOp, Expression, Grouping, Literal, LiteralValue, Module, Program, Statement,
    TypeAnnotation, Unary, UnaryOp, Variable, VariableDeclaration,
};

use super::context::Context;
use super::error::TypeError;
use super::ty::Type;
use super::{function, record, union};

pub type CheckResult<T> = Result<T, Vec<TypeError>>;

/// Type check a whole program, threading the context across statements.
pub fn check_program(program: &Program<()>, context: Context) -> CheckResult<(Program<Type>, Context)> {
    let (statements, context) = check_many(&program.statements, context)?;
    Ok((
        Program {
            statements,
            range: program.range,
        },
        context,
    ))
}

/// Type check a module body the same way a program is checked.
pub fn check_module(module: &Module<()>, context: Context) -> CheckResult<(Module<Type>, Context)> {
    let (statements, context) = check_many(&module.statements, context)?;
    Ok((
        Module {
            name: module.name.clone(),
            exposing: module.exposing.clone(),
            statements,
            range: module.range,
        },
        context,
    ))
}

/// Check a statement list. Errors accumulate across items; each failing
/// statement leaves the context of the last good one in effect.
pub(crate) fn check_many(
    statements: &[Statement<()>],
    context: Context,
) -> CheckResult<(Vec<Statement<Type>>, Context)> {
    let mut checked = Vec::new();
    let mut errors = Vec::new();
    let mut context = context;
    for statement in statements {
        match check_statement(statement, &context) {
            Ok((typed, next)) => {
                checked.push(typed);
                context = next;
            }
            Err(mut errs) => errors.append(&mut errs),
        }
    }
    if errors.is_empty() {
        Ok((checked, context))
    } else {
        Err(errors)
    }
}

pub fn check_statement(
    statement: &Statement<()>,
    context: &Context,
) -> CheckResult<(Statement<Type>, Context)> {
    match statement {
        Statement::VariableDeclaration(decl) => {
            let expression = check_expression(&decl.expression, context)?;
            let ty = expression.info().clone();
            let next = context
                .define_var(&decl.name)
                .annotate_var(&decl.name, ty.clone());
            Ok((
                Statement::VariableDeclaration(VariableDeclaration {
                    name: decl.name.clone(),
                    expression,
                    range: decl.range,
                    info: ty,
                }),
                next,
            ))
        }
        Statement::FunctionDeclaration(decl) => function::check_declaration(decl, context),
        Statement::RecordDeclaration(decl) => record::check_declaration(decl, context),
        Statement::UnionDeclaration(decl) => union::check_declaration(decl, context),
        Statement::Expression(expression) => {
            let typed = check_expression(expression, context)?;
            Ok((Statement::Expression(typed), context.clone()))
        }
    }
}

pub fn check_expression(
    expression: &Expression<()>,
    context: &Context,
) -> CheckResult<Expression<Type>> {
    match expression {
        Expression::Literal(literal) => Ok(Expression::Literal(Literal {
            value: literal.value.clone(),
            range: literal.range,
            info: literal_type(&literal.value),
        })),
        Expression::Variable(variable) => check_variable(variable, context),
        Expression::Unary(unary) => check_unary(unary, context),
        Expression::Binary(binary) => check_binary(binary, context),
        Expression::Grouping(grouping) => {
            let inner = check_expression(&grouping.expression, context)?;
            let ty = inner.info().clone();
            Ok(Expression::Grouping(Grouping {
                expression: Box::new(inner),
                range: grouping.range,
                info: ty,
            }))
        }
        Expression::FunctionCall(call) => function::check_call(call, context),
        Expression::RecordInstantiation(instantiation) => {
            record::check_instantiation(instantiation, context)
        }
        Expression::AnonymousRecord(anonymous) => record::check_anonymous(anonymous, context),
        Expression::RecordAccess(access) => record::check_access(access, context),
    }
}

fn literal_type(value: &LiteralValue) -> Type {
    match value {
        LiteralValue::Int(_) => Type::Int,
        LiteralValue::Bool(_) => Type::Bool,
        LiteralValue::Str(_) => Type::String,
    }
}

fn check_variable(variable: &Variable<()>, context: &Context) -> CheckResult<Expression<Type>> {
    // an unannotated entry means the earlier passes went wrong; report it
    // as an ordinary error rather than crashing
    let ty = context
        .resolve_var(&variable.name)
        .and_then(|entry| entry.ty.clone());
    match ty {
        Some(ty) => Ok(Expression::Variable(Variable {
            name: variable.name.clone(),
            range: variable.range,
            info: ty,
        })),
        None => Err(vec![TypeError::UndefinedVariable {
            name: variable.name.clone(),
            range: variable.range,
        }]),
    }
}

fn check_unary(unary: &Unary<()>, context: &Context) -> CheckResult<Expression<Type>> {
    let operand = check_expression(&unary.right, context)?;
    match unary_result(unary.operator, operand.info()) {
        Some(ty) => Ok(Expression::Unary(Unary {
            operator: unary.operator,
            right: Box::new(operand),
            range: unary.range,
            info: ty,
        })),
        None => Err(vec![TypeError::InvalidUnaryOperand {
            operator: unary.operator.to_string(),
            operand: operand.info().clone(),
            range: unary.range,
        }]),
    }
}

fn check_binary(binary: &Binary<()>, context: &Context) -> CheckResult<Expression<Type>> {
    // both operands are checked even when the left one fails
    let left = check_expression(&binary.left, context);
    let right = check_expression(&binary.right, context);
    let (left, right) = match (left, right) {
        (Ok(left), Ok(right)) => (left, right),
        (left, right) => {
            let mut errors = Vec::new();
            if let Err(mut errs) = left {
                errors.append(&mut errs);
            }
            if let Err(mut errs) = right {
                errors.append(&mut errs);
            }
            return Err(errors);
        }
    };

    let admissible = admissible_left(binary.operator);
    if !admissible.contains(left.info()) {
        return Err(vec![TypeError::InvalidLeftOperand {
            operator: binary.operator.to_string(),
            expected: expected_display(&admissible),
            actual: left.info().clone(),
            range: binary.left.range(),
        }]);
    }

    match binary_result(binary.operator, left.info(), right.info()) {
        Some(ty) => Ok(Expression::Binary(Binary {
            left: Box::new(left),
            operator: binary.operator,
            right: Box::new(right),
            range: binary.range,
            info: ty,
        })),
        None => Err(vec![TypeError::InvalidRightOperand {
            operator: binary.operator.to_string(),
            expected: expected_right(binary.operator, left.info()),
            actual: right.info().clone(),
            range: binary.right.range(),
        }]),
    }
}

fn unary_result(operator: UnaryOp, operand: &Type) -> Option<Type> {
    match (operator, operand) {
        (UnaryOp::Not, Type::Bool) => Some(Type::Bool),
        (UnaryOp::Neg, Type::Int) => Some(Type::Int),
        _ => None,
    }
}

/// Admissible left operand types per operator, sorted by type name.
fn admissible_left(operator: BinaryOp) -> Vec<Type> {
    match operator {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => vec![Type::Int],
        BinaryOp::Concat => vec![Type::String],
        BinaryOp::Eq | BinaryOp::NotEq => vec![Type::Bool, Type::Int, Type::String],
        BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => vec![Type::Int],
    }
}

fn binary_result(operator: BinaryOp, left: &Type, right: &Type) -> Option<Type> {
    match operator {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            (left == &Type::Int && right == &Type::Int).then_some(Type::Int)
        }
        BinaryOp::Concat => (left == &Type::String && right == &Type::String).then_some(Type::String),
        BinaryOp::Eq | BinaryOp::NotEq => (left == right).then_some(Type::Bool),
        BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => {
            (left == &Type::Int && right == &Type::Int).then_some(Type::Bool)
        }
    }
}

/// Once the left operand is accepted the operator fixes what the right-hand
/// side must be.
fn expected_right(operator: BinaryOp, left: &Type) -> Type {
    match operator {
        BinaryOp::Eq | BinaryOp::NotEq => left.clone(),
        BinaryOp::Concat => Type::String,
        _ => Type::Int,
    }
}

fn expected_display(types: &[Type]) -> String {
    if types.len() == 1 {
        return types[0].to_string();
    }
    let names: Vec<String> = types.iter().map(ToString::to_string).collect();
    format!("one of {}", names.join(", "))
}

/// Resolve a written type reference. Lowercase names become generic
/// placeholders; capitalized names resolve against the built-ins and the
/// context's type scope.
pub(crate) fn resolve_annotation(annotation: &TypeAnnotation, context: &Context) -> Option<Type> {
    match annotation {
        TypeAnnotation::GenericRef { name, .. } => Some(Type::generic(name.clone())),
        TypeAnnotation::TypeRef { name, .. } => match name.as_str() {
            "Int" => Some(Type::Int),
            "Bool" => Some(Type::Bool),
            "String" => Some(Type::String),
            _ => context
                .resolve_type(name)
                .and_then(|entry| entry.ty.clone()),
        },
    }
}
