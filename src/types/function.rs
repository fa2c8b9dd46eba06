//! Function declaration and call checking.

use crate::ast::{Expression, FunctionCall, FunctionDeclaration, Parameter, Statement};

use super::check::{self, CheckResult};
use super::context::Context;
use super::error::TypeError;
use super::subst;
use super::ty::Type;

/// Resolve the signature, bind the function's own name before checking the
/// body (direct recursion), then require the last body statement to match
/// the declared return type. Parameters are bound in a child scope and do
/// not leak to the caller; the function's name does.
pub fn check_declaration(
    decl: &FunctionDeclaration<()>,
    context: &Context,
) -> CheckResult<(Statement<Type>, Context)> {
    let mut errors = Vec::new();

    let mut parameters = Vec::new();
    for param in &decl.parameters {
        match check::resolve_annotation(&param.type_ref, context) {
            Some(ty) => parameters.push(Parameter {
                name: param.name.clone(),
                type_ref: param.type_ref.clone(),
                range: param.range,
                info: ty,
            }),
            None => errors.push(TypeError::UndefinedType {
                name: param.type_ref.name().to_string(),
                range: param.type_ref.range(),
            }),
        }
    }

    let return_type = match check::resolve_annotation(&decl.return_type, context) {
        Some(ty) => ty,
        None => {
            errors.push(TypeError::UndefinedType {
                name: decl.return_type.name().to_string(),
                range: decl.return_type.range(),
            });
            return Err(errors);
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let fn_type = Type::function(
        parameters.iter().map(|param| param.info.clone()).collect(),
        return_type.clone(),
    );
    let next = context
        .define_fn(
            &decl.name,
            decl.parameters.iter().map(|p| p.name.clone()).collect(),
        )
        .annotate_fn(&decl.name, fn_type.clone());

    let mut fn_context = next.child();
    for param in &parameters {
        fn_context = fn_context
            .define_var(&param.name)
            .annotate_var(&param.name, param.info.clone());
    }

    let (body, _) = check::check_many(&decl.body, fn_context)?;

    let expected = subst::substitute(&return_type, context);
    if let Some(last) = body.last() {
        if *last.info() != expected {
            return Err(vec![TypeError::ReturnTypeMismatch {
                expected,
                actual: last.info().clone(),
                range: last.range(),
            }]);
        }
    }

    Ok((
        Statement::FunctionDeclaration(FunctionDeclaration {
            name: decl.name.clone(),
            parameters,
            return_type: decl.return_type.clone(),
            body,
            range: decl.range,
            info: fn_type,
        }),
        next,
    ))
}

/// Check every argument independently, then compare argument and parameter
/// types positionally; the first mismatch wins.
pub fn check_call(call: &FunctionCall<()>, context: &Context) -> CheckResult<Expression<Type>> {
    let fn_type = context
        .resolve_fn(&call.name)
        .and_then(|entry| entry.ty.clone());
    let Some(Type::Function {
        parameters,
        return_type,
    }) = fn_type
    else {
        return Err(vec![TypeError::UndefinedFunction {
            name: call.name.clone(),
            range: call.range,
        }]);
    };

    let mut arguments = Vec::new();
    let mut errors = Vec::new();
    for argument in &call.arguments {
        match check::check_expression(argument, context) {
            Ok(typed) => arguments.push(typed),
            Err(mut errs) => errors.append(&mut errs),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    for (index, (argument, parameter)) in arguments.iter().zip(&parameters).enumerate() {
        if argument.info() != parameter {
            return Err(vec![TypeError::ArgumentTypeMismatch {
                index,
                expected: parameter.clone(),
                actual: argument.info().clone(),
                range: argument.range(),
            }]);
        }
    }

    Ok(Expression::FunctionCall(FunctionCall {
        name: call.name.clone(),
        arguments,
        range: call.range,
        info: *return_type,
    }))
}
