//! Record declaration, instantiation, and field access checking.

use indexmap::IndexMap;

use crate::ast::{
    AnonymousRecord, Expression, FieldAssign, RecordAccess, RecordDeclaration,
    RecordInstantiation, Statement,
};

use super::check::{self, CheckResult};
use super::context::{Context, TypeDecl};
use super::error::TypeError;
use super::subst;
use super::ty::Type;

/// Resolve every field's type reference and register the record type under
/// its declared name, carrying the generic parameter list for later
/// instantiation.
pub fn check_declaration(
    decl: &RecordDeclaration<()>,
    context: &Context,
) -> CheckResult<(Statement<Type>, Context)> {
    let mut fields = IndexMap::new();
    let mut errors = Vec::new();
    for field in &decl.fields {
        match check::resolve_annotation(&field.type_ref, context) {
            Some(ty) => {
                fields.insert(field.name.clone(), ty);
            }
            None => errors.push(TypeError::UndefinedType {
                name: field.type_ref.name().to_string(),
                range: field.type_ref.range(),
            }),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let ty = Type::Record {
        name: Some(decl.name.clone()),
        fields,
        params: decl.params.clone(),
    };
    let next = context
        .define_type(
            &decl.name,
            TypeDecl::Record {
                fields: decl.fields.iter().map(|field| field.name.clone()).collect(),
                params: decl.params.clone(),
            },
        )
        .annotate_type(&decl.name, ty.clone());

    Ok((
        Statement::RecordDeclaration(RecordDeclaration {
            name: decl.name.clone(),
            params: decl.params.clone(),
            fields: decl.fields.clone(),
            range: decl.range,
            info: ty,
        }),
        next,
    ))
}

/// Check an instantiation against the declared record type. Generic bindings
/// live in a context scoped to this one instantiation, so two
/// instantiations never see each other's substitutions. Field errors
/// accumulate.
pub fn check_instantiation(
    instantiation: &RecordInstantiation<()>,
    context: &Context,
) -> CheckResult<Expression<Type>> {
    let undefined = || {
        vec![TypeError::UndefinedRecordType {
            name: instantiation.name.clone(),
            range: instantiation.range,
        }]
    };
    let Some(record_type) = context
        .resolve_type(&instantiation.name)
        .and_then(|entry| entry.ty.clone())
    else {
        return Err(undefined());
    };
    let Type::Record {
        fields: declared, ..
    } = record_type.clone()
    else {
        return Err(undefined());
    };

    let mut scoped = context.without_substitution();
    let mut checked = Vec::new();
    let mut errors = Vec::new();
    for field in &instantiation.fields {
        match check_field_assignment(field, &scoped, &declared) {
            Ok((typed, next)) => {
                checked.push(typed);
                scoped = next;
            }
            Err(mut errs) => errors.append(&mut errs),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let ty = subst::substitute(&record_type, &scoped);
    Ok(Expression::RecordInstantiation(RecordInstantiation {
        name: instantiation.name.clone(),
        fields: checked,
        range: instantiation.range,
        info: ty,
    }))
}

fn check_field_assignment(
    field: &FieldAssign<()>,
    context: &Context,
    declared: &IndexMap<String, Type>,
) -> CheckResult<(FieldAssign<Type>, Context)> {
    let expression = check::check_expression(&field.expression, context)?;
    let actual = expression.info().clone();

    let next = match declared.get(&field.name) {
        Some(Type::Generic { name }) => match context.resolve_substitution(name) {
            // the first assignment binds the generic for the rest of this
            // instantiation
            None => context.extend_substitution(name, actual.clone()),
            Some(bound) if *bound == actual => context.clone(),
            Some(bound) => {
                return Err(vec![TypeError::GenericMismatch {
                    name: name.clone(),
                    bound: bound.clone(),
                    actual,
                    range: field.range,
                }]);
            }
        },
        Some(expected) if *expected == actual => context.clone(),
        Some(expected) => {
            return Err(vec![TypeError::FieldTypeMismatch {
                field: field.name.clone(),
                expected: expected.clone(),
                actual,
                range: field.range,
            }]);
        }
        // unknown field names were already reported by the semantic pass
        None => context.clone(),
    };

    Ok((
        FieldAssign {
            name: field.name.clone(),
            expression,
            range: field.range,
            info: actual,
        },
        next,
    ))
}

/// An anonymous record types as a nameless record of its field expression
/// types, in written order.
pub fn check_anonymous(
    anonymous: &AnonymousRecord<()>,
    context: &Context,
) -> CheckResult<Expression<Type>> {
    let mut fields = IndexMap::new();
    let mut checked = Vec::new();
    let mut errors = Vec::new();
    for field in &anonymous.fields {
        match check::check_expression(&field.expression, context) {
            Ok(expression) => {
                let ty = expression.info().clone();
                fields.insert(field.name.clone(), ty.clone());
                checked.push(FieldAssign {
                    name: field.name.clone(),
                    expression,
                    range: field.range,
                    info: ty,
                });
            }
            Err(mut errs) => errors.append(&mut errs),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let ty = Type::Record {
        name: None,
        fields,
        params: Vec::new(),
    };
    Ok(Expression::AnonymousRecord(AnonymousRecord {
        fields: checked,
        range: anonymous.range,
        info: ty,
    }))
}

/// `target.field` requires the target to be a record declaring that field.
pub fn check_access(
    access: &RecordAccess<()>,
    context: &Context,
) -> CheckResult<Expression<Type>> {
    let target = check::check_expression(&access.target, context)?;
    let target_ty = target.info().clone();

    let ty = match &target_ty {
        Type::Record { name, fields, .. } => match fields.get(&access.field) {
            Some(ty) => ty.clone(),
            None => {
                let record = name.clone().unwrap_or_else(|| target_ty.to_string());
                return Err(vec![TypeError::UnknownFieldAccess {
                    record,
                    field: access.field.clone(),
                    range: access.range,
                }]);
            }
        },
        other => {
            return Err(vec![TypeError::NotARecord {
                actual: other.clone(),
                range: access.range,
            }]);
        }
    };

    Ok(Expression::RecordAccess(RecordAccess {
        target: Box::new(target),
        field: access.field.clone(),
        range: access.range,
        info: ty,
    }))
}
