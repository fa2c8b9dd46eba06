//! Union type declaration and variant checking.

use indexmap::IndexMap;

use crate::ast::{Statement, UnionDeclaration, Variant};

use super::check::{self, CheckResult};
use super::context::{Context, TypeDecl};
use super::error::TypeError;
use super::ty::Type;

/// Check every variant and register the union type under its declared name.
/// Variant errors accumulate across the declaration.
pub fn check_declaration(
    decl: &UnionDeclaration<()>,
    context: &Context,
) -> CheckResult<(Statement<Type>, Context)> {
    let mut variants = Vec::new();
    let mut errors = Vec::new();
    for variant in &decl.variants {
        match check_variant(variant, &decl.name, context) {
            Ok(ty) => variants.push(ty),
            Err(mut errs) => errors.append(&mut errs),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let ty = Type::Union {
        name: decl.name.clone(),
        variants,
    };
    let next = context
        .define_type(
            &decl.name,
            TypeDecl::Union {
                variants: decl.variants.iter().map(|v| v.name.clone()).collect(),
            },
        )
        .annotate_type(&decl.name, ty.clone());

    Ok((
        Statement::UnionDeclaration(UnionDeclaration {
            name: decl.name.clone(),
            params: decl.params.clone(),
            variants: decl.variants.clone(),
            range: decl.range,
            info: ty,
        }),
        next,
    ))
}

/// A variant without payload checks to a nullary tag; named fields resolve
/// like record fields; positional params resolve in written order.
fn check_variant(variant: &Variant, union_name: &str, context: &Context) -> CheckResult<Type> {
    if variant.fields.is_empty() && variant.params.is_empty() {
        return Ok(Type::VariantNullary {
            name: variant.name.clone(),
            union_name: union_name.to_string(),
        });
    }

    if !variant.fields.is_empty() {
        let mut fields = IndexMap::new();
        let mut errors = Vec::new();
        for field in &variant.fields {
            match check::resolve_annotation(&field.type_ref, context) {
                Some(ty) => {
                    fields.insert(field.name.clone(), ty);
                }
                None => errors.push(TypeError::UndefinedVariantFieldType {
                    field: field.name.clone(),
                    type_name: field.type_ref.name().to_string(),
                    range: field.range,
                }),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        return Ok(Type::VariantRecord {
            name: variant.name.clone(),
            fields,
            union_name: union_name.to_string(),
        });
    }

    let mut params = Vec::new();
    let mut errors = Vec::new();
    for annotation in &variant.params {
        match check::resolve_annotation(annotation, context) {
            Some(ty) => params.push(ty),
            None => errors.push(TypeError::UndefinedVariantParamType {
                variant: variant.name.clone(),
                type_name: annotation.name().to_string(),
                range: annotation.range(),
            }),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(Type::VariantTuple {
        name: variant.name.clone(),
        params,
        union_name: union_name.to_string(),
    })
}
