use super::context::Context;
use super::ty::Type;

/// Resolve generic bindings inside `ty` against the context's substitution
/// map. Primitive types pass through untouched, an unbound generic stays a
/// generic, and records are substituted field by field with any resolved
/// parameter dropped from their parameter list. The result never aliases
/// `ty` and applying the substitution twice changes nothing.
pub fn substitute(ty: &Type, context: &Context) -> Type {
    match ty {
        Type::Int | Type::Bool | Type::String => ty.clone(),
        Type::Generic { name } => context
            .resolve_substitution(name)
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        Type::Record {
            name,
            fields,
            params,
        } => {
            let fields = fields
                .iter()
                .map(|(field, field_ty)| (field.clone(), substitute(field_ty, context)))
                .collect();
            let params = params
                .iter()
                .filter(|param| context.resolve_substitution(param).is_none())
                .cloned()
                .collect();
            Type::Record {
                name: name.clone(),
                fields,
                params,
            }
        }
        _ => ty.clone(),
    }
}
