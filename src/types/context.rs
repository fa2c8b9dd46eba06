use std::collections::HashMap;

use super::ty::Type;

/// One variable binding: declared during semantic analysis, typed during
/// checking.
#[derive(Debug, Clone, PartialEq)]
pub struct VarEntry {
    pub name: String,
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    pub name: String,
    /// Parameter names in declaration order; the length is the arity.
    pub params: Vec<String>,
    pub ty: Option<Type>,
}

/// A declared nominal type. `decl` carries the shape needed by the semantic
/// pass; `ty` is filled in by the checker.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    pub name: String,
    pub decl: TypeDecl,
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Record {
        fields: Vec<String>,
        params: Vec<String>,
    },
    Union {
        variants: Vec<String>,
    },
}

/// The environment threaded through semantic analysis and type checking.
///
/// Contexts are copy-on-write values: every `define_*`/`annotate_*` call
/// returns a new context and callers must thread the result forward.
/// Lookups walk the parent chain; redefinition checks consult the current
/// scope only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    vars: HashMap<String, VarEntry>,
    functions: HashMap<String, FunctionEntry>,
    types: HashMap<String, TypeEntry>,
    substitution: HashMap<String, Type>,
    parent: Option<Box<Context>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh scope whose lookups fall back to `self`.
    pub fn child(&self) -> Context {
        Context {
            parent: Some(Box::new(self.clone())),
            ..Default::default()
        }
    }

    pub fn define_var(&self, name: &str) -> Context {
        let mut next = self.clone();
        next.vars.insert(
            name.to_string(),
            VarEntry {
                name: name.to_string(),
                ty: None,
            },
        );
        next
    }

    pub fn annotate_var(&self, name: &str, ty: Type) -> Context {
        let mut next = self.clone();
        if let Some(entry) = next.vars.get_mut(name) {
            entry.ty = Some(ty);
        } else {
            next.vars.insert(
                name.to_string(),
                VarEntry {
                    name: name.to_string(),
                    ty: Some(ty),
                },
            );
        }
        next
    }

    pub fn resolve_var(&self, name: &str) -> Option<&VarEntry> {
        self.vars
            .get(name)
            .or_else(|| self.parent.as_deref().and_then(|p| p.resolve_var(name)))
    }

    pub fn var_in_scope(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn define_fn(&self, name: &str, params: Vec<String>) -> Context {
        let mut next = self.clone();
        next.functions.insert(
            name.to_string(),
            FunctionEntry {
                name: name.to_string(),
                params,
                ty: None,
            },
        );
        next
    }

    pub fn annotate_fn(&self, name: &str, ty: Type) -> Context {
        let mut next = self.clone();
        if let Some(entry) = next.functions.get_mut(name) {
            entry.ty = Some(ty);
        } else {
            next.functions.insert(
                name.to_string(),
                FunctionEntry {
                    name: name.to_string(),
                    params: Vec::new(),
                    ty: Some(ty),
                },
            );
        }
        next
    }

    pub fn resolve_fn(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions
            .get(name)
            .or_else(|| self.parent.as_deref().and_then(|p| p.resolve_fn(name)))
    }

    pub fn fn_in_scope(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn define_type(&self, name: &str, decl: TypeDecl) -> Context {
        let mut next = self.clone();
        next.types.insert(
            name.to_string(),
            TypeEntry {
                name: name.to_string(),
                decl,
                ty: None,
            },
        );
        next
    }

    pub fn annotate_type(&self, name: &str, ty: Type) -> Context {
        let mut next = self.clone();
        if let Some(entry) = next.types.get_mut(name) {
            entry.ty = Some(ty);
        }
        next
    }

    pub fn resolve_type(&self, name: &str) -> Option<&TypeEntry> {
        self.types
            .get(name)
            .or_else(|| self.parent.as_deref().and_then(|p| p.resolve_type(name)))
    }

    pub fn type_in_scope(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// A copy of this context with no active generic bindings. Each record
    /// instantiation starts from one so bindings never leak between
    /// instantiations, including nested ones.
    pub fn without_substitution(&self) -> Context {
        let mut next = self.clone();
        next.substitution.clear();
        next
    }

    /// Bind a generic parameter for the current checking scope.
    pub fn extend_substitution(&self, name: &str, ty: Type) -> Context {
        let mut next = self.clone();
        next.substitution.insert(name.to_string(), ty);
        next
    }

    pub fn resolve_substitution(&self, name: &str) -> Option<&Type> {
        self.substitution.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_resolves_nothing() {
        let ctx = Context::new();
        assert!(ctx.resolve_var("x").is_none());
        assert!(ctx.resolve_fn("f").is_none());
        assert!(ctx.resolve_type("T").is_none());
    }

    #[test]
    fn defining_returns_a_new_context() {
        let ctx = Context::new();
        let extended = ctx.define_var("x");
        assert!(ctx.resolve_var("x").is_none());
        assert!(extended.resolve_var("x").is_some());
    }

    #[test]
    fn annotation_attaches_a_type() {
        let ctx = Context::new().define_var("x").annotate_var("x", Type::Int);
        assert_eq!(ctx.resolve_var("x").and_then(|e| e.ty.clone()), Some(Type::Int));
    }

    #[test]
    fn lookups_walk_the_parent_chain() {
        let parent = Context::new().define_var("x").annotate_var("x", Type::Int);
        let child = parent.child();
        assert!(child.resolve_var("x").is_some());
        // but redefinition checks stay local
        assert!(!child.var_in_scope("x"));
    }

    #[test]
    fn child_bindings_shadow_the_parent() {
        let parent = Context::new().define_var("x").annotate_var("x", Type::Int);
        let child = parent.child().define_var("x").annotate_var("x", Type::String);
        assert_eq!(
            child.resolve_var("x").and_then(|e| e.ty.clone()),
            Some(Type::String)
        );
    }

    #[test]
    fn substitution_is_scoped_to_the_current_context() {
        let ctx = Context::new().extend_substitution("a", Type::Int);
        assert_eq!(ctx.resolve_substitution("a"), Some(&Type::Int));
        assert!(ctx.child().resolve_substitution("a").is_none());
    }

    #[test]
    fn without_substitution_clears_active_bindings() {
        let ctx = Context::new().extend_substitution("a", Type::Int);
        assert!(ctx.without_substitution().resolve_substitution("a").is_none());
    }

    #[test]
    fn function_entries_carry_arity() {
        let ctx = Context::new().define_fn("pair", vec!["a".into(), "b".into()]);
        assert_eq!(ctx.resolve_fn("pair").map(|e| e.params.len()), Some(2));
    }
}
