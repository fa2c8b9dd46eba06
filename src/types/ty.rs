use std::fmt;

use indexmap::IndexMap;

/// The closed set of Jade types.
///
/// Equality is structural: records compare field-by-field and their optional
/// nominal name does not participate, so an instantiation checks to the same
/// type no matter which order its fields were assigned in.
#[derive(Debug, Clone)]
pub enum Type {
    Int,
    Bool,
    String,
    Function {
        parameters: Vec<Type>,
        return_type: Box<Type>,
    },
    Record {
        name: Option<String>,
        fields: IndexMap<String, Type>,
        /// Generic parameter names still unresolved for this record.
        params: Vec<String>,
    },
    Generic {
        name: String,
    },
    Union {
        name: String,
        variants: Vec<Type>,
    },
    VariantNullary {
        name: String,
        union_name: String,
    },
    VariantRecord {
        name: String,
        fields: IndexMap<String, Type>,
        union_name: String,
    },
    VariantTuple {
        name: String,
        params: Vec<Type>,
        union_name: String,
    },
}

impl Type {
    pub fn function(parameters: Vec<Type>, return_type: Type) -> Self {
        Type::Function {
            parameters,
            return_type: Box::new(return_type),
        }
    }

    pub fn record(name: impl Into<String>, fields: IndexMap<String, Type>) -> Self {
        Type::Record {
            name: Some(name.into()),
            fields,
            params: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Type::Generic { name: name.into() }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Int, Type::Int) | (Type::Bool, Type::Bool) | (Type::String, Type::String) => {
                true
            }
            (
                Type::Function {
                    parameters: p1,
                    return_type: r1,
                },
                Type::Function {
                    parameters: p2,
                    return_type: r2,
                },
            ) => p1 == p2 && r1 == r2,
            (
                Type::Record {
                    fields: f1,
                    params: g1,
                    ..
                },
                Type::Record {
                    fields: f2,
                    params: g2,
                    ..
                },
            ) => f1 == f2 && g1 == g2,
            (Type::Generic { name: n1 }, Type::Generic { name: n2 }) => n1 == n2,
            (
                Type::Union {
                    name: n1,
                    variants: v1,
                },
                Type::Union {
                    name: n2,
                    variants: v2,
                },
            ) => n1 == n2 && v1 == v2,
            (
                Type::VariantNullary {
                    name: n1,
                    union_name: u1,
                },
                Type::VariantNullary {
                    name: n2,
                    union_name: u2,
                },
            ) => n1 == n2 && u1 == u2,
            (
                Type::VariantRecord {
                    name: n1,
                    fields: f1,
                    union_name: u1,
                },
                Type::VariantRecord {
                    name: n2,
                    fields: f2,
                    union_name: u2,
                },
            ) => n1 == n2 && f1 == f2 && u1 == u2,
            (
                Type::VariantTuple {
                    name: n1,
                    params: p1,
                    union_name: u1,
                },
                Type::VariantTuple {
                    name: n2,
                    params: p2,
                    union_name: u2,
                },
            ) => n1 == n2 && p1 == p2 && u1 == u2,
            _ => false,
        }
    }
}

impl Eq for Type {}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => f.write_str("Int"),
            Type::Bool => f.write_str("Bool"),
            Type::String => f.write_str("String"),
            Type::Function {
                parameters,
                return_type,
            } => {
                if parameters.is_empty() {
                    return write!(f, "{return_type}");
                }
                let params: Vec<String> = parameters.iter().map(ToString::to_string).collect();
                write!(f, "{} -> {return_type}", params.join(", "))
            }
            Type::Record {
                name: Some(name), ..
            } => f.write_str(name),
            Type::Record {
                name: None, fields, ..
            } => {
                let rendered: Vec<String> = fields
                    .iter()
                    .map(|(field, ty)| format!("{field}: {ty}"))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Type::Generic { name } => f.write_str(name),
            Type::Union { name, .. } => f.write_str(name),
            Type::VariantNullary {
                name, union_name, ..
            }
            | Type::VariantRecord {
                name, union_name, ..
            }
            | Type::VariantTuple {
                name, union_name, ..
            } => write!(f, "{union_name}.{name}"),
        }
    }
}
