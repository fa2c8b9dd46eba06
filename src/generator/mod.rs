//! Ruby code generation.
//!
//! A tree-walking renderer over the typed AST with a fixed template per node
//! kind. Record declarations become `Data.define` value classes, unions one
//! tagged `Data.define` per variant, and modules nested Ruby modules.

use crate::ast::{
    BinaryOp, Expression, LiteralValue, Module, Program, Statement, Variant,
};
use crate::types::Type;

const INDENT: &str = "  ";

pub fn generate_program(program: &Program<Type>) -> String {
    program
        .statements
        .iter()
        .map(|statement| generate_statement(statement, 0))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn generate_module(module: &Module<Type>) -> String {
    let segments: Vec<&str> = module.name.split('.').collect();
    let mut lines = Vec::new();
    for (depth, segment) in segments.iter().enumerate() {
        lines.push(format!("{}module {segment}", INDENT.repeat(depth)));
    }
    lines.push(format!("{}extend self", INDENT.repeat(segments.len())));
    for statement in &module.statements {
        lines.push(generate_statement(statement, segments.len()));
    }
    for depth in (0..segments.len()).rev() {
        lines.push(format!("{}end", INDENT.repeat(depth)));
    }
    lines.join("\n") + "\n"
}

fn generate_statement(statement: &Statement<Type>, indents: usize) -> String {
    let prefix = INDENT.repeat(indents);
    match statement {
        Statement::VariableDeclaration(decl) => {
            format!("{prefix}{} = {}", decl.name, generate_expression(&decl.expression))
        }
        Statement::FunctionDeclaration(decl) => {
            let params = decl
                .parameters
                .iter()
                .map(|param| param.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let body = decl
                .body
                .iter()
                .map(|statement| generate_statement(statement, indents + 1))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{prefix}def {}({params})\n{body}\n{prefix}end", decl.name)
        }
        Statement::RecordDeclaration(decl) => {
            let fields = decl
                .fields
                .iter()
                .map(|field| format!(":{}", field.name))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{prefix}{} = Data.define({fields})", decl.name)
        }
        Statement::UnionDeclaration(decl) => decl
            .variants
            .iter()
            .map(|variant| generate_variant(&decl.name, variant, &prefix))
            .collect::<Vec<_>>()
            .join("\n"),
        Statement::Expression(expression) => {
            format!("{prefix}{}", generate_expression(expression))
        }
    }
}

fn generate_variant(union_name: &str, variant: &Variant, prefix: &str) -> String {
    if !variant.fields.is_empty() {
        let fields = variant
            .fields
            .iter()
            .map(|field| format!(":{}", field.name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{prefix}{union_name}_{} = Data.define({fields})", variant.name)
    } else if !variant.params.is_empty() {
        format!("{prefix}{union_name}_{} = Data.define(:tuple)", variant.name)
    } else {
        format!("{prefix}{union_name}_{} = Data.define", variant.name)
    }
}

fn generate_expression(expression: &Expression<Type>) -> String {
    match expression {
        Expression::Literal(literal) => match &literal.value {
            LiteralValue::Int(value) => value.to_string(),
            LiteralValue::Bool(value) => value.to_string(),
            LiteralValue::Str(value) => format!("{value:?}"),
        },
        Expression::Variable(variable) => variable.name.clone(),
        Expression::Unary(unary) => {
            format!("{}{}", unary.operator, generate_expression(&unary.right))
        }
        Expression::Binary(binary) => match binary.operator {
            BinaryOp::Concat => format!(
                "{}.__concat__({})",
                generate_expression(&binary.left),
                generate_expression(&binary.right)
            ),
            operator => format!(
                "{} {operator} {}",
                generate_expression(&binary.left),
                generate_expression(&binary.right)
            ),
        },
        Expression::Grouping(grouping) => {
            format!("({})", generate_expression(&grouping.expression))
        }
        Expression::FunctionCall(call) => {
            let arguments = call
                .arguments
                .iter()
                .map(generate_expression)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}({arguments})", call.name)
        }
        Expression::RecordInstantiation(instantiation) => {
            let fields = instantiation
                .fields
                .iter()
                .map(|field| format!(":{} => {}", field.name, generate_expression(&field.expression)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}.new({fields})", instantiation.name)
        }
        Expression::AnonymousRecord(record) => {
            if record.fields.is_empty() {
                return "{}".to_string();
            }
            let fields = record
                .fields
                .iter()
                .map(|field| format!("{}: {}", field.name, generate_expression(&field.expression)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{ {fields} }}")
        }
        Expression::RecordAccess(access) => {
            format!("{}.send(:{})", generate_expression(&access.target), access.field)
        }
    }
}
