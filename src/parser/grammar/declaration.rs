//! Declaration parsers: `let`, `def`, and record/union `type` definitions

use crate::ast::{
    Expression, FunctionDeclaration, Parameter, RecordDeclaration, RecordField, Statement,
    TypeAnnotation, UnionDeclaration, VariableDeclaration, Variant, VariantField,
};
use crate::lexer::{Token, TokenKind};
use crate::parser::combinators::{
    at_least_one, lazy, many, sep_by, token_of, BoxedParser,
};
use crate::parser::error::{ParseError, ParseResult};
use crate::parser::state::{ParseState, Parser};

use super::expression::expression;
use super::literal::{constant, identifier, type_annotation};
use super::statement;

const MIXED_VARIANT: &str = "Mixed variant: cannot combine fields and params";

/// variable_declaration := "let" identifier "=" expression
pub fn variable_declaration() -> BoxedParser<Statement<()>> {
    ((token_of(TokenKind::Let) + (identifier() - token_of(TokenKind::Assign))) + lazy(expression))
        >> |((let_kw, name), expression): ((Token, Token), Expression<()>)| {
            let range = let_kw.range().merge(&expression.range());
            Statement::VariableDeclaration(VariableDeclaration {
                name: name.value,
                expression,
                range,
                info: (),
            })
        }
}

/// parameter := identifier ":" type_annotation
pub fn parameter() -> BoxedParser<Parameter<()>> {
    ((identifier() - token_of(TokenKind::Colon)) + type_annotation())
        >> |(name, type_ref): (Token, TypeAnnotation)| {
            let range = name.range().merge(&type_ref.range());
            Parameter {
                name: name.value,
                type_ref,
                range,
                info: (),
            }
        }
}

/// parameters := [parameter ("," parameter)*]
pub fn parameters() -> BoxedParser<Vec<Parameter<()>>> {
    sep_by(parameter(), token_of(TokenKind::Comma))
}

/// function_declaration :=
///   "def" identifier "(" parameters ")" "->" type_annotation statement+ "end"
pub fn function_declaration() -> BoxedParser<Statement<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let entry = state.position();
        let result = parse_function(state);
        if result.is_err() {
            state.restore(entry);
        }
        result
    })
}

fn parse_function(state: &mut ParseState) -> ParseResult<Statement<()>> {
    let def = token_of(TokenKind::Def).parse(state)?;
    let name = identifier().parse(state)?;
    token_of(TokenKind::LParen).parse(state)?;
    let params = parameters().parse(state)?;
    token_of(TokenKind::RParen).parse(state)?;
    token_of(TokenKind::Arrow).parse(state)?;
    let return_type = type_annotation().parse(state)?;
    let body = at_least_one(lazy(statement)).parse(state)?;
    let end = token_of(TokenKind::End).parse(state)?;
    Ok(Statement::FunctionDeclaration(FunctionDeclaration {
        name: name.value,
        parameters: params,
        return_type,
        body,
        range: def.range().merge(&end.range()),
        info: (),
    }))
}

/// record_declaration :=
///   "type" constant identifier* "=" "{" record_fields "}"
pub fn record_declaration() -> BoxedParser<Statement<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let entry = state.position();
        let result = parse_record(state);
        if result.is_err() {
            state.restore(entry);
        }
        result
    })
}

fn parse_record(state: &mut ParseState) -> ParseResult<Statement<()>> {
    let type_kw = token_of(TokenKind::Type).parse(state)?;
    let name = constant().parse(state)?;
    let params = many(identifier()).parse(state)?;
    token_of(TokenKind::Assign).parse(state)?;
    token_of(TokenKind::LBrace).parse(state)?;
    let fields = sep_by(record_field(), token_of(TokenKind::Comma)).parse(state)?;
    let close = token_of(TokenKind::RBrace).parse(state)?;
    Ok(Statement::RecordDeclaration(RecordDeclaration {
        name: name.value,
        params: params.into_iter().map(|param| param.value).collect(),
        fields,
        range: type_kw.range().merge(&close.range()),
        info: (),
    }))
}

/// record_field := identifier ":" type_annotation
fn record_field() -> BoxedParser<RecordField> {
    ((identifier() - token_of(TokenKind::Colon)) + type_annotation())
        >> |(name, type_ref): (Token, TypeAnnotation)| {
            let range = name.range().merge(&type_ref.range());
            RecordField {
                name: name.value,
                type_ref,
                range,
            }
        }
}

/// union_declaration := "type" constant identifier* "=" variant ("|" variant)*
pub fn union_declaration() -> BoxedParser<Statement<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let entry = state.position();
        let result = parse_union(state);
        if result.is_err() {
            state.restore(entry);
        }
        result
    })
}

fn parse_union(state: &mut ParseState) -> ParseResult<Statement<()>> {
    let type_kw = token_of(TokenKind::Type).parse(state)?;
    let name = constant().parse(state)?;
    let params = many(identifier()).parse(state)?;
    token_of(TokenKind::Assign).parse(state)?;

    let first = variant().parse(state)?;
    let mut variants = vec![first];
    loop {
        let before_pipe = state.position();
        if token_of(TokenKind::Pipe).parse(state).is_err() {
            state.restore(before_pipe);
            break;
        }
        match variant().parse(state) {
            Ok(v) => variants.push(v),
            // a malformed variant kills the whole declaration
            Err(err) if err.is_semantic() => return Err(err),
            Err(_) => break,
        }
    }

    let range = match variants.last() {
        Some(last) => type_kw.range().merge(&last.range),
        None => type_kw.range(),
    };
    Ok(Statement::UnionDeclaration(UnionDeclaration {
        name: name.value,
        params: params.into_iter().map(|param| param.value).collect(),
        variants,
        range,
        info: (),
    }))
}

/// variant := constant ["(" variant_payload ")"]
pub fn variant() -> BoxedParser<Variant> {
    BoxedParser::new(move |state: &mut ParseState| {
        let entry = state.position();
        let result = parse_variant(state);
        if result.is_err() {
            state.restore(entry);
        }
        result
    })
}

fn parse_variant(state: &mut ParseState) -> ParseResult<Variant> {
    let name = constant().parse(state)?;
    let name_range = name.range();

    let before_payload = state.position();
    if token_of(TokenKind::LParen).parse(state).is_err() {
        state.restore(before_payload);
        return Ok(Variant {
            name: name.value,
            fields: Vec::new(),
            params: Vec::new(),
            range: name_range,
        });
    }

    let items = sep_by(field_or_param(), token_of(TokenKind::Comma)).parse(state)?;
    let close = token_of(TokenKind::RParen).parse(state)?;

    let mut fields: Vec<VariantField> = Vec::new();
    let mut params: Vec<TypeAnnotation> = Vec::new();
    for item in items {
        match item {
            PayloadItem::Field(field) => {
                if !params.is_empty() {
                    return Err(ParseError::semantic(MIXED_VARIANT, field.range.start));
                }
                fields.push(field);
            }
            PayloadItem::Param(annotation) => {
                if !fields.is_empty() {
                    return Err(ParseError::semantic(MIXED_VARIANT, annotation.range().start));
                }
                params.push(annotation);
            }
        }
    }

    Ok(Variant {
        name: name.value,
        fields,
        params,
        range: name_range.merge(&close.range()),
    })
}

enum PayloadItem {
    Field(VariantField),
    Param(TypeAnnotation),
}

/// variant_payload item := identifier ":" type_annotation | type_annotation
fn field_or_param() -> BoxedParser<PayloadItem> {
    let field = ((identifier() - token_of(TokenKind::Colon)) + type_annotation())
        >> |(name, type_ref): (Token, TypeAnnotation)| {
            let range = name.range().merge(&type_ref.range());
            PayloadItem::Field(VariantField {
                name: name.value,
                type_ref,
                range,
            })
        };
    let param = type_annotation() >> PayloadItem::Param;
    field | param
}
