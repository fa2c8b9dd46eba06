//! Literal and name parsers for the Jade grammar

use crate::ast::{Expression, Literal, LiteralValue, TypeAnnotation, Variable};
use crate::lexer::{Token, TokenKind};
use crate::parser::combinators::{one_of, token_of, BoxedParser};

/// literal := int | bool | string
pub fn literal() -> BoxedParser<Expression<()>> {
    let int = token_of(TokenKind::Int) >> |tok: Token| {
        let value = tok.value.parse().expect("the lexer only emits digits here");
        literal_node(&tok, LiteralValue::Int(value))
    };
    let boolean = token_of(TokenKind::Bool)
        >> |tok: Token| literal_node(&tok, LiteralValue::Bool(tok.value == "True"));
    let string = token_of(TokenKind::Str) >> |tok: Token| {
        let value = tok.value.clone();
        literal_node(&tok, LiteralValue::Str(value))
    };
    one_of(vec![int, boolean, string])
}

fn literal_node(token: &Token, value: LiteralValue) -> Expression<()> {
    Expression::Literal(Literal {
        value,
        range: token.range(),
        info: (),
    })
}

/// A lowercase name token.
pub fn identifier() -> BoxedParser<Token> {
    token_of(TokenKind::Identifier)
}

/// A capitalized name token.
pub fn constant() -> BoxedParser<Token> {
    token_of(TokenKind::Constant)
}

/// variable := identifier
pub fn variable() -> BoxedParser<Expression<()>> {
    identifier() >> |tok: Token| {
        let range = tok.range();
        Expression::Variable(Variable {
            name: tok.value,
            range,
            info: (),
        })
    }
}

/// type_annotation := constant | identifier
///
/// Capitalized names reference a declared nominal type, lowercase names a
/// bound generic parameter.
pub fn type_annotation() -> BoxedParser<TypeAnnotation> {
    let nominal = constant() >> |tok: Token| {
        let range = tok.range();
        TypeAnnotation::TypeRef {
            name: tok.value,
            range,
        }
    };
    let generic = identifier() >> |tok: Token| {
        let range = tok.range();
        TypeAnnotation::GenericRef {
            name: tok.value,
            range,
        }
    };
    nominal | generic
}
