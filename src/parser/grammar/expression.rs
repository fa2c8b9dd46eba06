//! Expression parsers for the Jade grammar
//!
//! Binary operators are layered from loosest to tightest binding, each level
//! a left-associative chain over the next one: equality, concatenation,
//! comparison, additive, multiplicative, unary, factor.

use crate::ast::{
    AnonymousRecord, Binary, BinaryOp, Expression, FieldAssign, FunctionCall, Grouping,
    RecordAccess, RecordInstantiation, Unary, UnaryOp,
};
use crate::lexer::{Token, TokenKind};
use crate::parser::combinators::{chainl, lazy, one_of, sep_by, token_of, BoxedParser};
use crate::parser::state::{ParseState, Parser};

use super::literal::{constant, identifier, literal, variable};

/// expression := equality
pub fn expression() -> BoxedParser<Expression<()>> {
    equality()
}

/// equality := concatenation (("==" | "!=") concatenation)*
fn equality() -> BoxedParser<Expression<()>> {
    chainl(
        concatenation(),
        token_of(TokenKind::Eq) | token_of(TokenKind::NotEq),
        binary,
    )
}

/// concatenation := comparison ("++" comparison)*
fn concatenation() -> BoxedParser<Expression<()>> {
    chainl(comparison(), token_of(TokenKind::Concat), binary)
}

/// comparison := additive (("<" | "<=" | ">" | ">=") additive)*
fn comparison() -> BoxedParser<Expression<()>> {
    let operator = one_of(vec![
        token_of(TokenKind::Lte),
        token_of(TokenKind::Lt),
        token_of(TokenKind::Gte),
        token_of(TokenKind::Gt),
    ]);
    chainl(additive(), operator, binary)
}

/// additive := multiplicative (("+" | "-") multiplicative)*
fn additive() -> BoxedParser<Expression<()>> {
    chainl(
        multiplicative(),
        token_of(TokenKind::Plus) | token_of(TokenKind::Minus),
        binary,
    )
}

/// multiplicative := unary (("*" | "/") unary)*
fn multiplicative() -> BoxedParser<Expression<()>> {
    chainl(
        unary(),
        token_of(TokenKind::Star) | token_of(TokenKind::Slash),
        binary,
    )
}

/// unary := ("-" | "!") unary | factor
fn unary() -> BoxedParser<Expression<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let entry = state.position();
        let operator = token_of(TokenKind::Minus) | token_of(TokenKind::Bang);
        match operator.parse(state) {
            Ok(op) => match unary().parse(state) {
                Ok(operand) => {
                    let range = op.range().merge(&operand.range());
                    Ok(Expression::Unary(Unary {
                        operator: unary_op(&op),
                        right: Box::new(operand),
                        range,
                        info: (),
                    }))
                }
                Err(err) => {
                    state.restore(entry);
                    Err(err)
                }
            },
            Err(_) => {
                state.restore(entry);
                factor().parse(state)
            }
        }
    })
}

/// factor := base ("." identifier)*
pub fn factor() -> BoxedParser<Expression<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut target = base().parse(state)?;
        loop {
            let pos = state.position();
            if token_of(TokenKind::Dot).parse(state).is_err() {
                state.restore(pos);
                break;
            }
            match identifier().parse(state) {
                Ok(field) => {
                    let range = target.range().merge(&field.range());
                    target = Expression::RecordAccess(RecordAccess {
                        target: Box::new(target),
                        field: field.value,
                        range,
                        info: (),
                    });
                }
                Err(_) => {
                    state.restore(pos);
                    break;
                }
            }
        }
        Ok(target)
    })
}

/// base := record_instantiation | function_call | anonymous_record
///       | variable | grouping | literal
fn base() -> BoxedParser<Expression<()>> {
    one_of(vec![
        record_instantiation(),
        function_call(),
        anonymous_record(),
        variable(),
        grouping(),
        literal(),
    ])
}

/// grouping := "(" expression ")"
fn grouping() -> BoxedParser<Expression<()>> {
    ((token_of(TokenKind::LParen) + lazy(expression)) + token_of(TokenKind::RParen))
        >> |((open, inner), close): ((Token, Expression<()>), Token)| {
            Expression::Grouping(Grouping {
                range: open.range().merge(&close.range()),
                expression: Box::new(inner),
                info: (),
            })
        }
}

/// function_call := identifier "(" call_args ")"
fn function_call() -> BoxedParser<Expression<()>> {
    ((identifier() + (token_of(TokenKind::LParen) * call_args())) + token_of(TokenKind::RParen))
        >> |((name, arguments), close): ((Token, Vec<Expression<()>>), Token)| {
            let range = name.range().merge(&close.range());
            Expression::FunctionCall(FunctionCall {
                name: name.value,
                arguments,
                range,
                info: (),
            })
        }
}

/// call_args := [expression ("," expression)*]
fn call_args() -> BoxedParser<Vec<Expression<()>>> {
    sep_by(lazy(expression), token_of(TokenKind::Comma))
}

/// record_instantiation := constant "(" field_assignments ")"
fn record_instantiation() -> BoxedParser<Expression<()>> {
    ((constant() + (token_of(TokenKind::LParen) * field_assignments()))
        + token_of(TokenKind::RParen))
        >> |((name, fields), close): ((Token, Vec<FieldAssign<()>>), Token)| {
            let range = name.range().merge(&close.range());
            Expression::RecordInstantiation(RecordInstantiation {
                name: name.value,
                fields,
                range,
                info: (),
            })
        }
}

/// anonymous_record := "{" field_assignments "}"
fn anonymous_record() -> BoxedParser<Expression<()>> {
    ((token_of(TokenKind::LBrace) + field_assignments()) + token_of(TokenKind::RBrace))
        >> |((open, fields), close): ((Token, Vec<FieldAssign<()>>), Token)| {
            Expression::AnonymousRecord(AnonymousRecord {
                fields,
                range: open.range().merge(&close.range()),
                info: (),
            })
        }
}

/// field_assignment := identifier ":" expression
fn field_assignment() -> BoxedParser<FieldAssign<()>> {
    ((identifier() - token_of(TokenKind::Colon)) + lazy(expression))
        >> |(name, expression): (Token, Expression<()>)| {
            let range = name.range().merge(&expression.range());
            FieldAssign {
                name: name.value,
                expression,
                range,
                info: (),
            }
        }
}

fn field_assignments() -> BoxedParser<Vec<FieldAssign<()>>> {
    sep_by(field_assignment(), token_of(TokenKind::Comma))
}

/// Fold two operands into a binary node; the node's range is the union of
/// its children's ranges.
fn binary(left: Expression<()>, operator: &Token, right: Expression<()>) -> Expression<()> {
    let range = left.range().merge(&right.range());
    Expression::Binary(Binary {
        left: Box::new(left),
        operator: binary_op(operator),
        right: Box::new(right),
        range,
        info: (),
    })
}

fn binary_op(token: &Token) -> BinaryOp {
    match token.kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Concat => BinaryOp::Concat,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Lte => BinaryOp::Lte,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::Gte => BinaryOp::Gte,
        _ => unreachable!("operator levels only feed operator tokens here"),
    }
}

fn unary_op(token: &Token) -> UnaryOp {
    match token.kind {
        TokenKind::Minus => UnaryOp::Neg,
        TokenKind::Bang => UnaryOp::Not,
        _ => unreachable!("unary only consumes '-' and '!'"),
    }
}
