//! Grammar rules for the Jade language, organized by category:
//! - `literal`: literals, names, type annotations
//! - `expression`: the operator precedence tower and factor forms
//! - `declaration`: `let`, `def`, and record/union `type` definitions

mod declaration;
mod expression;
mod literal;

pub use declaration::{union_declaration, variable_declaration, variant};
pub use expression::{expression, factor};

use crate::ast::{Module, Program, Range, Statement};
use crate::lexer::{Token, TokenKind};
use crate::parser::combinators::{many, one_of, sep_by, token_of, BoxedParser};
use crate::parser::error::ParseResult;
use crate::parser::state::{ParseState, Parser};

use declaration::{function_declaration, record_declaration};
use literal::{constant, identifier};

/// statement := variable_declaration | function_declaration
///            | record_declaration | union_declaration | expression
pub fn statement() -> BoxedParser<Statement<()>> {
    one_of(vec![
        variable_declaration(),
        function_declaration(),
        record_declaration(),
        union_declaration(),
        expression() >> Statement::Expression,
    ])
}

/// program := statement*
pub fn program() -> BoxedParser<Program<()>> {
    many(statement()) >> |statements: Vec<Statement<()>>| {
        let range = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => first.range().merge(&last.range()),
            _ => Range::default(),
        };
        Program { statements, range }
    }
}

/// module := "module" constant ("." constant)*
///           "exposing" "(" exposed_names ")" statement* "end"
pub fn module() -> BoxedParser<Module<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let entry = state.position();
        let result = parse_module(state);
        if result.is_err() {
            state.restore(entry);
        }
        result
    })
}

fn parse_module(state: &mut ParseState) -> ParseResult<Module<()>> {
    let module_kw = token_of(TokenKind::Module).parse(state)?;

    let first = constant().parse(state)?;
    let mut name = first.value;
    loop {
        let pos = state.position();
        if token_of(TokenKind::Dot).parse(state).is_err() {
            state.restore(pos);
            break;
        }
        match constant().parse(state) {
            Ok(segment) => {
                name.push('.');
                name.push_str(&segment.value);
            }
            Err(_) => {
                state.restore(pos);
                break;
            }
        }
    }

    token_of(TokenKind::Exposing).parse(state)?;
    token_of(TokenKind::LParen).parse(state)?;
    let exposing = sep_by(exposed_name(), token_of(TokenKind::Comma)).parse(state)?;
    token_of(TokenKind::RParen).parse(state)?;

    let statements = many(statement()).parse(state)?;
    let end = token_of(TokenKind::End).parse(state)?;

    Ok(Module {
        name,
        exposing,
        statements,
        range: module_kw.range().merge(&end.range()),
    })
}

/// exposed_name := identifier | constant
fn exposed_name() -> BoxedParser<String> {
    (identifier() | constant()) >> |tok: Token| tok.value
}
