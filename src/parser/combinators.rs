use std::ops::{Add, BitOr, Mul, Shr, Sub};
use std::rc::Rc;

use crate::lexer::{Token, TokenKind};

use super::error::{OperandSide, ParseError, ParseResult};
use super::state::{ParseState, Parser};

type ParserFn<T> = Rc<dyn Fn(&mut ParseState) -> ParseResult<T>>;

// === Boxed Parser for type erasure ===

pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |state| parser.parse(state)),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        (self.parser)(state)
    }
}

// === Combinators as methods ===

impl<T: 'static> BoxedParser<T> {
    /// Sequence: parse self then other, return (T, U). A failure anywhere in
    /// the chain rolls the state back to the chain's entry.
    pub fn seq<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        BoxedParser::new(move |state: &mut ParseState| {
            let entry = state.position();
            let a = self.parse(state)?;
            match other.parse(state) {
                Ok(b) => Ok((a, b)),
                Err(err) => {
                    state.restore(entry);
                    Err(err)
                }
            }
        })
    }

    /// Keep left: parse self then other, discard other's result
    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<T> {
        self.seq(other).map(|(a, _)| a)
    }

    /// Keep right: parse self then other, discard self's result
    pub fn skip_left<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        self.seq(other).map(|(_, b)| b)
    }

    /// Map: transform result
    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::new(move |state: &mut ParseState| {
            let a = self.parse(state)?;
            Ok(f(a))
        })
    }

    /// Choice: try self against the entry state, then other. When both fail
    /// the surfaced error is chosen by [`ParseError::prefer`].
    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            let entry = state.position();
            let first = match self.parse(state) {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            state.restore(entry);
            match other.parse(state) {
                Ok(value) => Ok(value),
                Err(second) => {
                    state.restore(entry);
                    Err(first.prefer(second))
                }
            }
        })
    }
}

// === Operator Overloading ===

/// `+` for sequence: A + B -> (A, B)
impl<T: 'static, U: 'static> Add<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn add(self, rhs: BoxedParser<U>) -> Self::Output {
        self.seq(rhs)
    }
}

/// `-` for keep left: A - B -> A (parse B, discard result)
impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `*` for keep right: A * B -> B (parse A, discard result)
impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip_left(rhs)
    }
}

/// `|` for choice: A | B -> A or B
impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for map: A >> fn -> B
impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

// === Primitive Parsers ===

/// Consume one token of the given kind.
pub fn token_of(kind: TokenKind) -> BoxedParser<Token> {
    BoxedParser::new(move |state: &mut ParseState| match state.peek() {
        Some(token) if token.kind == kind => {
            let token = token.clone();
            state.advance();
            Ok(token)
        }
        Some(token) => Err(ParseError::unexpected(kind.name(), token)),
        None => Err(ParseError::eof(kind.name(), state.eof_position())),
    })
}

/// Parse zero or more occurrences. Never fails; the state stays where the
/// last successful match ended.
pub fn many<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut results = Vec::new();
        loop {
            let pos = state.position();
            match parser.parse(state) {
                Ok(item) => results.push(item),
                Err(_) => {
                    state.restore(pos);
                    break;
                }
            }
        }
        Ok(results)
    })
}

/// Parse one or more occurrences
pub fn at_least_one<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let entry = state.position();
        let first = match parser.parse(state) {
            Ok(item) => item,
            Err(err) => {
                state.restore(entry);
                return Err(err);
            }
        };
        let mut results = vec![first];
        loop {
            let pos = state.position();
            match parser.parse(state) {
                Ok(item) => results.push(item),
                Err(_) => {
                    state.restore(pos);
                    break;
                }
            }
        }
        Ok(results)
    })
}

/// Optional: parse zero or one
pub fn optional<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let pos = state.position();
        match parser.parse(state) {
            Ok(item) => Ok(Some(item)),
            Err(_) => {
                state.restore(pos);
                Ok(None)
            }
        }
    })
}

/// Ordered choice over any number of alternatives, folding the error
/// selection rule of [`BoxedParser::or`] across the list.
pub fn one_of<T: 'static>(parsers: Vec<BoxedParser<T>>) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| {
        let entry = state.position();
        let mut best: Option<ParseError> = None;
        for parser in &parsers {
            state.restore(entry);
            match parser.parse(state) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    best = Some(match best.take() {
                        Some(previous) => previous.prefer(err),
                        None => err,
                    });
                }
            }
        }
        state.restore(entry);
        match best {
            Some(err) => Err(err),
            None => Err(ParseError::eof("input", state.eof_position())),
        }
    })
}

/// Defer construction of a parser until it is invoked, breaking recursive
/// grammar definitions at construction time.
pub fn lazy<T: 'static>(build: impl Fn() -> BoxedParser<T> + 'static) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| build().parse(state))
}

/// Left-associative operator chain: one value, then repeated operator/value
/// pairs folded with `combine`.
///
/// A syntactic failure on the first value is promoted to a "lacks left-hand
/// side" error when the offending token is itself one of the level's
/// operators; a failure after an operator has been consumed is promoted to
/// "lacks right-hand side". Semantic errors pass through untouched.
pub fn chainl<T: 'static>(
    value: BoxedParser<T>,
    operator: BoxedParser<Token>,
    combine: impl Fn(T, &Token, T) -> T + 'static,
) -> BoxedParser<T> {
    BoxedParser::new(move |state: &mut ParseState| {
        let entry = state.position();
        let mut left = match value.parse(state) {
            Ok(item) => item,
            Err(err) => {
                let err = promote_missing_left(err, &operator, state);
                state.restore(entry);
                return Err(err);
            }
        };
        loop {
            let before_op = state.position();
            let op = match operator.parse(state) {
                Ok(op) => op,
                Err(_) => {
                    state.restore(before_op);
                    break;
                }
            };
            match value.parse(state) {
                Ok(right) => left = combine(left, &op, right),
                Err(err) => {
                    let err = promote_missing_right(err, &op);
                    state.restore(entry);
                    return Err(err);
                }
            }
        }
        Ok(left)
    })
}

fn promote_missing_left(
    err: ParseError,
    operator: &BoxedParser<Token>,
    state: &mut ParseState,
) -> ParseError {
    if !matches!(
        err,
        ParseError::UnexpectedToken { .. } | ParseError::Eof { .. }
    ) {
        return err;
    }
    let pos = state.position();
    let promoted = operator
        .parse(state)
        .ok()
        .map(|op| ParseError::missing_operand(&op, OperandSide::Left));
    state.restore(pos);
    promoted.unwrap_or(err)
}

fn promote_missing_right(err: ParseError, operator: &Token) -> ParseError {
    if matches!(
        err,
        ParseError::UnexpectedToken { .. } | ParseError::Eof { .. }
    ) {
        ParseError::missing_operand(operator, OperandSide::Right)
    } else {
        err
    }
}

/// Zero or more `item`s separated by `separator`. An empty list is a valid
/// parse. A trailing separator stays consumed when the following item fails
/// syntactically; a semantic item failure aborts the whole sequence.
pub fn sep_by<T: 'static, S: 'static>(
    item: BoxedParser<T>,
    separator: BoxedParser<S>,
) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let entry = state.position();
        let mut results = Vec::new();
        match item.parse(state) {
            Ok(first) => results.push(first),
            Err(err) if err.is_semantic() => {
                state.restore(entry);
                return Err(err);
            }
            Err(_) => {
                state.restore(entry);
                return Ok(results);
            }
        }
        loop {
            let before_sep = state.position();
            if separator.parse(state).is_err() {
                state.restore(before_sep);
                break;
            }
            match item.parse(state) {
                Ok(value) => results.push(value),
                Err(err) if err.is_semantic() => {
                    state.restore(entry);
                    return Err(err);
                }
                Err(_) => break,
            }
        }
        Ok(results)
    })
}
