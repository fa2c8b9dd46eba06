//! Tokenization of Jade source text.
//!
//! The scanner is a thin wrapper around a [`logos`] lexer that converts byte
//! offsets into 1-based line/column positions and unescapes string literals.

use logos::Logos;
use thiserror::Error;

use crate::ast::{Position, Range};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // === Keywords ===
    #[token("def")]
    Def,
    #[token("end")]
    End,
    #[token("let")]
    Let,
    #[token("type")]
    Type,
    #[token("module")]
    Module,
    #[token("exposing")]
    Exposing,

    // === Literals and names ===
    #[token("True")]
    #[token("False")]
    Bool,
    #[regex("[0-9]+")]
    Int,
    #[regex(r#""(\\.|[^"\\])*""#)]
    Str,
    #[regex("[A-Z][a-zA-Z0-9_]*")]
    Constant,
    #[regex("[a-z_][a-zA-Z0-9_]*")]
    Identifier,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("|")]
    Pipe,
    #[token("->")]
    Arrow,
    #[token("=")]
    Assign,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    Lte,
    #[token(">")]
    Gt,
    #[token(">=")]
    Gte,
    #[token("!")]
    Bang,
    #[token("++")]
    Concat,
}

impl TokenKind {
    /// Lowercase kind name used verbatim in parse error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Def => "def",
            TokenKind::End => "end",
            TokenKind::Let => "let",
            TokenKind::Type => "type",
            TokenKind::Module => "module",
            TokenKind::Exposing => "exposing",
            TokenKind::Bool => "bool",
            TokenKind::Int => "int",
            TokenKind::Str => "string",
            TokenKind::Constant => "constant",
            TokenKind::Identifier => "identifier",
            TokenKind::LParen => "lparen",
            TokenKind::RParen => "rparen",
            TokenKind::LBrace => "lbrace",
            TokenKind::RBrace => "rbrace",
            TokenKind::Colon => "colon",
            TokenKind::Comma => "comma",
            TokenKind::Dot => "dot",
            TokenKind::Pipe => "pipe",
            TokenKind::Arrow => "arrow",
            TokenKind::Assign => "assign",
            TokenKind::Plus => "plus",
            TokenKind::Minus => "minus",
            TokenKind::Star => "star",
            TokenKind::Slash => "slash",
            TokenKind::Eq => "eq",
            TokenKind::NotEq => "not_eq",
            TokenKind::Lt => "lt",
            TokenKind::Lte => "lte",
            TokenKind::Gt => "gt",
            TokenKind::Gte => "gte",
            TokenKind::Bang => "bang",
            TokenKind::Concat => "concat",
        }
    }
}

/// One scanned token. `value` holds the lexeme, with quotes stripped and
/// escapes resolved for string literals.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
}

impl Token {
    pub fn end_position(&self) -> Position {
        self.position.offset_by(&self.value)
    }

    pub fn range(&self) -> Range {
        Range::new(self.position, self.end_position())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unexpected character at line {line}, col {column}: {character}")]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub character: char,
}

/// Scan `source` into a token sequence.
pub fn scan(source: &str) -> Result<Vec<Token>, LexError> {
    let starts = line_starts(source);
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let position = position_at(&starts, lexer.span().start);
        match result {
            Ok(kind) => {
                let raw = lexer.slice();
                let value = match kind {
                    TokenKind::Str => unescape(raw),
                    _ => raw.to_string(),
                };
                tokens.push(Token {
                    kind,
                    value,
                    position,
                });
            }
            Err(()) => {
                let character = source[lexer.span().start..].chars().next().unwrap_or(' ');
                return Err(LexError {
                    line: position.line,
                    column: position.column,
                    character,
                });
            }
        }
    }

    Ok(tokens)
}

/// Byte offsets where each source line begins.
fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (offset, byte) in source.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(offset + 1);
        }
    }
    starts
}

fn position_at(starts: &[usize], offset: usize) -> Position {
    let line = starts.partition_point(|&start| start <= offset);
    Position::new(line, offset - starts[line - 1] + 1)
}

/// Strip the surrounding quotes and resolve `\"` and `\\` escapes.
fn unescape(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_advance_lines_and_reset_columns() {
        let tokens = scan("let a\n  = 5").unwrap();
        assert_eq!(tokens[0].position, Position::new(1, 1));
        assert_eq!(tokens[1].position, Position::new(1, 5));
        assert_eq!(tokens[2].position, Position::new(2, 3));
        assert_eq!(tokens[3].position, Position::new(2, 5));
    }

    #[test]
    fn longest_operator_wins() {
        let tokens = scan("++ + -> - <= < == =").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Concat,
                TokenKind::Plus,
                TokenKind::Arrow,
                TokenKind::Minus,
                TokenKind::Lte,
                TokenKind::Lt,
                TokenKind::Eq,
                TokenKind::Assign,
            ]
        );
    }

    #[test]
    fn booleans_are_not_constants() {
        let tokens = scan("True Truthy").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Bool);
        assert_eq!(tokens[1].kind, TokenKind::Constant);
    }

    #[test]
    fn string_values_are_unescaped() {
        let tokens = scan(r#""say \"hi\" \\ twice""#).unwrap();
        assert_eq!(tokens[0].value, r#"say "hi" \ twice"#);
    }
}
