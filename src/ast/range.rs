use std::fmt;

/// A line/column cursor into the source text. Both components are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position reached after consuming `text`. Newlines advance the
    /// line and reset the column.
    pub fn offset_by(&self, text: &str) -> Position {
        let newlines = text.matches('\n').count();
        if newlines == 0 {
            Position::new(self.line, self.column + text.chars().count())
        } else {
            let trailing = text
                .rsplit('\n')
                .next()
                .map(|tail| tail.chars().count())
                .unwrap_or(0);
            Position::new(self.line + newlines, trailing + 1)
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The source extent of one AST node. Ranges are only ever copied into new
/// node values, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The smallest range covering both `self` and `other`.
    pub fn merge(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_by_single_line() {
        let pos = Position::new(2, 5);
        assert_eq!(pos.offset_by("hello"), Position::new(2, 10));
    }

    #[test]
    fn offset_by_multiline() {
        let pos = Position::new(1, 4);
        assert_eq!(pos.offset_by("a\nbb"), Position::new(2, 3));
    }

    #[test]
    fn merge_takes_the_outermost_bounds() {
        let a = Range::new(Position::new(1, 1), Position::new(1, 4));
        let b = Range::new(Position::new(1, 6), Position::new(2, 2));
        assert_eq!(
            a.merge(&b),
            Range::new(Position::new(1, 1), Position::new(2, 2))
        );
    }
}
