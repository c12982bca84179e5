use std::fmt;

/// A (line, column) location in a source text. Lines and columns are
/// zero-based; columns are byte offsets into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InsertPosition {
    pub line: usize,
    pub column: usize,
}

impl InsertPosition {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_line_then_column() {
        let mut positions = vec![
            InsertPosition::new(2, 0),
            InsertPosition::new(0, 9),
            InsertPosition::new(2, 1),
            InsertPosition::new(0, 3),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                InsertPosition::new(0, 3),
                InsertPosition::new(0, 9),
                InsertPosition::new(2, 0),
                InsertPosition::new(2, 1),
            ]
        );
    }

    #[test]
    fn displays_one_based() {
        assert_eq!(InsertPosition::new(0, 4).to_string(), "1:5");
    }
}
