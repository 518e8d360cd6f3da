//! Rows: token runs sharing one output line.

/// A token's size as recorded when it joined the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowEntry {
    pub index: usize,
    pub width: u32,
    pub height: u32,
}

/// One output line. Width is the sum of token widths, height the tallest token.
#[derive(Debug, Clone, Default)]
pub struct Row {
    entries: Vec<RowEntry>,
    width: u32,
    height: u32,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token; returns its column.
    pub(crate) fn push(&mut self, index: usize, width: u32, height: u32) -> usize {
        self.entries.push(RowEntry { index, width, height });
        self.width += width;
        self.height = self.height.max(height);
        self.entries.len() - 1
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insertion indices of the tokens in this row, left to right.
    pub fn token_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|e| e.index)
    }

    pub(crate) fn entry(&self, column: usize) -> Option<RowEntry> {
        self.entries.get(column).copied()
    }

    /// X offset of `column` from the row's left edge.
    pub(crate) fn offset_of(&self, column: usize) -> u32 {
        self.entries[..column.min(self.entries.len())]
            .iter()
            .map(|e| e.width)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_extents() {
        let mut row = Row::new();
        assert!(row.is_empty());
        assert_eq!(row.push(0, 10, 20), 0);
        assert_eq!(row.push(1, 5, 30), 1);
        assert_eq!(row.push(2, 0, 8), 2);
        assert_eq!(row.width(), 15);
        assert_eq!(row.height(), 30);
        assert_eq!(row.token_indices().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_offset_of_sums_prior_widths() {
        let mut row = Row::new();
        row.push(4, 10, 1);
        row.push(5, 7, 1);
        row.push(6, 3, 1);
        assert_eq!(row.offset_of(0), 0);
        assert_eq!(row.offset_of(1), 10);
        assert_eq!(row.offset_of(2), 17);
    }
}
