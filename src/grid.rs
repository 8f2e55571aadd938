//! The character grid a program is matched against.
//!
//! Rows may have different lengths. Coordinates are signed so a cursor can
//! sit just outside the grid.

/// A non-breaking space reads as an ordinary space.
const NBSP: char = '\u{a0}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    /// Split `input` into rows on `\n`. There is always at least one row.
    pub fn new(input: &str) -> Self {
        let rows = input
            .split('\n')
            .map(|row| {
                row.chars()
                    .map(|c| if c == NBSP { ' ' } else { c })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of row `y`, if it exists.
    pub fn row_len(&self, y: i32) -> Option<usize> {
        usize::try_from(y).ok().and_then(|y| self.rows.get(y)).map(Vec::len)
    }

    /// The character at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Every cell coordinate, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            (0..row.len()).map(move |x| (x as i32, y as i32))
        })
    }

    /// The columns a search starts from on row `y`, including one column of
    /// slack on either side. Rows above and below the grid borrow the width
    /// of the nearest real row.
    pub fn start_columns(&self, y: i32) -> std::ops::RangeInclusive<i32> {
        let nearest = y.clamp(0, self.height() as i32 - 1);
        let width = self.row_len(nearest).unwrap_or(0) as i32;
        -1..=width
    }

    /// Rows a search starts from, one row of slack above and below.
    pub fn start_rows(&self) -> std::ops::RangeInclusive<i32> {
        -1..=self.height() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows() {
        let grid = Grid::new("abc\nd\n");
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.row_len(0), Some(3));
        assert_eq!(grid.row_len(1), Some(1));
        assert_eq!(grid.row_len(2), Some(0));
        assert_eq!(grid.row_len(3), None);
        assert_eq!(grid.row_len(-1), None);
    }

    #[test]
    fn lookup() {
        let grid = Grid::new("ab\ncd");
        assert_eq!(grid.get(1, 1), Some('d'));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn non_breaking_space_is_a_space() {
        let grid = Grid::new("a\u{a0}b");
        assert_eq!(grid.get(1, 0), Some(' '));
    }

    #[test]
    fn start_positions_have_slack() {
        let grid = Grid::new("abc\nd");
        assert_eq!(grid.start_rows(), -1..=2);
        assert_eq!(grid.start_columns(-1), -1..=3);
        assert_eq!(grid.start_columns(1), -1..=1);
        assert_eq!(grid.start_columns(2), -1..=1);
    }

    #[test]
    fn cells_in_row_order() {
        let grid = Grid::new("ab\nc");
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells, [(0, 0), (1, 0), (0, 1)]);
    }
}
