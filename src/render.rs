//! Text rendering of a match over its grid.

use std::fmt::Write;

use crossterm::style::Stylize;

use crate::finder::Match;
use crate::grid::Grid;

/// How a single grid cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    Marked,
    Origin,
    MarkedOrigin,
}

impl CellStyle {
    pub fn of(m: &Match, x: i32, y: i32) -> Self {
        let origin = (m.orig_x, m.orig_y) == (x, y);
        match (m.is_marked(x, y), origin) {
            (false, false) => CellStyle::Plain,
            (true, false) => CellStyle::Marked,
            (false, true) => CellStyle::Origin,
            (true, true) => CellStyle::MarkedOrigin,
        }
    }

    fn is_marked(self) -> bool {
        matches!(self, CellStyle::Marked | CellStyle::MarkedOrigin)
    }
}

/// The header line printed above match `index` (zero-based) of `total`.
pub fn header(m: &Match, index: usize, total: usize) -> String {
    format!("match {}/{} from ({}, {})", index + 1, total, m.orig_x, m.orig_y)
}

/// Draw `grid` with the cells of `m` picked out. Styled output uses
/// terminal attributes; plain output brackets marked cells instead.
pub fn render_match(grid: &Grid, m: &Match, styled: bool) -> String {
    let mut out = String::new();
    for y in 0..grid.height() as i32 {
        let width = grid.row_len(y).unwrap_or(0) as i32;
        for x in 0..width {
            let Some(ch) = grid.get(x, y) else { continue };
            let style = CellStyle::of(m, x, y);
            if styled {
                write_styled(&mut out, ch, style);
            } else if style.is_marked() {
                let _ = write!(out, "[{ch}]");
            } else {
                let _ = write!(out, " {ch} ");
            }
        }
        out.push('\n');
    }
    out
}

fn write_styled(out: &mut String, ch: char, style: CellStyle) {
    let _ = match style {
        CellStyle::Plain => write!(out, "{ch}"),
        CellStyle::Marked => write!(out, "{}", ch.black().on_green()),
        CellStyle::Origin => write!(out, "{}", ch.bold().italic()),
        CellStyle::MarkedOrigin => write!(out, "{}", ch.black().on_green().bold().italic()),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run;

    #[test]
    fn plain_brackets_marked_cells() {
        let input = "abc\nde";
        let matches = run("m:bc", input, false).unwrap();
        let grid = Grid::new(input);
        assert_eq!(render_match(&grid, &matches[0], false), " a [b][c]\n d  e \n");
    }

    #[test]
    fn header_counts_from_one() {
        let matches = run("m:b", "ab", false).unwrap();
        assert_eq!(header(&matches[0], 0, 1), "match 1/1 from (1, 0)");
    }

    #[test]
    fn origin_style() {
        let matches = run("m:$a", "a", false).unwrap();
        let m = &matches[0];
        assert_eq!(CellStyle::of(m, -1, 0), CellStyle::MarkedOrigin);
        assert_eq!(CellStyle::of(m, 0, 0), CellStyle::Marked);
        assert_eq!(CellStyle::of(m, 1, 0), CellStyle::Plain);
    }

    #[test]
    fn styled_output_keeps_unmarked_cells_bare() {
        let matches = run("m:b", "ab", false).unwrap();
        let grid = Grid::new("ab");
        let out = render_match(&grid, &matches[0], true);
        assert!(out.starts_with('a'));
        assert!(out.contains('b'));
        assert!(out.ends_with('\n'));
    }
}
