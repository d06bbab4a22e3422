use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::{LoadError, OutOfBounds};

/// A single grid cell: `None` is a blank cell, `Some(c)` holds an opcode.
pub type Cell = Option<char>;

/// The program grid: a read-only rectangle of cells parsed from text.
///
/// Rows are separated by `\n`. A space becomes a blank cell and every other
/// character (any Unicode scalar) is stored verbatim. All rows must have the
/// same length and the rectangle must hold at least one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Cells as a flat vector, indexed by y * width + x.
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Parse program text into a grid.
    ///
    /// A single trailing newline does not produce an extra row, and a `\r`
    /// before a newline is dropped, so files written on any platform load
    /// the same way.
    pub fn load(source: &str) -> Result<Self, LoadError> {
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        let mut current: Vec<Cell> = Vec::new();
        let mut pending_row = false;

        for c in source.chars() {
            match c {
                '\n' => {
                    if current.last() == Some(&Some('\r')) {
                        current.pop();
                    }
                    rows.push(std::mem::take(&mut current));
                    pending_row = false;
                }
                ' ' => {
                    current.push(None);
                    pending_row = true;
                }
                other => {
                    current.push(Some(other));
                    pending_row = true;
                }
            }
        }
        if pending_row {
            rows.push(current);
        }

        let Some(first) = rows.first() else {
            return Err(LoadError::EmptySource);
        };
        let width = first.len();
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(LoadError::JaggedRows {
                row,
                expected: width,
                found: bad.len(),
            });
        }
        if width == 0 {
            return Err(LoadError::EmptySource);
        }

        let height = rows.len();
        let cells: Vec<Cell> = rows.into_iter().flatten().collect();
        debug!(width, height, "program grid loaded");
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Read a program file from disk and parse it.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&source)
    }

    /// The cell at column `x`, row `y`.
    pub fn get(&self, x: i64, y: i64) -> Result<Cell, OutOfBounds> {
        let out_of_bounds = OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        };
        let (Ok(ux), Ok(uy)) = (usize::try_from(x), usize::try_from(y)) else {
            return Err(out_of_bounds);
        };
        if ux >= self.width || uy >= self.height {
            return Err(out_of_bounds);
        }
        Ok(self.cells[uy * self.width + ux])
    }

    /// `(width, height)` of the rectangle.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Iterate over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Export back to the program text format: blanks become spaces and
    /// every row ends with `\n`.
    ///
    /// Loading the result yields an identical grid. The text itself matches
    /// the loaded text only if it ended with a single newline
    /// and contained no `\r\n` line endings.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.unwrap_or(' '))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_single_row() {
        let grid = Grid::load(">5N").unwrap();
        assert_eq!(grid.dimensions(), (3, 1));
        assert_eq!(grid.get(0, 0), Ok(Some('>')));
        assert_eq!(grid.get(2, 0), Ok(Some('N')));
    }

    #[test]
    fn test_space_is_blank_not_out_of_bounds() {
        let grid = Grid::load(">65*N\n     ").unwrap();
        assert_eq!(grid.dimensions(), (5, 2));
        assert_eq!(grid.get(3, 1), Ok(None));
        assert!(grid.get(5, 0).is_err());
    }

    #[test]
    fn test_out_of_bounds_negative_and_past_end() {
        let grid = Grid::load("ab\ncd").unwrap();
        let err = grid.get(-1, 0).unwrap_err();
        assert_eq!((err.x, err.y, err.width, err.height), (-1, 0, 2, 2));
        assert!(grid.get(0, -1).is_err());
        assert!(grid.get(2, 0).is_err());
        assert!(grid.get(0, 2).is_err());
        assert_eq!(grid.get(1, 1), Ok(Some('d')));
    }

    #[test]
    fn test_trailing_newline_adds_no_row() {
        let grid = Grid::load("ab\ncd\n").unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
    }

    #[test]
    fn test_crlf_line_endings() {
        let grid = Grid::load("ab\r\ncd\r\n").unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(grid.get(1, 0), Ok(Some('b')));
    }

    #[test]
    fn test_unicode_opcodes_are_single_cells() {
        let grid = Grid::load("é→\nab").unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(grid.get(1, 0), Ok(Some('→')));
    }

    #[test]
    fn test_empty_source_rejected() {
        assert!(matches!(Grid::load(""), Err(LoadError::EmptySource)));
        assert!(matches!(Grid::load("\n"), Err(LoadError::EmptySource)));
        assert!(matches!(Grid::load("\n\n"), Err(LoadError::EmptySource)));
    }

    #[test]
    fn test_jagged_rows_rejected() {
        match Grid::load("abc\nde\nfgh") {
            Err(LoadError::JaggedRows {
                row,
                expected,
                found,
            }) => {
                assert_eq!(row, 1);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected JaggedRows, got {other:?}"),
        }
        // An empty line in the middle is a zero-length row.
        assert!(matches!(
            Grid::load("ab\n\ncd"),
            Err(LoadError::JaggedRows { row: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Grid::load_path("/nonexistent/deolang/program.txt").unwrap_err();
        assert!(matches!(err, LoadError::SourceNotFound { .. }));
    }

    #[test]
    fn test_load_path_reads_file() {
        let path = std::env::temp_dir().join(format!("deolang-grid-{}.txt", std::process::id()));
        std::fs::write(&path, ">5N\n   \n").unwrap();
        let grid = Grid::load_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(grid.dimensions(), (3, 2));
    }

    #[test]
    fn test_export_renders_blanks_as_spaces() {
        let grid = Grid::load(">6 N\nV  <").unwrap();
        assert_eq!(grid.to_text(), ">6 N\nV  <\n");
    }

    #[test]
    fn test_export_of_space_only_rows() {
        let source = "   \n>5N\n   \n";
        let grid = Grid::load(source).unwrap();
        assert_eq!(grid.to_text(), source);
    }
}
