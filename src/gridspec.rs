//! Grid-spec parser: compact ASCII art into named rectangular cells.
//!
//! A specification is a rectangular block of text, rows separated by a
//! line break or `|`, whitespace insignificant. Each distinct non-`.`
//! character names one cell:
//!
//! ```text
//! ABB
//! ACC
//! ACC
//! ```
//!
//! parses to `A` at (0,0) 1×3, `B` at (0,1) 2×1, `C` at (1,1) 2×2.
//!
//! For each character position not yet claimed, a bounding rectangle is
//! extended greedily: first rightward while the next column holds the same
//! character, then downward while every column in the found range holds
//! the same character. A character encountered again outside its computed
//! rectangle rejects the input.

use serde::Serialize;

/// Rectangular extent of one named cell, in row/column units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellBounds {
    /// Topmost row.
    pub row: usize,
    /// Leftmost column.
    pub col: usize,
    /// Columns spanned.
    pub width: usize,
    /// Rows spanned.
    pub height: usize,
}

/// Error rejecting a malformed grid specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridSpecError {
    /// The specification contains no rows.
    #[error("grid specification contains no rows")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("grid specification row {row} has length {actual}, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
    /// A cell character re-occurs outside its rectangle.
    #[error("cell '{cell}' at row {row}, col {col} is not rectangular")]
    FragmentedCell {
        /// The offending cell character.
        cell: char,
        /// Row of the stray occurrence.
        row: usize,
        /// Column of the stray occurrence.
        col: usize,
    },
}

/// Parse a grid specification into named cells, in first-encounter
/// (row-major) order.
pub fn parse_grid_spec(spec: &str) -> Result<Vec<(String, CellBounds)>, GridSpecError> {
    let rows: Vec<Vec<char>> = spec
        .split(['\n', '|'])
        .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect())
        .filter(|row: &Vec<char>| !row.is_empty())
        .collect();
    if rows.is_empty() {
        return Err(GridSpecError::Empty);
    }

    let width = rows[0].len();
    for (index, row) in rows.iter().enumerate().skip(1) {
        if row.len() != width {
            return Err(GridSpecError::RaggedRow {
                row: index,
                expected: width,
                actual: row.len(),
            });
        }
    }

    let mut claimed: Vec<(char, CellBounds)> = Vec::new();
    for r in 0..rows.len() {
        for c in 0..width {
            let cell = rows[r][c];
            if cell == '.' {
                continue;
            }
            if let Some((_, bounds)) = claimed.iter().find(|(name, _)| *name == cell) {
                let inside = r >= bounds.row
                    && r < bounds.row + bounds.height
                    && c >= bounds.col
                    && c < bounds.col + bounds.width;
                if !inside {
                    return Err(GridSpecError::FragmentedCell { cell, row: r, col: c });
                }
                continue;
            }

            let mut w = 1;
            while c + w < width && rows[r][c + w] == cell {
                w += 1;
            }
            let mut h = 1;
            while r + h < rows.len() && (c..c + w).all(|cc| rows[r + h][cc] == cell) {
                h += 1;
            }
            claimed.push((
                cell,
                CellBounds {
                    row: r,
                    col: c,
                    width: w,
                    height: h,
                },
            ));
        }
    }

    Ok(claimed
        .into_iter()
        .map(|(name, bounds)| (name.to_string(), bounds))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(row: usize, col: usize, width: usize, height: usize) -> CellBounds {
        CellBounds {
            row,
            col,
            width,
            height,
        }
    }

    #[test]
    fn test_reference_example() {
        let cells = parse_grid_spec("ABB\nACC\nACC").unwrap();
        assert_eq!(
            cells,
            vec![
                ("A".to_string(), bounds(0, 0, 1, 3)),
                ("B".to_string(), bounds(0, 1, 2, 1)),
                ("C".to_string(), bounds(1, 1, 2, 2)),
            ]
        );
    }

    #[test]
    fn test_pipe_separated_rows() {
        let from_pipes = parse_grid_spec("ABB|ACC|ACC").unwrap();
        let from_newlines = parse_grid_spec("ABB\nACC\nACC").unwrap();
        assert_eq!(from_pipes, from_newlines);
    }

    #[test]
    fn test_whitespace_insignificant() {
        let cells = parse_grid_spec("  A B \n  C D \n").unwrap();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[3], ("D".to_string(), bounds(1, 1, 1, 1)));
    }

    #[test]
    fn test_holes_allowed() {
        let cells = parse_grid_spec("A.B\n...").unwrap();
        assert_eq!(
            cells,
            vec![
                ("A".to_string(), bounds(0, 0, 1, 1)),
                ("B".to_string(), bounds(0, 2, 1, 1)),
            ]
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(parse_grid_spec(""), Err(GridSpecError::Empty));
        assert_eq!(parse_grid_spec("  \n  "), Err(GridSpecError::Empty));
    }

    #[test]
    fn test_ragged_rejected() {
        assert_eq!(
            parse_grid_spec("AB\nABC"),
            Err(GridSpecError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_fragmented_cell_rejected() {
        assert_eq!(
            parse_grid_spec(".A\nA."),
            Err(GridSpecError::FragmentedCell {
                cell: 'A',
                row: 1,
                col: 0
            })
        );
    }

    #[test]
    fn test_l_shape_rejected() {
        assert_eq!(
            parse_grid_spec("AB\nAA"),
            Err(GridSpecError::FragmentedCell {
                cell: 'A',
                row: 1,
                col: 1
            })
        );
    }

    #[test]
    fn test_single_cell_spans_everything() {
        let cells = parse_grid_spec("AA\nAA").unwrap();
        assert_eq!(cells, vec![("A".to_string(), bounds(0, 0, 2, 2))]);
    }
}
