use std::fmt;

// ============================================================================
// Configuration
// ============================================================================

pub const SIZE: usize = 4;
pub const CELLS: usize = SIZE * SIZE;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Up/Down operate on columns, Left/Right on rows.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Whether tiles travel toward index 0 of each line.
    pub fn toward_start(self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }
}

/// Row-major 4x4 grid. Each cell is 0 (empty) or a power of two >= 2.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Board {
    cells: [u32; CELLS],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [u32; CELLS]) -> Self {
        debug_assert!(
            cells.iter().all(|&v| v == 0 || (v >= 2 && v.is_power_of_two())),
            "board cells must be 0 or a power of two >= 2: {cells:?}"
        );
        Self { cells }
    }

    pub fn cells(&self) -> &[u32; CELLS] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> u32 {
        self.cells[index]
    }

    pub fn at(&self, row: usize, col: usize) -> u32 {
        self.cells[index_of(row, col)]
    }

    pub(crate) fn with_cell(mut self, index: usize, value: u32) -> Self {
        self.cells[index] = value;
        self
    }

    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&0)
    }

    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    pub fn sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    /// Board indices of the `n`th line for a move in `direction`, in line order
    /// (index 0 of the line first). Rows for horizontal moves, columns for vertical.
    pub fn line_indices(direction: Direction, n: usize) -> [usize; SIZE] {
        let mut out = [0; SIZE];
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = if direction.is_vertical() {
                index_of(k, n)
            } else {
                index_of(n, k)
            };
        }
        out
    }

    /// A board is terminal when it is full and no two orthogonal neighbours
    /// share a value. Checking right and below neighbours covers all four
    /// directions.
    pub fn is_terminal(&self) -> bool {
        if !self.is_full() {
            return false;
        }
        for row in 0..SIZE {
            for col in 0..SIZE {
                let current = self.at(row, col);
                if col + 1 < SIZE && current == self.at(row, col + 1) {
                    return false;
                }
                if row + 1 < SIZE && current == self.at(row + 1, col) {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            for col in 0..SIZE {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>5}", self.at(row, col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub fn index_of(row: usize, col: usize) -> usize {
    row * SIZE + col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lines_run_top_to_bottom() {
        assert_eq!(Board::line_indices(Direction::Up, 1), [1, 5, 9, 13]);
        assert_eq!(Board::line_indices(Direction::Left, 2), [8, 9, 10, 11]);
    }

    #[test]
    fn display_has_one_line_per_row() {
        let text = Board::empty().to_string();
        assert_eq!(text.lines().count(), SIZE);
    }
}
