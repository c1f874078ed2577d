//! Slide-and-merge rules.
//!
//! `process_line` handles one row or column; `apply_move` runs it over the
//! four lines of a board for a direction and reports what happened to every
//! cell so the caller can animate and track tiles without re-deriving it.

use crate::board::{Board, Direction, CELLS, SIZE};

// ============================================================================
// Types
// ============================================================================

/// Where the value in an output slot came from.
///
/// Slot numbers are line positions inside `LineOutcome`, board indices
/// inside `MoveResult`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Source {
    #[default]
    Empty,
    Slid(usize),
    Merged { survivor: usize, absorbed: usize },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LineOutcome {
    pub result: [u32; SIZE],
    pub gained: u32,
    pub merged_max: u32,
    pub any_merge: bool,
    pub sources: [Source; SIZE],
}

/// Per-cell change produced by a move or a spawn, consumed by renderers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellEvent {
    Moved { from: usize, to: usize },
    Merged { survivor: usize, absorbed: usize, to: usize, value: u32 },
    Spawned { index: usize, value: u32 },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveResult {
    pub board: Board,
    pub score_gained: u32,
    pub changed: bool,
    pub max_tile_this_move: u32,
    /// Origin of every cell of `board`, in board indices.
    pub sources: [Source; CELLS],
}

// ============================================================================
// Line Processing
// ============================================================================

/// Compacts `line` toward the direction of travel and merges equal neighbours.
///
/// The scan starts at the end tiles travel toward, so the first-visited tile of
/// an equal pair survives and doubles. A merged tile is skipped past and never
/// merges again in the same call: `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`.
pub fn process_line(line: [u32; SIZE], toward_start: bool) -> LineOutcome {
    let order = scan_order(toward_start);
    let tiles: Vec<(u32, usize)> = order
        .iter()
        .filter(|&&slot| line[slot] != 0)
        .map(|&slot| (line[slot], slot))
        .collect();

    let mut outcome = LineOutcome {
        result: [0; SIZE],
        gained: 0,
        merged_max: 0,
        any_merge: false,
        sources: [Source::Empty; SIZE],
    };

    let mut packed = 0;
    let mut i = 0;
    while i < tiles.len() {
        let (value, slot) = tiles[i];
        let target = order[packed];
        match tiles.get(i + 1) {
            Some(&(next, next_slot)) if next == value => {
                let merged = value * 2;
                outcome.result[target] = merged;
                outcome.sources[target] = Source::Merged {
                    survivor: slot,
                    absorbed: next_slot,
                };
                outcome.gained += merged;
                outcome.merged_max = outcome.merged_max.max(merged);
                outcome.any_merge = true;
                i += 2;
            }
            _ => {
                outcome.result[target] = value;
                outcome.sources[target] = Source::Slid(slot);
                i += 1;
            }
        }
        packed += 1;
    }

    outcome
}

fn scan_order(toward_start: bool) -> [usize; SIZE] {
    let mut order = [0; SIZE];
    for (k, slot) in order.iter_mut().enumerate() {
        *slot = if toward_start { k } else { SIZE - 1 - k };
    }
    order
}

// ============================================================================
// Move Engine
// ============================================================================

/// Applies one move to `board`. Vertical moves read columns as lines, which is
/// the transpose of the row case.
pub fn apply_move(board: &Board, direction: Direction) -> MoveResult {
    let mut cells = [0u32; CELLS];
    let mut sources = [Source::Empty; CELLS];
    let mut score_gained = 0;
    let mut max_tile_this_move = 0;

    for n in 0..SIZE {
        let indices = Board::line_indices(direction, n);
        let line = indices.map(|i| board.get(i));
        let outcome = process_line(line, direction.toward_start());

        for (k, &index) in indices.iter().enumerate() {
            cells[index] = outcome.result[k];
            sources[index] = match outcome.sources[k] {
                Source::Empty => Source::Empty,
                Source::Slid(from) => Source::Slid(indices[from]),
                Source::Merged { survivor, absorbed } => Source::Merged {
                    survivor: indices[survivor],
                    absorbed: indices[absorbed],
                },
            };
        }
        score_gained += outcome.gained;
        max_tile_this_move = max_tile_this_move.max(outcome.merged_max);
    }

    let next = Board::from_cells(cells);
    MoveResult {
        changed: next != *board,
        board: next,
        score_gained,
        max_tile_this_move,
        sources,
    }
}

impl MoveResult {
    /// Moves and merges in board-index order. Tiles that stayed put are omitted.
    pub fn events(&self) -> Vec<CellEvent> {
        self.sources
            .iter()
            .enumerate()
            .filter_map(|(to, source)| match *source {
                Source::Slid(from) if from != to => Some(CellEvent::Moved { from, to }),
                Source::Merged { survivor, absorbed } => Some(CellEvent::Merged {
                    survivor,
                    absorbed,
                    to,
                    value: self.board.get(to),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn merge_count(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| matches!(s, Source::Merged { .. }))
            .count()
    }
}
