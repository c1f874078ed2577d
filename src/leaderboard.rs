use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

// ============================================================================
// Configuration
// ============================================================================

pub const LEADERBOARD_SIZE: usize = 10;
pub const DEFAULT_LEADERBOARD_FILE: &str = "leaderboard.json";

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    pub date: String,
}

impl ScoreRecord {
    pub fn new(score: u32, date: impl Into<String>) -> Self {
        Self {
            score,
            date: date.into(),
        }
    }

    /// Stamps `score` with today's local date.
    pub fn today(score: u32) -> Self {
        Self::new(score, chrono::Local::now().format("%Y-%m-%d").to_string())
    }
}

/// Best scores first, at most `LEADERBOARD_SIZE` entries. Equal scores keep
/// insertion order.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ScoreRecord>) -> Self {
        let mut board = Self { entries: records };
        board.normalize();
        board
    }

    /// Adds `record` and returns its rank if it made the cut.
    pub fn insert(&mut self, record: ScoreRecord) -> Option<usize> {
        self.entries.push(record);
        let inserted = self.entries.len() - 1;

        // sort_by is stable, so the new record lands after equal scores
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| self.entries[b].score.cmp(&self.entries[a].score));
        let rank = order.iter().position(|&i| i == inserted);

        self.entries = order.iter().map(|&i| self.entries[i].clone()).collect();
        self.entries.truncate(LEADERBOARD_SIZE);
        rank.filter(|&r| r < LEADERBOARD_SIZE)
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|r| r.score)
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_SIZE);
    }
}

// ============================================================================
// Persistence
// ============================================================================

pub trait ScoreStore {
    /// Never fails: missing or unreadable data yields an empty leaderboard.
    fn load(&self) -> Leaderboard;
    fn save(&self, leaderboard: &Leaderboard) -> Result<(), StoreError>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Leaderboard {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                debug!("no leaderboard at {}: {err}", self.path.display());
                return Leaderboard::new();
            }
        };
        match serde_json::from_str::<Vec<ScoreRecord>>(&text) {
            Ok(records) => Leaderboard::from_records(records),
            Err(err) => {
                warn!(
                    "ignoring corrupt leaderboard {}: {err}",
                    self.path.display()
                );
                Leaderboard::new()
            }
        }
    }

    fn save(&self, leaderboard: &Leaderboard) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(leaderboard)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// In-memory store. Clones share the same backing data, so a test can keep a
/// handle and inspect what a session saved.
#[derive(Clone, Default)]
pub struct MemoryStore {
    saved: Rc<RefCell<Option<Leaderboard>>>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leaderboard(leaderboard: Leaderboard) -> Self {
        Self {
            saved: Rc::new(RefCell::new(Some(leaderboard))),
            fail_saves: false,
        }
    }

    /// A store whose writes always fail, as with a read-only disk.
    pub fn failing() -> Self {
        Self {
            saved: Rc::default(),
            fail_saves: true,
        }
    }

    pub fn saved(&self) -> Option<Leaderboard> {
        self.saved.borrow().clone()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Leaderboard {
        self.saved.borrow().clone().unwrap_or_default()
    }

    fn save(&self, leaderboard: &Leaderboard) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        *self.saved.borrow_mut() = Some(leaderboard.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_reports_position_after_sort() {
        let mut board = Leaderboard::new();
        assert_eq!(board.insert(ScoreRecord::new(100, "a")), Some(0));
        assert_eq!(board.insert(ScoreRecord::new(300, "b")), Some(0));
        assert_eq!(board.insert(ScoreRecord::new(200, "c")), Some(1));
        assert_eq!(board.best(), Some(300));
    }

    #[test]
    fn equal_scores_keep_insertion_order() {
        let mut board = Leaderboard::new();
        board.insert(ScoreRecord::new(50, "first"));
        assert_eq!(board.insert(ScoreRecord::new(50, "second")), Some(1));
        assert_eq!(board.entries()[0].date, "first");
    }

    #[test]
    fn serialises_as_plain_array() {
        let board = Leaderboard::from_records(vec![ScoreRecord::new(8, "2024-01-01")]);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"[{"score":8,"date":"2024-01-01"}]"#);
    }
}
