use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::error::ConfigError;

// ============================================================================
// Configuration
// ============================================================================

/// Chance that a spawned tile is a 2 rather than a 4.
pub const DEFAULT_TWO_PROBABILITY: f64 = 0.9;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SpawnPolicy {
    two_probability: f64,
}

impl SpawnPolicy {
    pub fn new(two_probability: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&two_probability) {
            return Err(ConfigError::InvalidProbability(two_probability));
        }
        Ok(Self { two_probability })
    }

    pub fn two_probability(&self) -> f64 {
        self.two_probability
    }
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            two_probability: DEFAULT_TWO_PROBABILITY,
        }
    }
}

// ============================================================================
// Tile Provider Trait
// ============================================================================

pub trait TileProvider {
    /// Picks one entry of `empty` (never empty itself) and the value to put there.
    fn next_tile(&mut self, empty: &[usize]) -> (usize, u32);
}

pub struct RandomTileProvider<R> {
    rng: R,
    policy: SpawnPolicy,
}

impl<R: Rng> RandomTileProvider<R> {
    pub fn new(rng: R, policy: SpawnPolicy) -> Self {
        Self { rng, policy }
    }
}

impl RandomTileProvider<StdRng> {
    pub fn from_entropy(policy: SpawnPolicy) -> Self {
        Self::new(StdRng::from_entropy(), policy)
    }

    pub fn seeded(seed: u64, policy: SpawnPolicy) -> Self {
        Self::new(StdRng::seed_from_u64(seed), policy)
    }
}

impl<R: Rng> TileProvider for RandomTileProvider<R> {
    fn next_tile(&mut self, empty: &[usize]) -> (usize, u32) {
        let index = empty[self.rng.gen_range(0..empty.len())];
        let value = if self.rng.gen_bool(self.policy.two_probability) {
            2
        } else {
            4
        };
        (index, value)
    }
}

/// Replays a fixed list of `(index, value)` spawns, cycling when exhausted.
/// A scripted index that is occupied falls back to the first empty cell.
pub struct SequenceTileProvider {
    tiles: Vec<(usize, u32)>,
    index: usize,
}

impl SequenceTileProvider {
    pub fn new(tiles: Vec<(usize, u32)>) -> Self {
        Self { tiles, index: 0 }
    }
}

impl TileProvider for SequenceTileProvider {
    fn next_tile(&mut self, empty: &[usize]) -> (usize, u32) {
        let (wanted, value) = self
            .tiles
            .get(self.index % self.tiles.len().max(1))
            .copied()
            .unwrap_or((empty[0], 2));
        self.index += 1;
        if empty.contains(&wanted) {
            (wanted, value)
        } else {
            (empty[0], value)
        }
    }
}

// ============================================================================
// Spawning
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Spawn {
    pub board: Board,
    pub index: usize,
    pub value: u32,
}

/// Places one new tile in an empty cell. Returns `None` on a full board.
pub fn spawn(board: &Board, provider: &mut dyn TileProvider) -> Option<Spawn> {
    let empty = board.empty_indices();
    if empty.is_empty() {
        return None;
    }

    let (index, value) = provider.next_tile(&empty);
    debug_assert!(empty.contains(&index), "provider picked occupied cell {index}");
    debug_assert!(value == 2 || value == 4, "spawned value {value} is not 2 or 4");

    Some(Spawn {
        board: board.with_cell(index, value),
        index,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rejects_out_of_range() {
        assert!(SpawnPolicy::new(0.7).is_ok());
        assert_eq!(
            SpawnPolicy::new(1.5),
            Err(ConfigError::InvalidProbability(1.5))
        );
        assert!(SpawnPolicy::new(f64::NAN).is_err());
    }

    #[test]
    fn always_two_policy_only_spawns_twos() {
        let mut provider = RandomTileProvider::seeded(7, SpawnPolicy::new(1.0).unwrap());
        for _ in 0..50 {
            let (_, value) = provider.next_tile(&[0, 1, 2]);
            assert_eq!(value, 2);
        }
    }

    #[test]
    fn sequence_falls_back_when_cell_taken() {
        let mut provider = SequenceTileProvider::new(vec![(5, 4)]);
        assert_eq!(provider.next_tile(&[3, 9]), (3, 4));
    }
}
