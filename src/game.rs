use log::{debug, error, info, warn};

use crate::board::{Board, Direction, CELLS};
use crate::config::GameConfig;
use crate::leaderboard::{JsonFileStore, Leaderboard, ScoreRecord, ScoreStore};
use crate::merge::{self, CellEvent, MoveResult, Source};
use crate::spawn::{spawn, RandomTileProvider, Spawn, TileProvider};

// ============================================================================
// Configuration
// ============================================================================

pub const INITIAL_TILES: usize = 2;

// ============================================================================
// Types
// ============================================================================

/// Identity of one tile from its spawn until it is merged away.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct TileId(u64);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Active,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    TileSpawned { id: TileId, index: usize, value: u32 },
    TileMoved { id: TileId, from: usize, to: usize },
    TilesMerged { id: TileId, retired: TileId, index: usize, value: u32 },
    ScoreGained(u32),
    GameOver { score: u32, max_tile: u32 },
    ScoreCommitted { score: u32, rank: Option<usize> },
    NewGame,
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    board: Board,
    tile_ids: [Option<TileId>; CELLS],
    next_tile_id: u64,
    score: u32,
    max_tile: u32,
    state: GameState,
    committed: bool,
    leaderboard: Leaderboard,
    last_rank: Option<usize>,
    provider: Box<dyn TileProvider>,
    store: Box<dyn ScoreStore>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Starts a game with two spawned tiles, loading the leaderboard once.
    pub fn new(provider: Box<dyn TileProvider>, store: Box<dyn ScoreStore>) -> Self {
        let mut game = Self::with_board(Board::empty(), provider, store);
        game.seed_tiles();
        game
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let provider: Box<dyn TileProvider> = match config.seed {
            Some(seed) => Box::new(RandomTileProvider::seeded(seed, config.spawn)),
            None => Box::new(RandomTileProvider::from_entropy(config.spawn)),
        };
        let store = Box::new(JsonFileStore::new(config.leaderboard_path.clone()));
        Self::new(provider, store)
    }

    /// Starts from an arbitrary position without seeding tiles.
    pub fn with_board(
        board: Board,
        provider: Box<dyn TileProvider>,
        store: Box<dyn ScoreStore>,
    ) -> Self {
        let leaderboard = store.load();
        let mut game = Self {
            board,
            tile_ids: [None; CELLS],
            next_tile_id: 0,
            score: 0,
            max_tile: 0,
            state: GameState::Active,
            committed: false,
            leaderboard,
            last_rank: None,
            provider,
            store,
            events: Vec::new(),
        };
        for index in 0..CELLS {
            if game.board.get(index) != 0 {
                game.tile_ids[index] = Some(game.mint_tile_id());
            }
        }
        game
    }

    /// Slides the board. Returns false, touching nothing, when the move
    /// changes no cell or the game is over.
    pub fn apply_move(&mut self, direction: Direction) -> bool {
        if self.state != GameState::Active {
            return false;
        }

        let result = merge::apply_move(&self.board, direction);
        if !result.changed {
            return false;
        }

        self.thread_tile_ids(&result);
        self.board = result.board;
        self.score += result.score_gained;
        self.max_tile = self.max_tile.max(result.max_tile_this_move);
        if result.score_gained > 0 {
            self.events.push(GameEvent::ScoreGained(result.score_gained));
        }
        debug!(
            "{direction:?}: {} merges, +{} (score {})",
            result.merge_count(),
            result.score_gained,
            self.score
        );

        self.spawn_tile();
        if self.board.is_terminal() {
            self.enter_game_over();
        }
        true
    }

    /// Starts over. An unfinished game with points is recorded first.
    pub fn new_game(&mut self) {
        if self.state == GameState::Active && self.score > 0 {
            self.commit_score();
        }

        self.board = Board::empty();
        self.tile_ids = [None; CELLS];
        self.score = 0;
        self.max_tile = 0;
        self.state = GameState::Active;
        self.committed = false;

        self.seed_tiles();
        self.events.push(GameEvent::NewGame);
        info!("new game");
    }

    /// Records an unfinished game with points when the session ends.
    pub fn finish(&mut self) {
        if self.state == GameState::Active && self.score > 0 {
            self.commit_score();
        }
    }

    fn seed_tiles(&mut self) {
        for _ in 0..INITIAL_TILES {
            self.spawn_tile();
        }
    }

    fn spawn_tile(&mut self) {
        match spawn(&self.board, self.provider.as_mut()) {
            Some(Spawn {
                board,
                index,
                value,
            }) => {
                let id = self.mint_tile_id();
                self.board = board;
                self.tile_ids[index] = Some(id);
                self.events
                    .push(GameEvent::TileSpawned { id, index, value });
            }
            None => {
                if cfg!(debug_assertions) {
                    panic!("spawn attempted on a full board:\n{}", self.board);
                }
                error!("spawn attempted on a full board, skipping");
            }
        }
    }

    fn mint_tile_id(&mut self) -> TileId {
        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;
        id
    }

    /// Carries ids along with their tiles; a merge keeps the survivor's id.
    fn thread_tile_ids(&mut self, result: &MoveResult) {
        let previous = self.tile_ids;

        for event in result.events() {
            match event {
                CellEvent::Moved { from, to } => {
                    if let Some(id) = previous[from] {
                        self.events.push(GameEvent::TileMoved { id, from, to });
                    }
                }
                CellEvent::Merged {
                    survivor,
                    absorbed,
                    to,
                    value,
                } => {
                    if let (Some(id), Some(retired)) = (previous[survivor], previous[absorbed]) {
                        self.events.push(GameEvent::TilesMerged {
                            id,
                            retired,
                            index: to,
                            value,
                        });
                    }
                }
                CellEvent::Spawned { .. } => {}
            }
        }

        self.tile_ids = result.sources.map(|source| match source {
            Source::Empty => None,
            Source::Slid(from) => previous[from],
            Source::Merged { survivor, .. } => previous[survivor],
        });
    }

    fn enter_game_over(&mut self) {
        self.state = GameState::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            max_tile: self.max_tile,
        });
        info!("game over: score {}, max tile {}", self.score, self.max_tile);
        self.commit_score();
    }

    fn commit_score(&mut self) {
        if self.committed {
            return;
        }
        self.committed = true;

        let rank = self.leaderboard.insert(ScoreRecord::today(self.score));
        self.last_rank = rank;
        if let Err(err) = self.store.save(&self.leaderboard) {
            warn!("keeping leaderboard in memory only: {err}");
        }
        self.events.push(GameEvent::ScoreCommitted {
            score: self.score,
            rank,
        });
        info!("recorded score {} at rank {rank:?}", self.score);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Largest value produced by a merge this game, 0 before the first merge.
    pub fn max_tile(&self) -> u32 {
        self.max_tile
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn tile_id(&self, index: usize) -> Option<TileId> {
        self.tile_ids[index]
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Rank of the most recently recorded score, if it made the board.
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::leaderboard::MemoryStore;
    use crate::spawn::SequenceTileProvider;

    pub fn board(cells: [u32; CELLS]) -> Board {
        Board::from_cells(cells)
    }

    /// Full board with no equal neighbours.
    pub fn locked_board() -> Board {
        board([
            2, 4, 2, 4, //
            4, 2, 4, 2, //
            2, 4, 2, 4, //
            4, 2, 4, 2, //
        ])
    }

    pub fn scripted(spawns: Vec<(usize, u32)>) -> Box<dyn TileProvider> {
        Box::new(SequenceTileProvider::new(spawns))
    }

    /// Game on `cells` with scripted spawns and an inspectable in-memory store.
    pub fn game_on(cells: [u32; CELLS], spawns: Vec<(usize, u32)>) -> (Game, MemoryStore) {
        let store = MemoryStore::new();
        let game = Game::with_board(board(cells), scripted(spawns), Box::new(store.clone()));
        (game, store)
    }
}
