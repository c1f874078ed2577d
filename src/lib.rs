pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod glyph;
pub mod input;
pub mod leaderboard;
pub mod merge;
pub mod spawn;
