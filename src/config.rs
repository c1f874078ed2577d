use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::leaderboard::DEFAULT_LEADERBOARD_FILE;
use crate::spawn::{SpawnPolicy, DEFAULT_TWO_PROBABILITY};

pub const DEFAULT_SWIPE_THRESHOLD: u16 = 3;
pub const DEFAULT_LOG_FILE: &str = "zodiac2048.log";

#[derive(Parser, Debug)]
#[command(name = "zodiac2048")]
#[command(author, version, about = "2048 with zodiac animals, in the terminal")]
pub struct Args {
    /// Probability that a new tile is a 2 instead of a 4
    #[arg(long, default_value_t = DEFAULT_TWO_PROBABILITY)]
    pub two_probability: f64,

    /// Where the top-10 score history is kept
    #[arg(long, default_value = DEFAULT_LEADERBOARD_FILE)]
    pub leaderboard: PathBuf,

    /// Seed for reproducible tile spawns
    #[arg(long)]
    pub seed: Option<u64>,

    /// Minimum mouse drag, in rows, that counts as a swipe
    #[arg(long, default_value_t = DEFAULT_SWIPE_THRESHOLD)]
    pub swipe_threshold: u16,

    /// Print tile values under the glyphs
    #[arg(long)]
    pub numbers: bool,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. "warn", "debug"
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub spawn: SpawnPolicy,
    pub leaderboard_path: PathBuf,
    pub seed: Option<u64>,
    pub swipe_threshold: u16,
    pub show_numbers: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn: SpawnPolicy::default(),
            leaderboard_path: PathBuf::from(DEFAULT_LEADERBOARD_FILE),
            seed: None,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            show_numbers: false,
        }
    }
}

impl Args {
    pub fn into_config(self) -> Result<GameConfig, ConfigError> {
        if self.swipe_threshold == 0 {
            return Err(ConfigError::InvalidSwipeThreshold);
        }
        Ok(GameConfig {
            spawn: SpawnPolicy::new(self.two_probability)?,
            leaderboard_path: self.leaderboard,
            seed: self.seed,
            swipe_threshold: self.swipe_threshold,
            show_numbers: self.numbers,
        })
    }

    /// Log destination: the explicit file, or a default one when `RUST_LOG`
    /// asks for logging.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            std::env::var_os("RUST_LOG").map(|_| PathBuf::from(DEFAULT_LOG_FILE))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_rules() {
        let config = Args::parse_from(["zodiac2048"]).into_config().unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.spawn.two_probability(), 0.9);
    }

    #[test]
    fn alternate_spawn_rate_is_accepted() {
        let config = Args::parse_from(["zodiac2048", "--two-probability", "0.7", "--seed", "5"])
            .into_config()
            .unwrap();
        assert_eq!(config.spawn.two_probability(), 0.7);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Args::parse_from(["zodiac2048", "--two-probability", "2"])
            .into_config()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidProbability(2.0));

        let err = Args::parse_from(["zodiac2048", "--swipe-threshold", "0"])
            .into_config()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidSwipeThreshold);
    }
}
