//! Session parameters for the game core and command-line configuration for the server binary

use clap::Parser;
use shared::{
    DEFAULT_HAND_SIZE, DEFUSES_COUNT, FUTURE_PEEK, MAX_PLAYERS, MIN_PLAYERS, NOPE_DELAY_SECS,
};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("player count {count} is outside {min}..={max}")]
    PlayerCount { count: usize, min: usize, max: usize },
    #[error("defuse pool of {pool} cannot hand one defuse to each of {players} players")]
    DefusePool { pool: usize, players: usize },
    #[error("hand size must be at least 1")]
    HandSize,
}

/// Parameters the game core is constructed with
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Cards per starting hand, including the guaranteed Defuse
    pub hand_size: usize,
    /// Total Defuses in the game; one goes to each player, the rest into the deck
    pub defuse_pool: usize,
    /// How long a delayed card stays open for Nopes
    pub nope_window: Duration,
    /// Cards revealed by See-the-future
    pub future_peek: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_size: DEFAULT_HAND_SIZE,
            defuse_pool: DEFUSES_COUNT,
            nope_window: Duration::from_secs(NOPE_DELAY_SECS),
            future_peek: FUTURE_PEEK,
        }
    }
}

impl GameConfig {
    pub fn validate(&self, player_count: usize) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(ConfigError::PlayerCount {
                count: player_count,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }
        if self.defuse_pool < player_count {
            return Err(ConfigError::DefusePool {
                pool: self.defuse_pool,
                players: player_count,
            });
        }
        if self.hand_size == 0 {
            return Err(ConfigError::HandSize);
        }
        Ok(())
    }
}

/// Command line arguments of the server binary
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "25500")]
    pub port: u16,

    /// Number of registered players needed to start a game
    #[arg(short = 'n', long, default_value = "2")]
    pub players: usize,

    /// Seconds a delayed card stays open for Nopes
    #[arg(long, default_value_t = NOPE_DELAY_SECS)]
    pub nope_window_secs: u64,

    /// Seconds of silence after which a client counts as disconnected
    #[arg(long, default_value = "5")]
    pub client_timeout_secs: u64,

    /// Maximum number of connected clients, spectators included
    #[arg(long, default_value = "8")]
    pub max_clients: usize,

    /// Seed for a reproducible deck order
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            nope_window: Duration::from_secs(self.nope_window_secs),
            ..GameConfig::default()
        }
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game_config().validate(self.players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.hand_size, 7);
        assert_eq!(config.defuse_pool, 6);
        assert_eq!(config.nope_window, Duration::from_secs(10));
        assert_eq!(config.future_peek, 3);
    }

    #[test]
    fn test_player_count_bounds() {
        let config = GameConfig::default();
        for count in 2..=6 {
            assert!(config.validate(count).is_ok());
        }
        assert!(matches!(
            config.validate(1),
            Err(ConfigError::PlayerCount { count: 1, .. })
        ));
        assert!(matches!(
            config.validate(7),
            Err(ConfigError::PlayerCount { count: 7, .. })
        ));
    }

    #[test]
    fn test_small_defuse_pool() {
        let config = GameConfig {
            defuse_pool: 3,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(4),
            Err(ConfigError::DefusePool { pool: 3, players: 4 })
        );
    }

    #[test]
    fn test_server_args() {
        let args = ServerConfig::parse_from(["server", "-n", "4", "--nope-window-secs", "3", "--seed", "9"]);
        assert_eq!(args.players, 4);
        assert_eq!(args.address(), "127.0.0.1:25500");
        assert_eq!(args.game_config().nope_window, Duration::from_secs(3));
        assert_eq!(args.seed, Some(9));
        assert!(args.validate().is_ok());
    }
}
