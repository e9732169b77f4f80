//! Lobby and game lifecycle
//!
//! Registered names wait in the lobby until enough players are present, then
//! a game is dealt with a random first player. When the game ends the session
//! falls back to the lobby and the next registration starts a new one.

use crate::config::{ConfigError, GameConfig};
use crate::deck::Deck;
use crate::game::{Game, Outbound};
use crate::interrupt::WindowId;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{Action, GameError, Packet};

pub struct Session {
    config: GameConfig,
    players_needed: usize,
    seed: Option<u64>,
    lobby: Vec<String>,
    game: Option<Game>,
    games_played: u64,
    rng: StdRng,
    outbox: Vec<Outbound>,
}

impl Session {
    pub fn new(
        config: GameConfig,
        players_needed: usize,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        config.validate(players_needed)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            players_needed,
            seed,
            lobby: Vec::new(),
            game: None,
            games_played: 0,
            rng,
            outbox: Vec::new(),
        })
    }

    /// Adds a freshly registered name and starts a game once the lobby is full
    pub fn player_joined(&mut self, name: &str) {
        if self.lobby.iter().any(|n| n == name) {
            return;
        }
        self.lobby.push(name.to_string());
        info!(
            "{} joined the lobby ({}/{})",
            name,
            self.lobby.len(),
            self.players_needed
        );
        self.outbox.push(Outbound::Broadcast {
            packet: Packet::Notify {
                text: format!(
                    "{} joined ({}/{} players)",
                    name,
                    self.lobby.len(),
                    self.players_needed
                ),
            },
        });

        if self.game.is_none() && self.lobby.len() >= self.players_needed {
            self.start_game();
        }
    }

    pub fn player_left(&mut self, name: &str) {
        self.lobby.retain(|n| n != name);
        if let Some(game) = self.game.as_mut() {
            game.remove_player(name);
        }
        self.collect();
    }

    pub fn handle_action(&mut self, name: &str, action: &Action) -> Result<(), GameError> {
        let game = self.game.as_mut().ok_or(GameError::MissingPrecondition)?;
        let result = game.apply(name, action);
        self.collect();
        result
    }

    pub fn window_expired(&mut self, window: WindowId) {
        if let Some(game) = self.game.as_mut() {
            game.window_expired(window);
        }
        self.collect();
    }

    pub fn drain_outbox(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn lobby(&self) -> &[String] {
        &self.lobby
    }

    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    fn start_game(&mut self) {
        let names: Vec<String> = self
            .lobby
            .iter()
            .take(self.players_needed)
            .cloned()
            .collect();
        // Reseed per game so consecutive games differ yet stay reproducible
        let seed = self.seed.map(|s| s.wrapping_add(self.games_played));

        match Game::new(names, Deck::standard(seed), self.config.clone()) {
            Ok(mut game) => {
                game.deal();
                let first = self.rng.gen_range(0..self.players_needed);
                game.start(first);
                self.games_played += 1;
                self.game = Some(game);
                self.collect();
            }
            Err(e) => warn!("Could not start a game: {}", e),
        }
    }

    fn collect(&mut self) {
        if let Some(game) = self.game.as_mut() {
            self.outbox.extend(game.drain_outbox());
            let over = game.is_over();
            if over {
                info!("Game finished, back to the lobby");
                self.game = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Card;
    use std::time::Duration;
    use tokio_test::assert_ok;

    fn session(players: usize) -> Session {
        let config = GameConfig {
            nope_window: Duration::ZERO,
            ..GameConfig::default()
        };
        Session::new(config, players, Some(3)).unwrap()
    }

    #[test]
    fn test_rejects_bad_player_count() {
        assert!(Session::new(GameConfig::default(), 9, None).is_err());
    }

    #[test]
    fn test_game_starts_when_lobby_is_full() {
        let mut session = session(3);
        session.player_joined("alice");
        session.player_joined("bob");
        assert!(session.game().is_none());

        session.player_joined("carol");
        let game = session.game().unwrap();
        assert_eq!(game.players().len(), 3);
        assert_eq!(game.stack(), &[Card::Draw]);

        let outbox = session.drain_outbox();
        assert!(outbox.iter().any(|o| matches!(
            o,
            Outbound::Broadcast {
                packet: Packet::TurnChanged { previous: None, .. }
            }
        )));
    }

    #[test]
    fn test_actions_without_game() {
        let mut session = session(2);
        session.player_joined("alice");
        assert_eq!(
            session.handle_action("alice", &Action::Draw),
            Err(GameError::MissingPrecondition)
        );
    }

    #[test]
    fn test_duplicate_join_ignored() {
        let mut session = session(2);
        session.player_joined("alice");
        session.player_joined("alice");
        assert_eq!(session.lobby(), &["alice".to_string()]);
        assert!(session.game().is_none());
    }

    #[test]
    fn test_leaving_ends_game_and_returns_to_lobby() {
        let mut session = session(2);
        session.player_joined("alice");
        session.player_joined("bob");
        assert!(session.game().is_some());
        session.drain_outbox();

        session.player_left("bob");
        assert!(session.game().is_none());
        assert_eq!(session.lobby(), &["alice".to_string()]);

        let outbox = session.drain_outbox();
        assert!(outbox.iter().any(|o| matches!(
            o,
            Outbound::Broadcast {
                packet: Packet::GameOver { winner: Some(w) }
            } if w == "alice"
        )));
        assert_eq!(
            session.handle_action("alice", &Action::Draw),
            Err(GameError::MissingPrecondition)
        );

        session.player_joined("carol");
        assert!(session.game().is_some());
        assert_eq!(session.games_played(), 2);
    }

    #[test]
    fn test_actions_are_routed_to_the_game() {
        let mut session = session(2);
        session.player_joined("alice");
        session.player_joined("bob");

        let current = session.game().unwrap().current_player().to_string();
        let other = if current == "alice" { "bob" } else { "alice" };

        assert_eq!(
            session.handle_action(other, &Action::Draw),
            Err(GameError::NotYourTurn)
        );
        assert_ok!(session.handle_action(&current, &Action::Draw));
    }
}
