//! Client-side view of the table, rebuilt from server packets
//!
//! The client holds no authority. It mirrors what the server told it and keeps
//! track of which question, if any, the server is currently waiting on.

use log::debug;
use shared::{Card, Packet};

/// A question from the server that this player has to answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Our turn: play a card or draw
    PlayOrDraw,
    ChooseTarget { candidates: Vec<String> },
    GiveCard { requester: String },
    Placement { max_index: usize },
}

#[derive(Debug, Clone, Default)]
pub struct ClientGameState {
    pub me: Option<String>,
    pub hand: Vec<Card>,
    pub top_card: Option<Card>,
    pub deck_size: usize,
    pub current: Option<String>,
    pub previous: Option<String>,
    /// Known top of the deck from See-the-future, topmost first
    pub future: Vec<Card>,
    pub eliminated: Vec<String>,
    pub game_over: bool,
    pub winner: Option<String>,
    prompt: Option<Prompt>,
    /// Prompt the last submitted action answered, restored if it is rejected
    answered: Option<Prompt>,
}

impl ClientGameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_me(&self, name: &str) -> bool {
        self.me.as_deref() == Some(name)
    }

    pub fn is_my_turn(&self) -> bool {
        !self.game_over && self.current.as_deref().is_some_and(|c| self.is_me(c))
    }

    pub fn is_out(&self) -> bool {
        self.me
            .as_ref()
            .is_some_and(|me| self.eliminated.contains(me))
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn has_card(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    /// Marks the pending prompt as answered
    pub fn submitted(&mut self) {
        if let Some(prompt) = self.prompt.take() {
            self.answered = Some(prompt);
        }
    }

    /// Reopens the prompt whose answer the server refused
    pub fn rejected(&mut self) -> Option<Prompt> {
        if self.prompt.is_none() {
            self.prompt = self.answered.take();
        }
        self.prompt.clone()
    }

    /// Applies a server packet; returns a prompt that newly needs an answer
    pub fn apply(&mut self, packet: &Packet) -> Option<Prompt> {
        match packet {
            Packet::Connected { name } => {
                self.me = Some(name.clone());
                None
            }

            Packet::PlayerUpdate {
                hand,
                top_card,
                deck_size,
            } => {
                self.leave_finished_game();
                self.track_future(*top_card, *deck_size);
                self.hand = hand.clone();
                self.top_card = *top_card;
                self.deck_size = *deck_size;
                None
            }

            Packet::TurnChanged { previous, current } => {
                self.leave_finished_game();
                self.previous = previous.clone();
                self.current = Some(current.clone());

                if self.is_my_turn() && matches!(self.prompt, None | Some(Prompt::PlayOrDraw)) {
                    self.open(Prompt::PlayOrDraw)
                } else {
                    if self.prompt == Some(Prompt::PlayOrDraw) {
                        self.prompt = None;
                    }
                    None
                }
            }

            Packet::MoveConfirmed => {
                self.answered = None;
                if self.is_my_turn() && self.prompt.is_none() && !self.is_out() {
                    self.open(Prompt::PlayOrDraw)
                } else {
                    None
                }
            }

            Packet::AskTarget { candidates } => self.open(Prompt::ChooseTarget {
                candidates: candidates.clone(),
            }),
            Packet::AskGiveCard { requester } => self.open(Prompt::GiveCard {
                requester: requester.clone(),
            }),
            Packet::AskPlacement { max_index } => {
                // We know where the kitten goes, but nothing else survives
                self.future.clear();
                self.open(Prompt::Placement {
                    max_index: *max_index,
                })
            }

            Packet::FutureCards { cards } => {
                self.future = cards.clone();
                None
            }

            Packet::Eliminated { name } => {
                if !self.eliminated.contains(name) {
                    self.eliminated.push(name.clone());
                }
                if self.is_me(name) {
                    self.prompt = None;
                    self.hand.clear();
                }
                None
            }

            Packet::GameOver { winner } => {
                self.game_over = true;
                self.winner = winner.clone();
                self.prompt = None;
                self.answered = None;
                None
            }

            _ => None,
        }
    }

    fn open(&mut self, prompt: Prompt) -> Option<Prompt> {
        debug!("Server asks: {:?}", prompt);
        self.prompt = Some(prompt.clone());
        Some(prompt)
    }

    fn track_future(&mut self, top_card: Option<Card>, deck_size: usize) {
        if top_card == Some(Card::Shuffle) && self.top_card != Some(Card::Shuffle) {
            self.future.clear();
        } else if deck_size < self.deck_size {
            let drawn = (self.deck_size - deck_size).min(self.future.len());
            self.future.drain(..drawn);
        } else if deck_size > self.deck_size {
            self.future.clear();
        }
    }

    /// Anything but a lobby notice after a game over belongs to the next game
    fn leave_finished_game(&mut self) {
        if self.game_over {
            let me = self.me.take();
            *self = Self::default();
            self.me = me;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(name: &str) -> ClientGameState {
        let mut state = ClientGameState::new();
        state.apply(&Packet::Connected {
            name: name.to_string(),
        });
        state
    }

    fn turn(previous: Option<&str>, current: &str) -> Packet {
        Packet::TurnChanged {
            previous: previous.map(str::to_string),
            current: current.to_string(),
        }
    }

    #[test]
    fn test_turn_prompts() {
        let mut state = joined("alice");

        assert_eq!(state.apply(&turn(None, "alice")), Some(Prompt::PlayOrDraw));
        assert!(state.is_my_turn());

        assert_eq!(state.apply(&turn(Some("alice"), "bob")), None);
        assert_eq!(state.prompt(), None);
        assert_eq!(state.previous.as_deref(), Some("alice"));
    }

    #[test]
    fn test_confirmation_reopens_turn() {
        let mut state = joined("alice");
        state.apply(&turn(None, "alice"));
        state.submitted();
        assert_eq!(state.prompt(), None);

        assert_eq!(state.apply(&Packet::MoveConfirmed), Some(Prompt::PlayOrDraw));
    }

    #[test]
    fn test_confirmation_off_turn_does_nothing() {
        let mut state = joined("bob");
        state.apply(&turn(None, "alice"));
        assert_eq!(state.apply(&Packet::MoveConfirmed), None);
    }

    #[test]
    fn test_rejection_restores_prompt() {
        let mut state = joined("alice");
        state.apply(&turn(None, "alice"));
        state.apply(&Packet::AskTarget {
            candidates: vec!["bob".to_string()],
        });
        state.submitted();

        assert_eq!(
            state.rejected(),
            Some(Prompt::ChooseTarget {
                candidates: vec!["bob".to_string()]
            })
        );
    }

    #[test]
    fn test_future_follows_draws() {
        let mut state = joined("alice");
        state.apply(&Packet::PlayerUpdate {
            hand: vec![],
            top_card: None,
            deck_size: 10,
        });
        state.apply(&Packet::FutureCards {
            cards: vec![Card::Skip, Card::ExplodingKitten, Card::Nope],
        });

        state.apply(&Packet::PlayerUpdate {
            hand: vec![Card::Skip],
            top_card: Some(Card::SeeTheFuture),
            deck_size: 9,
        });
        assert_eq!(state.future, vec![Card::ExplodingKitten, Card::Nope]);

        state.apply(&Packet::PlayerUpdate {
            hand: vec![Card::Skip],
            top_card: Some(Card::Shuffle),
            deck_size: 9,
        });
        assert!(state.future.is_empty());
    }

    #[test]
    fn test_elimination_and_game_over() {
        let mut state = joined("alice");
        state.apply(&turn(None, "alice"));
        state.apply(&Packet::Eliminated {
            name: "alice".to_string(),
        });
        assert!(state.is_out());
        assert_eq!(state.prompt(), None);

        state.apply(&Packet::GameOver {
            winner: Some("bob".to_string()),
        });
        assert!(state.game_over);
        assert!(!state.is_my_turn());

        // A new game starts with a clean table
        assert_eq!(state.apply(&turn(None, "alice")), Some(Prompt::PlayOrDraw));
        assert!(!state.is_out());
        assert!(!state.game_over);
        assert_eq!(state.me.as_deref(), Some("alice"));
    }
}
