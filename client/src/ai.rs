//! Computer-controlled player
//!
//! Plays by simple rules: avoid a kitten it knows is coming, peek when it
//! knows nothing, Nope an Attack aimed at it, and never give away a Defuse if
//! anything else will do.

use crate::decision::{Decision, DecisionSource};
use crate::game::{ClientGameState, Prompt};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use shared::{Action, Card, GameError};

/// Cards in the order the computer is happiest to give them away
const GIVE_AWAY_ORDER: [Card; 12] = [
    Card::BeardCat,
    Card::Tacocat,
    Card::RainbowRalphingCat,
    Card::HairyPotatoCat,
    Card::Cattermelon,
    Card::Favor,
    Card::Shuffle,
    Card::SeeTheFuture,
    Card::Skip,
    Card::Attack,
    Card::Nope,
    Card::Defuse,
];

pub struct ComputerPlayer {
    rng: StdRng,
    /// Chance of playing a Favor when nothing better is on
    favor_rate: f64,
    /// Targets already refused for the current favor
    refused_targets: Vec<String>,
    last_target: Option<String>,
}

impl ComputerPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            favor_rate: 0.3,
            refused_targets: Vec::new(),
            last_target: None,
        }
    }

    pub fn decide(&mut self, prompt: &Prompt, state: &ClientGameState) -> Action {
        match prompt {
            Prompt::PlayOrDraw => self.turn_move(state),
            Prompt::ChooseTarget { candidates } => {
                let open: Vec<&String> = candidates
                    .iter()
                    .filter(|c| !self.refused_targets.contains(c))
                    .collect();
                let pick = open
                    .choose(&mut self.rng)
                    .map(|c| c.to_string())
                    .or_else(|| candidates.first().cloned())
                    .unwrap_or_default();
                self.last_target = Some(pick.clone());
                Action::ChooseTarget { name: pick }
            }
            Prompt::GiveCard { .. } => Action::GiveCard {
                card: Self::least_valuable(&state.hand).unwrap_or(Card::Defuse),
            },
            Prompt::Placement { max_index } => {
                // Near the top hurts the next player most
                let index = if self.rng.gen_bool(0.5) {
                    *max_index
                } else {
                    self.rng.gen_range(0..=*max_index)
                };
                Action::PlaceCard { index }
            }
        }
    }

    fn turn_move(&mut self, state: &ClientGameState) -> Action {
        let play = |card| Action::PlayCard { card };

        let attacked = state.top_card == Some(Card::Attack)
            && state.previous.as_deref().is_some_and(|p| !state.is_me(p));
        if attacked && state.has_card(Card::Nope) {
            return play(Card::Nope);
        }

        if state.future.first() == Some(&Card::ExplodingKitten) {
            for escape in [Card::Skip, Card::Attack, Card::Shuffle] {
                if state.has_card(escape) {
                    return play(escape);
                }
            }
        }

        if state.future.is_empty() && state.has_card(Card::SeeTheFuture) && state.deck_size > 0 {
            return play(Card::SeeTheFuture);
        }

        if state.has_card(Card::Favor) && self.rng.gen_bool(self.favor_rate) {
            self.refused_targets.clear();
            return play(Card::Favor);
        }

        Action::Draw
    }

    fn least_valuable(hand: &[Card]) -> Option<Card> {
        GIVE_AWAY_ORDER
            .iter()
            .copied()
            .find(|card| hand.contains(card))
            .or_else(|| hand.first().copied())
    }
}

impl DecisionSource for ComputerPlayer {
    fn on_prompt(&mut self, prompt: &Prompt, state: &ClientGameState) -> Option<Decision> {
        let action = self.decide(prompt, state);
        debug!("Computer answers {:?} with {:?}", prompt, action);
        Some(Decision::Act(action))
    }

    fn on_input(&mut self, line: &str, _state: &ClientGameState) -> Option<Decision> {
        match line.trim() {
            "quit" | "exit" => Some(Decision::Quit),
            "" => None,
            text => Some(Decision::Chat(text.to_string())),
        }
    }

    /// Falls back to the plainest answer so a refusal cannot loop
    fn on_rejected(
        &mut self,
        error: GameError,
        prompt: Option<&Prompt>,
        state: &ClientGameState,
    ) -> Option<Decision> {
        debug!("Computer move rejected: {}", error);
        let action = match prompt? {
            Prompt::PlayOrDraw => Action::Draw,
            Prompt::ChooseTarget { candidates } => {
                if let Some(name) = self.last_target.take() {
                    self.refused_targets.push(name);
                }
                if candidates.iter().all(|c| self.refused_targets.contains(c)) {
                    self.refused_targets.clear();
                }
                self.decide(prompt?, state)
            }
            Prompt::GiveCard { .. } => Action::GiveCard {
                card: *state.hand.first()?,
            },
            Prompt::Placement { .. } => Action::PlaceCard { index: 0 },
        };
        Some(Decision::Act(action))
    }
}
