//! Where a client's moves come from
//!
//! The network loop does not care whether a person types the moves or the
//! computer picks them; both sit behind [`DecisionSource`].

use crate::game::{ClientGameState, Prompt};
use shared::{Action, GameError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Act(Action),
    Chat(String),
    Quit,
}

pub trait DecisionSource {
    /// The server is waiting on `prompt`; answer now or return `None` to wait for input
    fn on_prompt(&mut self, prompt: &Prompt, state: &ClientGameState) -> Option<Decision>;

    /// A line typed on the terminal
    fn on_input(&mut self, line: &str, state: &ClientGameState) -> Option<Decision>;

    /// The last action was refused; `prompt` is the question still open, if any
    fn on_rejected(
        &mut self,
        error: GameError,
        prompt: Option<&Prompt>,
        state: &ClientGameState,
    ) -> Option<Decision>;
}
