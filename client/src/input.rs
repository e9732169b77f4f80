//! Terminal input for a human player
//!
//! Explicit commands work at any time. A bare card name, hand index, player
//! name or deck position answers whatever the server is currently asking.

use crate::decision::{Decision, DecisionSource};
use crate::game::{ClientGameState, Prompt};
use crate::rendering;
use shared::{Action, Card, GameError, UnknownCard};
use std::io::BufRead;
use thiserror::Error;
use tokio::sync::mpsc;

pub const HELP: &str = "\
Commands:
  draw | d                 draw a card and end your turn
  play <card|#>            play a card by name or hand position
  nope                     play a Nope, any time
  target <name|#>          pick the player to ask for a favor
  give <card|#>            hand over a card you were asked for
  place <n>                put the exploding kitten back, 0 = bottom
  hand                     show your hand
  !<text> | say <text>     chat
  quit                     leave the game
A bare card, name or number answers the current question.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("type something, or 'help'")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error(transparent)]
    UnknownCard(#[from] UnknownCard),
    #[error("there is no entry #{0}")]
    BadIndex(usize),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("nobody asked you anything, use an explicit command")]
    NothingAsked,
}

pub struct HumanPlayer;

impl HumanPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HumanPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionSource for HumanPlayer {
    fn on_prompt(&mut self, prompt: &Prompt, state: &ClientGameState) -> Option<Decision> {
        println!("{}", rendering::prompt_text(prompt, state));
        None
    }

    fn on_input(&mut self, line: &str, state: &ClientGameState) -> Option<Decision> {
        match line.trim() {
            "help" | "?" => {
                println!("{}", HELP);
                None
            }
            "hand" => {
                println!("{}", rendering::hand_line(state));
                None
            }
            _ => match parse_command(line, state) {
                Ok(decision) => Some(decision),
                Err(e) => {
                    println!("{}", e);
                    None
                }
            },
        }
    }

    fn on_rejected(
        &mut self,
        _error: GameError,
        prompt: Option<&Prompt>,
        state: &ClientGameState,
    ) -> Option<Decision> {
        if let Some(prompt) = prompt {
            println!("{}", rendering::prompt_text(prompt, state));
        }
        None
    }
}

/// Reads stdin on its own thread so a pending read never holds up shutdown
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Turns a typed line into a decision
pub fn parse_command(line: &str, state: &ClientGameState) -> Result<Decision, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(InputError::Empty);
    }
    if let Some(text) = line.strip_prefix('!') {
        return Ok(Decision::Chat(text.trim().to_string()));
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let argument = |name: &'static str| {
        if rest.is_empty() {
            Err(InputError::MissingArgument(name))
        } else {
            Ok(rest)
        }
    };

    let action = match command.to_ascii_lowercase().as_str() {
        "quit" | "exit" => return Ok(Decision::Quit),
        "say" => return Ok(Decision::Chat(argument("say")?.to_string())),
        "draw" | "d" => Action::Draw,
        "nope" => Action::PlayCard { card: Card::Nope },
        "play" | "p" => Action::PlayCard {
            card: card_from(argument("play")?, state)?,
        },
        "give" => Action::GiveCard {
            card: card_from(argument("give")?, state)?,
        },
        "target" => Action::ChooseTarget {
            name: target_from(argument("target")?, state)?,
        },
        "place" => Action::PlaceCard {
            index: number(argument("place")?)?,
        },
        _ => return answer(line, state),
    };

    Ok(Decision::Act(action))
}

/// Interprets a bare word as the answer to the open prompt
fn answer(line: &str, state: &ClientGameState) -> Result<Decision, InputError> {
    let action = match state.prompt() {
        Some(Prompt::PlayOrDraw) => Action::PlayCard {
            card: card_from(line, state)?,
        },
        Some(Prompt::GiveCard { .. }) => Action::GiveCard {
            card: card_from(line, state)?,
        },
        Some(Prompt::ChooseTarget { .. }) => Action::ChooseTarget {
            name: target_from(line, state)?,
        },
        Some(Prompt::Placement { .. }) => Action::PlaceCard {
            index: number(line)?,
        },
        None => {
            let word = line.split_whitespace().next().unwrap_or(line);
            return Err(if line.parse::<Card>().is_ok() {
                InputError::NothingAsked
            } else {
                InputError::UnknownCommand(word.to_string())
            });
        }
    };
    Ok(Decision::Act(action))
}

fn number(text: &str) -> Result<usize, InputError> {
    text.parse()
        .map_err(|_| InputError::UnknownCommand(text.to_string()))
}

/// Card by 1-based hand position or by name
fn card_from(text: &str, state: &ClientGameState) -> Result<Card, InputError> {
    if let Ok(position) = text.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|i| state.hand.get(i).copied())
            .ok_or(InputError::BadIndex(position));
    }
    Ok(text.parse::<Card>()?)
}

/// Player by 1-based position in the candidate list or by name
fn target_from(text: &str, state: &ClientGameState) -> Result<String, InputError> {
    if let Ok(position) = text.parse::<usize>() {
        let candidates: &[String] = match state.prompt() {
            Some(Prompt::ChooseTarget { candidates }) => candidates.as_slice(),
            _ => &[],
        };
        return position
            .checked_sub(1)
            .and_then(|i| candidates.get(i).cloned())
            .ok_or(InputError::BadIndex(position));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Packet;
    use tokio_test::{assert_err, assert_ok};

    fn state_with(prompt: Option<Packet>) -> ClientGameState {
        let mut state = ClientGameState::new();
        state.apply(&Packet::Connected {
            name: "alice".to_string(),
        });
        state.apply(&Packet::PlayerUpdate {
            hand: vec![Card::Skip, Card::Tacocat, Card::Nope],
            top_card: None,
            deck_size: 20,
        });
        if let Some(packet) = prompt {
            state.apply(&packet);
        }
        state
    }

    fn my_turn() -> Option<Packet> {
        Some(Packet::TurnChanged {
            previous: None,
            current: "alice".to_string(),
        })
    }

    #[test]
    fn test_explicit_commands() {
        let state = state_with(None);

        assert_eq!(parse_command("draw", &state), Ok(Decision::Act(Action::Draw)));
        assert_eq!(
            parse_command("nope", &state),
            Ok(Decision::Act(Action::PlayCard { card: Card::Nope }))
        );
        assert_eq!(
            parse_command("play see the future", &state),
            Ok(Decision::Act(Action::PlayCard {
                card: Card::SeeTheFuture
            }))
        );
        assert_eq!(
            parse_command("place 4", &state),
            Ok(Decision::Act(Action::PlaceCard { index: 4 }))
        );
        assert_eq!(parse_command("quit", &state), Ok(Decision::Quit));
        assert_ok!(parse_command("d", &state));
    }

    #[test]
    fn test_chat() {
        let state = state_with(None);
        assert_eq!(
            parse_command("!hello there", &state),
            Ok(Decision::Chat("hello there".to_string()))
        );
        assert_eq!(
            parse_command("say hi", &state),
            Ok(Decision::Chat("hi".to_string()))
        );
    }

    #[test]
    fn test_hand_positions_are_one_based() {
        let state = state_with(my_turn());
        assert_eq!(
            parse_command("2", &state),
            Ok(Decision::Act(Action::PlayCard {
                card: Card::Tacocat
            }))
        );
        assert_eq!(parse_command("0", &state), Err(InputError::BadIndex(0)));
        assert_eq!(parse_command("9", &state), Err(InputError::BadIndex(9)));
    }

    #[test]
    fn test_bare_answers_follow_prompt() {
        let state = state_with(Some(Packet::AskTarget {
            candidates: vec!["bob".to_string(), "carol".to_string()],
        }));
        assert_eq!(
            parse_command("2", &state),
            Ok(Decision::Act(Action::ChooseTarget {
                name: "carol".to_string()
            }))
        );
        assert_eq!(
            parse_command("bob", &state),
            Ok(Decision::Act(Action::ChooseTarget {
                name: "bob".to_string()
            }))
        );

        let state = state_with(Some(Packet::AskPlacement { max_index: 5 }));
        assert_eq!(
            parse_command("0", &state),
            Ok(Decision::Act(Action::PlaceCard { index: 0 }))
        );

        let state = state_with(Some(Packet::AskGiveCard {
            requester: "bob".to_string(),
        }));
        assert_eq!(
            parse_command("tacocat", &state),
            Ok(Decision::Act(Action::GiveCard {
                card: Card::Tacocat
            }))
        );
    }

    #[test]
    fn test_errors() {
        let state = state_with(None);
        assert_eq!(parse_command("   ", &state), Err(InputError::Empty));
        assert_eq!(parse_command("skip", &state), Err(InputError::NothingAsked));
        assert_eq!(
            parse_command("dance wildly", &state),
            Err(InputError::UnknownCommand("dance".to_string()))
        );
        assert_eq!(
            parse_command("play", &state),
            Err(InputError::MissingArgument("play"))
        );
        assert!(matches!(
            parse_command("play joker", &state),
            Err(InputError::UnknownCard(_))
        ));
        assert_err!(parse_command("place top", &state));
    }
}
