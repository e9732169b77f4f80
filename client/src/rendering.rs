//! Plain-text rendering of server packets and prompts for the terminal

use crate::game::{ClientGameState, Prompt};
use shared::{Card, Packet};

/// Turns server packets into lines for the terminal
pub struct Renderer {
    /// Repeated hand updates are folded into one line
    last_hand: Option<Vec<Card>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self { last_hand: None }
    }

    /// Prints whatever `packet` has to say. Call before the state applies it.
    pub fn render(&mut self, packet: &Packet, state: &ClientGameState) {
        if let Some(text) = self.packet_text(packet, state) {
            println!("{}", text);
        }
    }

    pub fn packet_text(&mut self, packet: &Packet, state: &ClientGameState) -> Option<String> {
        let text = match packet {
            Packet::Connected { name } => format!("Joined as {}. Waiting for the table to fill...", name),
            Packet::Rejected { error } => format!("Refused: {}", error),
            Packet::PlayerUpdate {
                hand,
                top_card,
                deck_size,
            } => {
                if self.last_hand.as_ref() == Some(hand) && *deck_size == state.deck_size {
                    return None;
                }
                self.last_hand = Some(hand.clone());
                let top = top_card.map_or("nothing".to_string(), |c| c.to_string());
                format!(
                    "Deck: {} cards | Top of discard: {}\n{}",
                    deck_size,
                    top,
                    cards_line("Your hand", hand)
                )
            }
            Packet::TurnChanged { current, .. } => {
                if state.is_me(current) {
                    ">>> Your turn".to_string()
                } else {
                    format!("--- {}'s turn", current)
                }
            }
            Packet::Notify { text } => text.clone(),
            Packet::MoveConfirmed => return None,
            Packet::FutureCards { cards } => {
                let top: Vec<String> = cards.iter().map(Card::to_string).collect();
                format!("Top of the deck: {}", top.join(", "))
            }
            Packet::ExplodingKittenDrawn => "You drew an EXPLODING KITTEN!".to_string(),
            Packet::Eliminated { name } => {
                if state.is_me(name) {
                    "You exploded. You can keep watching and chatting.".to_string()
                } else {
                    format!("{} exploded", name)
                }
            }
            Packet::GameOver { winner } => {
                self.last_hand = None;
                match winner {
                    Some(name) if state.is_me(name) => "Game over. You win!".to_string(),
                    Some(name) => format!("Game over. {} wins.", name),
                    None => "Game over. Nobody is left.".to_string(),
                }
            }
            Packet::ChatMessage { from, text } => format!("[{}] {}", from, text),
            Packet::Disconnected { reason } => format!("Disconnected: {}", reason),
            // Prompts are printed by whoever answers them
            Packet::AskTarget { .. } | Packet::AskGiveCard { .. } | Packet::AskPlacement { .. } => {
                return None
            }
            Packet::Connect { .. }
            | Packet::Action(_)
            | Packet::Chat { .. }
            | Packet::Heartbeat
            | Packet::Disconnect => return None,
        };
        Some(text)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn prompt_text(prompt: &Prompt, state: &ClientGameState) -> String {
    match prompt {
        Prompt::PlayOrDraw => format!(
            "{}\nPlay a card (name or #) or 'draw'.",
            hand_line(state)
        ),
        Prompt::ChooseTarget { candidates } => {
            let numbered: Vec<String> = candidates
                .iter()
                .enumerate()
                .map(|(i, name)| format!("{}) {}", i + 1, name))
                .collect();
            format!("Who do you ask for a favor? {}", numbered.join("  "))
        }
        Prompt::GiveCard { requester } => format!(
            "{} asks you for a favor. Pick a card to give.\n{}",
            requester,
            hand_line(state)
        ),
        Prompt::Placement { max_index } => format!(
            "Where does the kitten go back? 0 = bottom, {} = top",
            max_index
        ),
    }
}

pub fn hand_line(state: &ClientGameState) -> String {
    cards_line("Your hand", &state.hand)
}

fn cards_line(label: &str, cards: &[Card]) -> String {
    if cards.is_empty() {
        return format!("{}: (empty)", label);
    }
    let numbered: Vec<String> = cards
        .iter()
        .enumerate()
        .map(|(i, card)| format!("{}) {}", i + 1, card))
        .collect();
    format!("{}: {}", label, numbered.join("  "))
}
