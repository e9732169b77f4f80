use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const PROTOCOL_VERSION: u32 = 1;
pub const DEFAULT_HAND_SIZE: usize = 7;
pub const DEFUSES_COUNT: usize = 6;
pub const NOPE_DELAY_SECS: u64 = 10;
pub const FUTURE_PEEK: usize = 3;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;
pub const MAX_NAME_LEN: usize = 12;

/// Every card kind in the game, plus the synthetic `Draw` marker used on the action stack.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Card {
    ExplodingKitten,
    Defuse,
    Attack,
    Favor,
    Nope,
    Shuffle,
    Skip,
    SeeTheFuture,
    BeardCat,
    Tacocat,
    RainbowRalphingCat,
    HairyPotatoCat,
    Cattermelon,
    /// Not a real card: "this player currently owes a draw".
    Draw,
}

impl Card {
    pub const ALL: [Card; 14] = [
        Card::ExplodingKitten,
        Card::Defuse,
        Card::Attack,
        Card::Favor,
        Card::Nope,
        Card::Shuffle,
        Card::Skip,
        Card::SeeTheFuture,
        Card::BeardCat,
        Card::Tacocat,
        Card::RainbowRalphingCat,
        Card::HairyPotatoCat,
        Card::Cattermelon,
        Card::Draw,
    ];

    /// Cards whose effect is announced and held open for a Nope window before resolving.
    pub fn is_delayed(self) -> bool {
        matches!(self, Card::Favor | Card::Shuffle | Card::SeeTheFuture)
    }

    pub fn is_cat(self) -> bool {
        matches!(
            self,
            Card::BeardCat
                | Card::Tacocat
                | Card::RainbowRalphingCat
                | Card::HairyPotatoCat
                | Card::Cattermelon
        )
    }

    /// Entries that represent a draw the current player still owes.
    pub fn is_obligation(self) -> bool {
        matches!(self, Card::Draw | Card::Attack)
    }

    pub fn name(self) -> &'static str {
        match self {
            Card::ExplodingKitten => "EXPLODING_KITTEN",
            Card::Defuse => "DEFUSE",
            Card::Attack => "ATTACK",
            Card::Favor => "FAVOR",
            Card::Nope => "NOPE",
            Card::Shuffle => "SHUFFLE",
            Card::Skip => "SKIP",
            Card::SeeTheFuture => "SEE_THE_FUTURE",
            Card::BeardCat => "BEARD_CAT",
            Card::Tacocat => "TACOCAT",
            Card::RainbowRalphingCat => "RAINBOW_RALPHING_CAT",
            Card::HairyPotatoCat => "HAIRY_POTATO_CAT",
            Card::Cattermelon => "CATTERMELON",
            Card::Draw => "DRAW",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown card: {0}")]
pub struct UnknownCard(pub String);

impl FromStr for Card {
    type Err = UnknownCard;

    /// Accepts the canonical names case-insensitively, with spaces or underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Card::ALL
            .into_iter()
            .find(|card| card.name() == normalized)
            .ok_or_else(|| UnknownCard(s.to_string()))
    }
}

/// Rejection reasons sent back to the originator of an action.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Invalid handshake")]
    InvalidHandshake,
    #[error("Invalid name")]
    InvalidName,
    #[error("Invalid move")]
    InvalidMove,
    #[error("Invalid target")]
    InvalidTarget,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Non-protocol message")]
    ProtocolMalformed,
    #[error("Missing information: no game in progress")]
    MissingPrecondition,
}

/// Game actions a registered player may submit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Action {
    PlayCard { card: Card },
    Draw,
    ChooseTarget { name: String },
    GiveCard { card: Card },
    PlaceCard { index: usize },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Packet {
    Connect {
        client_version: u32,
        name: String,
    },
    Action(Action),
    Chat {
        text: String,
    },
    Heartbeat,
    Disconnect,

    Connected {
        name: String,
    },
    Rejected {
        error: GameError,
    },
    PlayerUpdate {
        hand: Vec<Card>,
        top_card: Option<Card>,
        deck_size: usize,
    },
    TurnChanged {
        previous: Option<String>,
        current: String,
    },
    Notify {
        text: String,
    },
    MoveConfirmed,
    AskTarget {
        candidates: Vec<String>,
    },
    AskGiveCard {
        requester: String,
    },
    FutureCards {
        cards: Vec<Card>,
    },
    ExplodingKittenDrawn,
    AskPlacement {
        max_index: usize,
    },
    Eliminated {
        name: String,
    },
    GameOver {
        winner: Option<String>,
    },
    ChatMessage {
        from: String,
        text: String,
    },
    Disconnected {
        reason: String,
    },
}

/// Player names are 1 to 12 ASCII letters or digits.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_NAME_LEN && name.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delayed_cards() {
        let delayed: Vec<Card> = Card::ALL.into_iter().filter(|c| c.is_delayed()).collect();
        assert_eq!(delayed, vec![Card::Favor, Card::Shuffle, Card::SeeTheFuture]);
        assert!(!Card::Nope.is_delayed());
        assert!(!Card::Draw.is_delayed());
    }

    #[test]
    fn test_obligations() {
        assert!(Card::Draw.is_obligation());
        assert!(Card::Attack.is_obligation());
        assert!(!Card::Skip.is_obligation());
        assert!(!Card::Defuse.is_obligation());
    }

    #[test]
    fn test_card_parsing() {
        assert_eq!("tacocat".parse::<Card>(), Ok(Card::Tacocat));
        assert_eq!("see the future".parse::<Card>(), Ok(Card::SeeTheFuture));
        assert_eq!("EXPLODING_KITTEN".parse::<Card>(), Ok(Card::ExplodingKitten));
        assert_eq!(" Nope ".parse::<Card>(), Ok(Card::Nope));
        assert!("joker".parse::<Card>().is_err());
    }

    #[test]
    fn test_card_display_matches_parse() {
        for card in Card::ALL {
            assert_eq!(card.to_string().parse::<Card>(), Ok(card));
        }
    }

    #[test]
    fn test_name_validation() {
        assert!(is_valid_name("alice"));
        assert!(is_valid_name("Bob42"));
        assert!(is_valid_name("abcdefghijkl"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("abcdefghijklm"));
        assert!(!is_valid_name("bad name"));
        assert!(!is_valid_name("x|y"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(GameError::InvalidMove.to_string(), "Invalid move");
        assert_eq!(GameError::NotYourTurn.to_string(), "Not your turn");
        assert_eq!(GameError::InvalidTarget.to_string(), "Invalid target");
    }

    #[test]
    fn test_packet_serialization_action() {
        let packet = Packet::Action(Action::PlaceCard { index: 12 });
        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        match deserialized {
            Packet::Action(Action::PlaceCard { index }) => assert_eq!(index, 12),
            _ => panic!("Wrong packet type after deserialization"),
        }
    }

    #[test]
    fn test_packet_serialization_player_update() {
        let packet = Packet::PlayerUpdate {
            hand: vec![Card::Defuse, Card::Tacocat, Card::Tacocat],
            top_card: Some(Card::Skip),
            deck_size: 33,
        };

        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        match deserialized {
            Packet::PlayerUpdate {
                hand,
                top_card,
                deck_size,
            } => {
                assert_eq!(hand, vec![Card::Defuse, Card::Tacocat, Card::Tacocat]);
                assert_eq!(top_card, Some(Card::Skip));
                assert_eq!(deck_size, 33);
            }
            _ => panic!("Wrong packet type after deserialization"),
        }
    }

    #[test]
    fn test_garbage_is_not_a_packet() {
        let garbage = [0xff_u8, 0xff, 0xff, 0xff, 0x01];
        assert!(bincode::deserialize::<Packet>(&garbage).is_err());
    }
}
