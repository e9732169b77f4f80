use shared::Card;

/// A seated player: unique name, hand and alive flag.
///
/// Eliminated players keep their seat so the turn order stays stable.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub name: String,
    pub hand: Vec<Card>,
    pub alive: bool,
}

impl PlayerState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            alive: true,
        }
    }

    pub fn has_card(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    pub fn count(&self, card: Card) -> usize {
        self.hand.iter().filter(|c| **c == card).count()
    }

    pub fn add_card(&mut self, card: Card) {
        self.hand.push(card);
    }

    /// Removes one copy of `card`; false if the hand does not hold it
    pub fn remove_card(&mut self, card: Card) -> bool {
        match self.hand.iter().position(|c| *c == card) {
            Some(index) => {
                self.hand.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn eliminate(&mut self) {
        self.alive = false;
        self.hand.clear();
    }
}
