//! Turn order over a fixed circular seating

/// Tracks the current and previous seat.
///
/// Seats are indices into the game's player list. Only alive seats ever
/// become current; `previous` is what a Nope of a turn change rolls back to.
#[derive(Debug, Clone)]
pub struct TurnCoordinator {
    current: usize,
    previous: Option<usize>,
}

impl TurnCoordinator {
    pub fn new(first: usize) -> Self {
        Self {
            current: first,
            previous: None,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    /// Moves to the next alive seat after the current one.
    ///
    /// If the current seat is no longer alive it cannot be rolled back to,
    /// so `previous` is cleared instead. Returns the new current seat, or
    /// `None` when nobody else is alive.
    pub fn advance(&mut self, alive: &[bool]) -> Option<usize> {
        let next = Self::next_alive(self.current, alive)?;
        self.previous = alive
            .get(self.current)
            .copied()
            .unwrap_or(false)
            .then_some(self.current);
        self.current = next;
        Some(next)
    }

    /// Undoes the last advance. Returns `(undone, restored)` seats.
    pub fn revert(&mut self) -> Option<(usize, usize)> {
        let previous = self.previous.take()?;
        let undone = self.current;
        self.current = previous;
        Some((undone, previous))
    }

    /// Forgets `seat` as a rollback target, used when it is eliminated
    pub fn forget(&mut self, seat: usize) {
        if self.previous == Some(seat) {
            self.previous = None;
        }
    }

    /// First alive seat strictly after `from`, wrapping around; never `from` itself
    pub fn next_alive(from: usize, alive: &[bool]) -> Option<usize> {
        let seats = alive.len();
        (1..seats)
            .map(|offset| (from + offset) % seats)
            .find(|&seat| alive[seat])
    }
}
