//! Nope reaction window
//!
//! The window is plain state with a monotonic deadline. It never spawns
//! anything itself: the owner schedules an expiry event for the returned
//! [`WindowId`] and feeds it back through [`InterruptWindow::expire`] from the
//! same serialized loop that handles Nopes. Whichever of the two is handled
//! first wins; the other finds the window no longer open.

use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("an interrupt window is already open")]
    AlreadyOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Idle,
    Open { id: WindowId, deadline: Instant },
    /// Ran its full duration; the pending effect may now resolve
    Elapsed { id: WindowId },
}

#[derive(Debug, Clone)]
pub struct InterruptWindow {
    state: WindowState,
    next_id: u64,
}

impl Default for InterruptWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptWindow {
    pub fn new() -> Self {
        Self {
            state: WindowState::Idle,
            next_id: 1,
        }
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, WindowState::Open { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, WindowState::Idle)
    }

    pub fn open(&mut self, duration: Duration, now: Instant) -> Result<(WindowId, Instant), WindowError> {
        if self.is_open() {
            return Err(WindowError::AlreadyOpen);
        }
        let id = WindowId(self.next_id);
        self.next_id += 1;
        let deadline = now + duration;
        self.state = WindowState::Open { id, deadline };
        Ok((id, deadline))
    }

    /// Stops the window. Returns true if it had already fired, in which
    /// case the cancellation came too late to matter.
    pub fn cancel(&mut self) -> bool {
        let fired = matches!(self.state, WindowState::Elapsed { .. });
        self.state = WindowState::Idle;
        fired
    }

    /// Consumes an expiry event. Only takes effect if `id` is the window that
    /// is still open and its deadline has passed; stale events return false.
    pub fn expire(&mut self, id: WindowId, now: Instant) -> bool {
        match self.state {
            WindowState::Open { id: open, deadline } if open == id && now >= deadline => {
                self.state = WindowState::Elapsed { id };
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_twice_fails() {
        let mut window = InterruptWindow::new();
        let now = Instant::now();

        assert!(window.open(Duration::from_secs(10), now).is_ok());
        assert_eq!(
            window.open(Duration::from_secs(10), now),
            Err(WindowError::AlreadyOpen)
        );
    }

    #[test]
    fn test_expiry_after_deadline() {
        let mut window = InterruptWindow::new();
        let now = Instant::now();
        let (id, deadline) = window.open(Duration::from_secs(10), now).unwrap();

        assert!(!window.expire(id, now));
        assert!(window.is_open());

        assert!(window.expire(id, deadline));
        assert_eq!(window.state(), WindowState::Elapsed { id });
    }

    #[test]
    fn test_cancel_beats_expiry() {
        let mut window = InterruptWindow::new();
        let now = Instant::now();
        let (id, deadline) = window.open(Duration::from_secs(10), now).unwrap();

        assert!(!window.cancel());
        assert!(!window.expire(id, deadline));
        assert!(window.is_idle());
    }

    #[test]
    fn test_expiry_beats_cancel() {
        let mut window = InterruptWindow::new();
        let now = Instant::now();
        let (id, deadline) = window.open(Duration::ZERO, now).unwrap();

        assert!(window.expire(id, deadline));
        assert!(window.cancel());
        assert!(window.is_idle());
    }

    #[test]
    fn test_stale_id_ignored_by_new_window() {
        let mut window = InterruptWindow::new();
        let now = Instant::now();
        let (first, _) = window.open(Duration::ZERO, now).unwrap();
        window.cancel();
        let (second, deadline) = window.open(Duration::ZERO, now).unwrap();

        assert_ne!(first, second);
        assert!(!window.expire(first, deadline));
        assert!(window.expire(second, deadline));
    }
}
