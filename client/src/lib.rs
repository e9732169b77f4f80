//! # Game Client Library
//!
//! Terminal client for the Exploding Kittens server. The server owns every
//! rule; the client mirrors what it is told, prints it, and forwards moves.
//!
//! ## Architecture Overview
//!
//! A single async loop in [`network::Client`] multiplexes three sources:
//! datagrams from the server, lines typed on the terminal, and a heartbeat
//! timer that keeps the server from timing the player out.
//!
//! Each server packet is first rendered, then applied to the local
//! [`game::ClientGameState`]. When the packet asks this player something
//! (their turn, a favor target, a card to give, where to put a kitten back)
//! the state turns it into a [`game::Prompt`] and hands it to the
//! [`decision::DecisionSource`].
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! Local mirror of hand, discard top, deck size, turn order, and the
//! cards a See-the-future revealed. Tracks which prompt is still open so a
//! refused answer can be asked again.
//!
//! ### Decision Module (`decision`)
//! The seam between the network loop and whoever picks the moves.
//!
//! ### Input Module (`input`)
//! Command parsing for a human at the terminal.
//!
//! ### AI Module (`ai`)
//! A computer player that answers every prompt on its own.
//!
//! ### Rendering Module (`rendering`)
//! Plain-text output for packets and prompts.
//!
//! ## Usage Example
//!
//! ```no_run
//! use client::ai::ComputerPlayer;
//! use client::network::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = Client::new("127.0.0.1:25500", "robot", Box::new(ComputerPlayer::new(None))).await?;
//! client.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod decision;
pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
