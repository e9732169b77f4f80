//! # Kittens Game Server Library
//!
//! Authoritative server for a turn-based Exploding Kittens style card game.
//! The server owns the deck, every hand and the action stack; clients only
//! submit actions and render the packets they are sent.
//!
//! ## Architecture Design
//!
//! ### Single Serialized Loop
//! All game events (client packets, disconnects, timeouts and Nope window
//! expiries) arrive as [`network::ServerMessage`]s on one channel and are
//! handled strictly one after another. Background tasks only receive, send,
//! watch timeouts or sleep until a window deadline; they never touch game
//! state. A Nope and the expiry of the window it targets can therefore never
//! interleave: whichever message is handled first wins.
//!
//! ### UDP-Based Communication
//! Packets are bincode-encoded [`shared::Packet`]s over UDP. Clients send a
//! heartbeat every second and are treated as disconnected after a configurable
//! silence.
//!
//! ### Pure Game Core
//! [`game::Game`] performs no I/O. Each handler records the packets it wants
//! delivered, by player name or as a broadcast, together with requests to
//! schedule window expiries. [`session::Session`] wraps the game with the
//! lobby and the transport drains and routes those messages.
//!
//! ## Module Organization
//!
//! - `config`: game parameters and command-line arguments
//! - `deck`: draw pile with seeded shuffling
//! - `player`: per-player hand and alive flag
//! - `turn`: turn order with single-step rollback for Noped turn changes
//! - `interrupt`: the Nope reaction window state machine
//! - `game`: action stack resolution, Nope handling and sub-dialogs
//! - `session`: lobby, game start and game end
//! - `client_manager`: registered clients, names and liveness
//! - `network`: UDP tasks and the main server loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use clap::Parser;
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::parse_from(["server", "--players", "3"]);
//!     let mut server = Server::new(&config).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod config;
pub mod deck;
pub mod game;
pub mod interrupt;
pub mod network;
pub mod player;
pub mod session;
pub mod turn;
