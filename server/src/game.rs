//! Authoritative game state and effect resolution
//!
//! Cards are resolved from an action stack whose top is the next effect to
//! resolve. Delayed cards first open a Nope window; every other entry is
//! dispatched immediately. A `Draw` marker on the stack is a draw the current
//! player still owes, and unresolved Attacks count as further draws.
//!
//! The game never talks to the network. Every handler appends to an outbox of
//! [`Outbound`] messages that the session drains after the call, including the
//! requests to schedule window expiries. All handlers, expiries included, must
//! be called from one serialized loop.

use crate::config::{ConfigError, GameConfig};
use crate::deck::Deck;
use crate::interrupt::{InterruptWindow, WindowId, WindowState};
use crate::player::PlayerState;
use crate::turn::TurnCoordinator;
use log::{debug, info, warn};
use shared::{Action, Card, GameError, Packet};
use std::time::Instant;

/// Messages produced by the game for the transport layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    To { player: String, packet: Packet },
    Broadcast { packet: Packet },
    /// Deliver [`Game::window_expired`] for `window` once `deadline` has passed
    ScheduleExpiry { window: WindowId, deadline: Instant },
}

/// What the resolution loop does after dispatching the top entry
enum Flow {
    /// Look at the new top entry
    Continue,
    /// Stop and run the end-of-resolution bookkeeping
    Settled,
    /// Stop without bookkeeping; a sub-dialog or a turn change already took over
    Suspended,
}

#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    players: Vec<PlayerState>,
    deck: Deck,
    turn: TurnCoordinator,
    stack: Vec<Card>,
    skipped: Vec<Card>,
    noped: Option<Card>,
    last_card: Option<Card>,
    favor_target: Option<usize>,
    awaiting_interaction: bool,
    pending_placement: bool,
    can_nope: bool,
    window: InterruptWindow,
    /// Seats owed a `MoveConfirmed` once nothing is pending any more
    unconfirmed: Vec<usize>,
    over: bool,
    winner: Option<usize>,
    outbox: Vec<Outbound>,
}

impl Game {
    pub fn new(names: Vec<String>, deck: Deck, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate(names.len())?;

        Ok(Self {
            config,
            players: names.into_iter().map(PlayerState::new).collect(),
            deck,
            turn: TurnCoordinator::new(0),
            stack: Vec::new(),
            skipped: Vec::new(),
            noped: None,
            last_card: None,
            favor_target: None,
            awaiting_interaction: false,
            pending_placement: false,
            can_nope: false,
            window: InterruptWindow::new(),
            unconfirmed: Vec::new(),
            over: false,
            winner: None,
            outbox: Vec::new(),
        })
    }

    /// Deals `hand_size - 1` cards plus one Defuse to everybody, then mixes the
    /// remaining Defuses and `players - 1` Exploding Kittens into the deck.
    pub fn deal(&mut self) {
        let dealt = self.config.hand_size.saturating_sub(1);
        for player in &mut self.players {
            player.hand.extend(self.deck.draw_cards(dealt));
            player.add_card(Card::Defuse);
        }
        self.deck
            .add_kittens_and_defuses(self.players.len(), self.config.defuse_pool);
    }

    pub fn start(&mut self, first: usize) {
        let first = first % self.players.len();
        self.turn = TurnCoordinator::new(first);
        self.stack.clear();
        self.stack.push(Card::Draw);

        info!(
            "Game started with {} players, {} goes first",
            self.players.len(),
            self.players[first].name
        );
        self.broadcast(Packet::Notify {
            text: "The game has been started!".to_string(),
        });
        self.send_all_updates();
        self.broadcast(Packet::TurnChanged {
            previous: None,
            current: self.players[first].name.clone(),
        });
    }

    pub fn drain_outbox(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    /// Routes an inbound action to its handler
    pub fn apply(&mut self, player: &str, action: &Action) -> Result<(), GameError> {
        match action {
            Action::PlayCard { card } => self.play_card(player, *card),
            Action::Draw => self.draw(player),
            Action::ChooseTarget { name } => self.choose_target(player, name),
            Action::GiveCard { card } => self.give_card(player, *card),
            Action::PlaceCard { index } => self.place_card(player, *index),
        }
    }

    pub fn play_card(&mut self, player: &str, card: Card) -> Result<(), GameError> {
        let seat = self.acting_seat(player)?;
        if !self.players[seat].has_card(card) {
            return Err(GameError::InvalidMove);
        }
        if card == Card::Nope {
            self.play_nope(seat);
            return Ok(());
        }
        if self.awaiting_interaction {
            return Err(GameError::InvalidMove);
        }
        if seat != self.turn.current() {
            return Err(GameError::NotYourTurn);
        }
        if self.window.is_open() || card.is_cat() || card == Card::ExplodingKitten {
            return Err(GameError::InvalidMove);
        }

        self.players[seat].remove_card(card);
        self.stack.push(card);
        self.last_card = Some(card);
        self.can_nope = true;
        self.noped = None;
        self.confirm_later(seat);

        info!("{} played {}", player, card);
        if !card.is_delayed() {
            self.broadcast(Packet::Notify {
                text: format!("{} played {}", player, card),
            });
        }

        self.resolve();
        self.settle();
        Ok(())
    }

    fn play_nope(&mut self, seat: usize) {
        self.players[seat].remove_card(Card::Nope);
        self.send_update(seat);

        if seat == self.turn.current() {
            self.confirm_later(seat);
        } else {
            self.send_to(seat, Packet::MoveConfirmed);
        }

        if !self.can_nope {
            debug!("Nope from {} arrived too late", self.players[seat].name);
            self.send_to(
                seat,
                Packet::Notify {
                    text: "Too late...".to_string(),
                },
            );
            self.settle();
            return;
        }

        let name = self.players[seat].name.clone();
        if let Some(card) = self.noped.take() {
            info!("{} noped the nope, {} is back", name, card);
            self.stack.push(card);
            self.last_card = Some(card);
            self.broadcast(Packet::Notify {
                text: format!("{} noped the nope, {} is back in play", name, card),
            });
        } else if self.stack.last() == Some(&Card::Defuse) {
            // A pre-defuse is not an effect; the Nope is spent on nothing
            info!("{} tried to nope a pre-defuse", name);
            self.send_to(
                seat,
                Packet::Notify {
                    text: "A defuse cannot be noped".to_string(),
                },
            );
        } else {
            if self.stack.last() == Some(&Card::Draw) {
                if self.turn.previous().is_none() {
                    self.send_to(
                        seat,
                        Packet::Notify {
                            text: "There is nothing to nope".to_string(),
                        },
                    );
                    self.settle();
                    return;
                }
                self.stack.pop();
                self.rollback_turn();

                // The first Attack of a turn replaced the Draw marker beneath it
                if self.obligations() == [Card::Attack] {
                    if let Some(index) = self.stack.iter().position(|c| *c == Card::Attack) {
                        self.stack.insert(index, Card::Draw);
                    }
                }
            }

            if self.last_card == Some(Card::Skip) {
                if let Some(displaced) = self.skipped.pop() {
                    self.stack.push(displaced);
                    self.stack.push(Card::Skip);
                }
            }

            if let Some(card) = self.stack.pop() {
                info!("{} noped {}", name, card);
                self.noped = Some(card);
                self.last_card = Some(Card::Nope);
                self.broadcast(Packet::Notify {
                    text: format!("{} noped {}", name, card),
                });
            }

            if self.window.is_open() {
                self.window.cancel();
                self.broadcast(Packet::Notify {
                    text: "The card has been cancelled".to_string(),
                });
            }
        }

        self.resolve();
        self.settle();
    }

    pub fn draw(&mut self, player: &str) -> Result<(), GameError> {
        let seat = self.acting_seat(player)?;
        if seat != self.turn.current() {
            return Err(GameError::NotYourTurn);
        }
        if self.awaiting_interaction
            || self.window.is_open()
            || !self.stack.iter().any(|c| c.is_obligation())
        {
            return Err(GameError::InvalidMove);
        }
        let Some(card) = self.deck.draw_card() else {
            warn!("{} tried to draw from an empty deck", player);
            return Err(GameError::InvalidMove);
        };

        self.noped = None;
        self.can_nope = false;
        self.skipped.clear();
        self.confirm_later(seat);

        if card == Card::ExplodingKitten {
            info!("{} drew an exploding kitten", player);
            self.send_to(seat, Packet::ExplodingKittenDrawn);
            self.stack.push(Card::ExplodingKitten);
            self.resolve();
            if self.over || !self.players[seat].alive {
                self.settle();
                return Ok(());
            }
        } else {
            debug!("{} drew {}", player, card);
            self.players[seat].add_card(card);
        }

        self.stack.retain(|c| *c != Card::Defuse);
        self.discharge_obligation();
        self.send_update(seat);

        if !self.pending_placement && self.owes_nothing() {
            self.advance_turn();
        }
        self.settle();
        Ok(())
    }

    pub fn choose_target(&mut self, player: &str, target: &str) -> Result<(), GameError> {
        let seat = self.acting_seat(player)?;
        if seat != self.turn.current() {
            return Err(GameError::NotYourTurn);
        }
        if self.stack.last() != Some(&Card::Favor)
            || self.favor_target.is_some()
            || !self.awaiting_interaction
            || self.pending_placement
        {
            return Err(GameError::InvalidMove);
        }
        let target_seat = self
            .seat_of(target)
            .filter(|&s| s != seat && self.players[s].alive)
            .ok_or(GameError::InvalidTarget)?;

        if self.players[target_seat].hand.is_empty() {
            info!("{} targeted {} who is out of cards", player, target);
            self.send_to(
                seat,
                Packet::Notify {
                    text: format!("{} is out of cards", target),
                },
            );
            self.stack.pop();
            self.awaiting_interaction = false;
            self.confirm_later(seat);
            self.resolve();
            self.settle();
            return Ok(());
        }

        info!("{} asks {} for a favor", player, target);
        self.favor_target = Some(target_seat);
        self.send_to(
            seat,
            Packet::Notify {
                text: format!("Waiting for {} to choose a card", target),
            },
        );
        self.send_to(
            target_seat,
            Packet::AskGiveCard {
                requester: player.to_string(),
            },
        );
        Ok(())
    }

    pub fn give_card(&mut self, player: &str, card: Card) -> Result<(), GameError> {
        let seat = self.acting_seat(player)?;
        if self.favor_target != Some(seat)
            || self.stack.last() != Some(&Card::Favor)
            || !self.players[seat].has_card(card)
        {
            return Err(GameError::InvalidMove);
        }

        let receiver = self.turn.current();
        self.players[seat].remove_card(card);
        self.players[receiver].add_card(card);
        info!(
            "{} gave {} to {}",
            player, card, self.players[receiver].name
        );

        self.broadcast(Packet::Notify {
            text: format!(
                "{} has given a card to {}",
                player, self.players[receiver].name
            ),
        });
        self.send_update(seat);
        self.send_update(receiver);

        self.stack.pop();
        self.favor_target = None;
        self.awaiting_interaction = false;
        self.confirm_later(seat);
        self.confirm_later(receiver);

        self.resolve();
        self.settle();
        Ok(())
    }

    pub fn place_card(&mut self, player: &str, index: usize) -> Result<(), GameError> {
        let seat = self.acting_seat(player)?;
        if seat != self.turn.current() {
            return Err(GameError::NotYourTurn);
        }
        if !self.pending_placement
            || index > self.deck.len()
            || !self.players[seat].has_card(Card::ExplodingKitten)
        {
            return Err(GameError::InvalidMove);
        }
        self.deck
            .insert_at(Card::ExplodingKitten, index)
            .map_err(|_| GameError::InvalidMove)?;
        self.players[seat].remove_card(Card::ExplodingKitten);

        info!("{} put the exploding kitten back at {}", player, index);
        self.pending_placement = false;
        self.awaiting_interaction = false;
        self.confirm_later(seat);

        self.broadcast(Packet::Notify {
            text: format!("{} put the exploding kitten back into the deck", player),
        });
        self.send_all_updates();

        if self.owes_nothing() {
            self.advance_turn();
        }
        self.settle();
        Ok(())
    }

    /// Expiry event for a Nope window, scheduled through [`Outbound::ScheduleExpiry`]
    pub fn window_expired(&mut self, id: WindowId) {
        self.window_expired_at(id, Instant::now());
    }

    pub fn window_expired_at(&mut self, id: WindowId, now: Instant) {
        if self.over || !self.window.expire(id, now) {
            debug!("Ignoring stale expiry of window {:?}", id);
            return;
        }
        debug!("Nope window {:?} expired", id);
        self.can_nope = false;
        self.resolve();
        self.settle();
    }

    /// Treats a disconnected player as eliminated
    pub fn remove_player(&mut self, player: &str) {
        if self.over {
            return;
        }
        let Some(seat) = self.seat_of(player).filter(|&s| self.players[s].alive) else {
            return;
        };
        self.broadcast(Packet::Notify {
            text: format!("{} has left the game", player),
        });
        self.eliminate(seat);
        self.settle();
    }

    /// Processes the stack top until something suspends resolution or the
    /// current player owes nothing but their draws.
    fn resolve(&mut self) {
        while !self.over {
            let Some(&top) = self.stack.last() else {
                break;
            };

            if top.is_delayed() && self.window.is_idle() {
                self.open_window(top);
                return;
            }
            // Whatever window was there has served its purpose
            self.window.cancel();

            match self.dispatch(top) {
                Flow::Continue => continue,
                Flow::Settled => break,
                Flow::Suspended => return,
            }
        }

        if self.over {
            return;
        }
        if self.owes_nothing() {
            self.advance_turn();
        } else {
            self.send_all_updates();
        }
    }

    fn dispatch(&mut self, top: Card) -> Flow {
        let actor = self.turn.current();

        match top {
            Card::Skip => {
                self.stack.pop();
                if let Some(index) = self.stack.iter().rposition(|c| c.is_obligation()) {
                    let displaced = self.stack.remove(index);
                    self.skipped.push(displaced);
                }
                if self.owes_nothing() {
                    Flow::Settled
                } else {
                    Flow::Continue
                }
            }

            Card::Defuse => {
                self.stack.pop();
                if self.stack.last() != Some(&Card::ExplodingKitten) {
                    // Pre-defuse: stays until this player's next draw
                    self.stack.push(Card::Defuse);
                    return Flow::Settled;
                }
                self.stack.pop();
                self.players[actor].add_card(Card::ExplodingKitten);
                self.pending_placement = true;
                self.awaiting_interaction = true;
                self.can_nope = false;
                self.send_update(actor);
                self.send_to(
                    actor,
                    Packet::AskPlacement {
                        max_index: self.deck.len(),
                    },
                );
                Flow::Suspended
            }

            Card::Shuffle => {
                self.deck.shuffle();
                self.stack.pop();
                self.broadcast(Packet::Notify {
                    text: "The deck has been shuffled".to_string(),
                });
                Flow::Settled
            }

            Card::SeeTheFuture => {
                self.stack.pop();
                let cards = self.deck.peek_top(self.config.future_peek);
                let listing: Vec<&str> = cards.iter().map(|c| c.name()).collect();
                self.send_to(
                    actor,
                    Packet::Notify {
                        text: format!(
                            "Here are the {} top cards on the deck: {}",
                            cards.len(),
                            listing.join(", ")
                        ),
                    },
                );
                self.send_to(actor, Packet::FutureCards { cards });
                Flow::Settled
            }

            Card::Favor => {
                if self.favor_target.is_none() && !self.awaiting_interaction {
                    let candidates: Vec<String> = self
                        .players
                        .iter()
                        .enumerate()
                        .filter(|(seat, p)| *seat != actor && p.alive)
                        .map(|(_, p)| p.name.clone())
                        .collect();
                    self.awaiting_interaction = true;
                    self.send_to(actor, Packet::AskTarget { candidates });
                }
                Flow::Settled
            }

            Card::Attack => {
                // First Attack of a fresh turn replaces the draw instead of adding to it
                let below = &self.stack[..self.stack.len() - 1];
                let lone_draw = below.iter().filter(|c| c.is_obligation()).count() == 1
                    && below.contains(&Card::Draw);
                if lone_draw {
                    if let Some(index) = self.stack.iter().position(|c| *c == Card::Draw) {
                        self.stack.remove(index);
                    }
                }
                // Only an Attack that was just played ends the turn
                if self.last_card == Some(Card::Attack) {
                    self.advance_turn();
                }
                Flow::Settled
            }

            Card::ExplodingKitten => {
                let below = &self.stack[..self.stack.len() - 1];
                if below.contains(&Card::Defuse) {
                    self.broadcast(Packet::Notify {
                        text: format!(
                            "{} has preemptively defused a kitten that was just drawn",
                            self.players[actor].name
                        ),
                    });
                    if let Some(index) = self.stack.iter().position(|c| *c == Card::Defuse) {
                        self.stack.remove(index);
                    }
                    self.stack.push(Card::Defuse);
                    Flow::Continue
                } else if self.players[actor].remove_card(Card::Defuse) {
                    self.send_update(actor);
                    self.stack.push(Card::Defuse);
                    Flow::Continue
                } else {
                    self.stack.pop();
                    self.send_to(
                        actor,
                        Packet::Notify {
                            text: "You drew an EXPLODING_KITTEN but you don't have a DEFUSE!"
                                .to_string(),
                        },
                    );
                    self.eliminate(actor);
                    Flow::Suspended
                }
            }

            // Draw markers wait for the player
            _ => Flow::Settled,
        }
    }

    fn open_window(&mut self, card: Card) {
        match self.window.open(self.config.nope_window, Instant::now()) {
            Ok((id, deadline)) => {
                let actor = &self.players[self.turn.current()].name;
                info!("{} is placing {}, Nope window {:?} open", actor, card, id);
                let text = format!(
                    "{} is placing the card {} hurry if you want to nope it! ({}s)",
                    actor,
                    card,
                    self.config.nope_window.as_secs()
                );
                self.outbox.push(Outbound::ScheduleExpiry {
                    window: id,
                    deadline,
                });
                self.broadcast(Packet::Notify { text });
            }
            Err(e) => warn!("Could not open Nope window for {}: {}", card, e),
        }
    }

    /// Pushes a Draw marker for the next alive player and announces the turn
    fn advance_turn(&mut self) {
        // Pre-defuses only cover the draw of the player who played them
        self.stack.retain(|c| *c != Card::Defuse);

        let from = self.turn.current();
        let alive = self.alive_flags();
        let Some(next) = self.turn.advance(&alive) else {
            return;
        };
        self.stack.push(Card::Draw);

        info!(
            "Turn passes from {} to {}",
            self.players[from].name, self.players[next].name
        );
        self.send_all_updates();
        self.broadcast(Packet::TurnChanged {
            previous: Some(self.players[from].name.clone()),
            current: self.players[next].name.clone(),
        });
    }

    fn rollback_turn(&mut self) {
        if let Some((undone, restored)) = self.turn.revert() {
            info!(
                "Turn change rolled back from {} to {}",
                self.players[undone].name, self.players[restored].name
            );
            self.broadcast(Packet::TurnChanged {
                previous: Some(self.players[undone].name.clone()),
                current: self.players[restored].name.clone(),
            });
        }
    }

    fn eliminate(&mut self, seat: usize) {
        if !self.players[seat].alive {
            return;
        }
        let name = self.players[seat].name.clone();
        info!("{} has been eliminated", name);

        self.players[seat].eliminate();
        self.turn.forget(seat);
        self.unconfirmed.retain(|s| *s != seat);
        self.broadcast(Packet::Notify {
            text: format!("{} has lost!", name),
        });
        self.broadcast(Packet::Eliminated { name });

        let survivors: Vec<usize> = (0..self.players.len())
            .filter(|&s| self.players[s].alive)
            .collect();
        if survivors.len() <= 1 {
            self.finish(survivors.first().copied());
            return;
        }

        if seat == self.turn.current() {
            // Whatever the eliminated player still owed dies with them
            self.stack.clear();
            self.skipped.clear();
            self.noped = None;
            self.window.cancel();
            self.favor_target = None;
            self.awaiting_interaction = false;
            self.pending_placement = false;
            self.can_nope = false;
            self.advance_turn();
        } else if self.favor_target == Some(seat) {
            self.favor_target = None;
            self.awaiting_interaction = false;
            if self.stack.last() == Some(&Card::Favor) {
                self.stack.pop();
            }
            let current = self.turn.current();
            self.send_to(
                current,
                Packet::Notify {
                    text: "The favor target is gone, the favor has no effect".to_string(),
                },
            );
            self.confirm_later(current);
            self.resolve();
        }
    }

    fn finish(&mut self, winner: Option<usize>) {
        self.over = true;
        self.winner = winner;
        self.window.cancel();
        self.stack.clear();
        self.skipped.clear();
        self.noped = None;
        self.favor_target = None;
        self.awaiting_interaction = false;
        self.pending_placement = false;
        self.can_nope = false;
        self.unconfirmed.clear();

        let winner_name = winner.map(|s| self.players[s].name.clone());
        info!("Game over, winner: {:?}", winner_name);
        if let Some(seat) = winner {
            self.send_to(
                seat,
                Packet::Notify {
                    text: "You won the game well done".to_string(),
                },
            );
        }
        self.broadcast(Packet::GameOver {
            winner: winner_name,
        });
    }

    /// Sends the owed confirmations once no window or sub-dialog is pending
    fn settle(&mut self) {
        if self.over {
            self.unconfirmed.clear();
            return;
        }
        if self.window.is_open() || self.awaiting_interaction {
            return;
        }
        for seat in std::mem::take(&mut self.unconfirmed) {
            if self.players[seat].alive {
                self.send_to(seat, Packet::MoveConfirmed);
            }
        }
    }

    fn confirm_later(&mut self, seat: usize) {
        if !self.unconfirmed.contains(&seat) {
            self.unconfirmed.push(seat);
        }
    }

    fn discharge_obligation(&mut self) {
        if let Some(index) = self.stack.iter().rposition(|c| c.is_obligation()) {
            self.stack.remove(index);
        }
    }

    fn obligations(&self) -> Vec<Card> {
        self.stack
            .iter()
            .copied()
            .filter(|c| c.is_obligation())
            .collect()
    }

    /// True when only pre-defuse markers, if anything, are left on the stack
    fn owes_nothing(&self) -> bool {
        self.stack.iter().all(|c| *c == Card::Defuse)
    }

    fn acting_seat(&self, player: &str) -> Result<usize, GameError> {
        if self.over {
            return Err(GameError::MissingPrecondition);
        }
        self.seat_of(player)
            .filter(|&s| self.players[s].alive)
            .ok_or(GameError::InvalidMove)
    }

    fn seat_of(&self, player: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == player)
    }

    fn alive_flags(&self) -> Vec<bool> {
        self.players.iter().map(|p| p.alive).collect()
    }

    fn send_to(&mut self, seat: usize, packet: Packet) {
        self.outbox.push(Outbound::To {
            player: self.players[seat].name.clone(),
            packet,
        });
    }

    fn broadcast(&mut self, packet: Packet) {
        self.outbox.push(Outbound::Broadcast { packet });
    }

    fn send_update(&mut self, seat: usize) {
        let packet = Packet::PlayerUpdate {
            hand: self.players[seat].hand.clone(),
            top_card: self.last_card,
            deck_size: self.deck.len(),
        };
        self.send_to(seat, packet);
    }

    fn send_all_updates(&mut self) {
        for seat in 0..self.players.len() {
            if self.players[seat].alive {
                self.send_update(seat);
            }
        }
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn alive_players(&self) -> Vec<&str> {
        self.players
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn current_player(&self) -> &str {
        &self.players[self.turn.current()].name
    }

    pub fn previous_player(&self) -> Option<&str> {
        self.turn.previous().map(|s| self.players[s].name.as_str())
    }

    pub fn stack(&self) -> &[Card] {
        &self.stack
    }

    pub fn skipped(&self) -> &[Card] {
        &self.skipped
    }

    pub fn noped_card(&self) -> Option<Card> {
        self.noped
    }

    pub fn last_card(&self) -> Option<Card> {
        self.last_card
    }

    pub fn favor_target(&self) -> Option<&str> {
        self.favor_target.map(|s| self.players[s].name.as_str())
    }

    pub fn can_nope(&self) -> bool {
        self.can_nope
    }

    pub fn is_awaiting_interaction(&self) -> bool {
        self.awaiting_interaction
    }

    pub fn is_placement_pending(&self) -> bool {
        self.pending_placement
    }

    pub fn window_state(&self) -> WindowState {
        self.window.state()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.map(|s| self.players[s].name.as_str())
    }

    /// Number of draws the current player still owes
    pub fn pending_draws(&self) -> usize {
        self.obligations().len()
    }
}
