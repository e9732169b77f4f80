//! Whole-game simulations against the authoritative engine
//!
//! Random but legal-minded players drive games to the end without any
//! networking. Every Nope window is closed the moment nobody wants to react.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use server::config::GameConfig;
use server::deck::Deck;
use server::game::Game;
use server::interrupt::WindowState;
use shared::{Action, Card, DEFUSES_COUNT};
use std::time::Duration;
use tokio_test::assert_ok;

const MAX_STEPS: usize = 5_000;

fn new_game(players: usize, seed: u64) -> Game {
    let names = (0..players).map(|i| format!("p{}", i)).collect();
    let config = GameConfig {
        nope_window: Duration::ZERO,
        ..GameConfig::default()
    };
    let mut game = Game::new(names, Deck::standard(Some(seed)), config).unwrap();
    game.deal();
    game.start(seed as usize % players);
    game
}

fn live_count(game: &Game, card: Card) -> usize {
    let in_hands: usize = game
        .players()
        .iter()
        .filter(|p| p.alive)
        .map(|p| p.count(card))
        .sum();
    game.deck().count(card) + in_hands
}

fn eliminated(game: &Game) -> usize {
    game.players().iter().filter(|p| !p.alive).count()
}

/// One move by whoever the game is waiting on
fn step(game: &mut Game, rng: &mut StdRng) {
    if let WindowState::Open { id, .. } = game.window_state() {
        let nopers: Vec<String> = game
            .players()
            .iter()
            .filter(|p| p.alive && p.has_card(Card::Nope))
            .map(|p| p.name.clone())
            .collect();
        if game.can_nope() && !nopers.is_empty() && rng.gen_bool(0.3) {
            let noper = nopers.choose(rng).unwrap();
            game.play_card(noper, Card::Nope).unwrap();
        } else {
            game.window_expired(id);
        }
        return;
    }

    let current = game.current_player().to_string();

    if game.is_placement_pending() {
        let index = rng.gen_range(0..=game.deck().len());
        game.place_card(&current, index).unwrap();
        return;
    }

    if let Some(target) = game.favor_target().map(str::to_string) {
        let hand = &game.player(&target).unwrap().hand;
        let card = *hand.choose(rng).unwrap();
        game.give_card(&target, card).unwrap();
        return;
    }

    if game.is_awaiting_interaction() {
        let candidates: Vec<String> = game
            .alive_players()
            .into_iter()
            .filter(|name| *name != current)
            .map(str::to_string)
            .collect();
        let target = candidates.choose(rng).unwrap();
        game.choose_target(&current, target).unwrap();
        return;
    }

    let playable: Vec<Card> = game
        .player(&current)
        .unwrap()
        .hand
        .iter()
        .copied()
        .filter(|c| !c.is_cat() && *c != Card::Nope && *c != Card::Defuse)
        .collect();
    if !playable.is_empty() && rng.gen_bool(0.4) {
        let card = *playable.choose(rng).unwrap();
        if game.play_card(&current, card).is_ok() {
            return;
        }
    }
    game.apply(&current, &Action::Draw)
        .unwrap_or_else(|e| panic!("{} could not draw: {} (stack {:?})", current, e, game.stack()));
}

/// Plays until someone wins, checking the card bookkeeping after every move
fn play_out(players: usize, seed: u64) -> Game {
    let mut game = new_game(players, seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut defuses = live_count(&game, Card::Defuse);
    assert_eq!(defuses, DEFUSES_COUNT);

    for _ in 0..MAX_STEPS {
        if game.is_over() {
            return game;
        }
        step(&mut game, &mut rng);
        game.drain_outbox();

        assert_eq!(
            live_count(&game, Card::ExplodingKitten),
            players - 1 - eliminated(&game),
            "kitten count drifted (seed {})",
            seed
        );
        let now = live_count(&game, Card::Defuse);
        assert!(now <= defuses, "defuses appeared from nowhere (seed {})", seed);
        defuses = now;
    }
    panic!("game with {} players (seed {}) did not finish", players, seed);
}

#[test]
fn two_player_games_finish() {
    for seed in 0..40 {
        let game = play_out(2, seed);
        assert!(game.is_over());
        let winner = game.winner().expect("a winner");
        assert_eq!(game.alive_players(), vec![winner]);
    }
}

#[test]
fn crowded_games_finish() {
    for players in 3..=6 {
        for seed in 0..15 {
            let game = play_out(players, seed);
            assert_eq!(game.alive_players().len(), 1);
            assert_eq!(eliminated(&game), players - 1);
            assert_eq!(game.stack(), &[] as &[Card]);
        }
    }
}

#[test]
fn seeded_games_repeat() {
    let first = play_out(4, 99);
    let second = play_out(4, 99);
    assert_eq!(first.winner(), second.winner());
    assert_eq!(first.deck().cards(), second.deck().cards());
}

#[test]
fn passive_players_only_draw() {
    // Nobody plays anything: the deck alone decides, in seat order
    let mut game = new_game(3, 5);
    let mut turns = 0;
    while !game.is_over() {
        let current = game.current_player().to_string();
        if game.is_placement_pending() {
            assert_ok!(game.place_card(&current, 0));
        } else {
            assert_ok!(game.draw(&current));
            turns += 1;
        }
        game.drain_outbox();
        assert!(turns < 200, "passive game never ended");
    }
    assert_eq!(live_count(&game, Card::ExplodingKitten), 0);
}
