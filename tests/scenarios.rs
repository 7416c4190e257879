use std::cell::RefCell;
use std::rc::Rc;

use matchshell::catalog::{Item, parse_catalog};
use matchshell::config::Settings;
use matchshell::engine::display::TextDisplay;
use matchshell::engine::memory::{FlipOutcome, SlotStatus};
use matchshell::engine::shuffle::{Swap, apply_swap, lay_out_cups};
use matchshell::{CupGame, CupPhase, Difficulty, MemoryGame, MemoryPhase, StatusDisplay};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// One set of status regions written by both games, as in the desktop shell.
#[derive(Clone, Default)]
struct SharedDisplay(Rc<RefCell<TextDisplay>>);

impl StatusDisplay for SharedDisplay {
    fn show_counter(&mut self, text: &str) {
        self.0.borrow_mut().show_counter(text);
    }

    fn show_elapsed(&mut self, text: &str) {
        self.0.borrow_mut().show_elapsed(text);
    }

    fn show_message(&mut self, text: &str) {
        self.0.borrow_mut().show_message(text);
    }
}

fn letters() -> Vec<Item> {
    let raw = br#"[
        {"name": "A", "image": "a.png"}, {"name": "B", "image": "b.png"},
        {"name": "C", "image": "c.png"}, {"name": "D", "image": "d.png"},
        {"name": "E", "image": "e.png"}, {"name": "F", "image": "f.png"},
        {"name": "G", "image": "g.png"}, {"name": "H", "image": "h.png"}
    ]"#;
    parse_catalog(raw).unwrap()
}

#[test]
fn easy_board_from_eight_letters() {
    let mut game = MemoryGame::with_rng(
        TextDisplay::default(),
        &Settings::default(),
        StdRng::seed_from_u64(2024),
    );
    game.provide_catalog(letters());
    game.init("easy".parse().unwrap());

    assert_eq!(game.slots().len(), 8);
    let mut names: Vec<&str> = game.slots().iter().map(|s| s.item.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["A", "A", "B", "B", "C", "C", "D", "D"]);

    let a: Vec<usize> = game
        .slots()
        .iter()
        .filter(|slot| slot.item.name == "A")
        .map(|slot| slot.index)
        .collect();
    game.select_slot(a[0]).unwrap();
    let outcome = game.select_slot(a[1]).unwrap();
    assert_eq!(outcome, FlipOutcome::Matched { pair: [a[0], a[1]] });
    assert_eq!(game.slots()[a[0]].status, SlotStatus::Matched);
    assert_eq!(game.slots()[a[1]].status, SlotStatus::Matched);
    assert_eq!(game.matched_pairs(), 1);
    assert_eq!(game.moves(), 1);
}

#[test]
fn three_cup_swaps_retarget_only_when_touched() {
    let mut cups = lay_out_cups(3);
    let winning = 1;
    let winning = apply_swap(&mut cups, winning, Swap { first: 0, second: 2 });
    assert_eq!(winning, 1);
    let winning = apply_swap(&mut cups, winning, Swap { first: 1, second: 2 });
    assert_eq!(winning, 2);
    assert_eq!(cups[winning].position, 1);
}

#[test]
fn both_games_refuse_to_start_without_items() {
    let settings = Settings::default();

    let mut memory = MemoryGame::new(TextDisplay::default(), &settings);
    memory.provide_catalog(Vec::new());
    memory.init(Difficulty::Medium);
    assert_eq!(memory.phase(), MemoryPhase::Unavailable);
    assert!(memory.slots().is_empty());
    assert!(!memory.display().message.is_empty());

    let mut cups = CupGame::new(TextDisplay::default(), &settings);
    cups.provide_catalog(Vec::new());
    cups.init(Difficulty::Medium);
    assert_eq!(cups.phase(), CupPhase::Unavailable);
    assert!(cups.target().is_none());
    assert!(cups.start_round().is_err());
}

#[test]
fn one_guess_per_round() {
    let mut game = CupGame::with_rng(
        TextDisplay::default(),
        &Settings::default(),
        StdRng::seed_from_u64(5),
    );
    game.provide_catalog(letters());
    game.init(Difficulty::Hard);
    game.start_round().unwrap();
    game.advance(30_000);
    assert_eq!(game.phase(), CupPhase::AwaitingGuess);

    let first = game.guess(0).unwrap();
    for cup in 0..5 {
        assert!(game.guess(cup).is_err());
    }
    assert_eq!(game.attempts(), 1);
    assert_eq!(first.winning, game.winning_index().unwrap());
}

#[test]
fn hidden_game_keeps_quiet_when_items_arrive() {
    let shared = SharedDisplay::default();
    let settings = Settings::default();
    let mut memory =
        MemoryGame::with_rng(shared.clone(), &settings, StdRng::seed_from_u64(8));
    let mut cups = CupGame::with_rng(shared.clone(), &settings, StdRng::seed_from_u64(9));

    memory.init(Difficulty::Easy);
    assert_eq!(shared.0.borrow().message, "Loading cards...");

    cups.store_catalog(letters());
    memory.provide_catalog(letters());
    assert_eq!(memory.phase(), MemoryPhase::Ready);
    assert_eq!(cups.phase(), CupPhase::Loading);
    assert_eq!(shared.0.borrow().message, "");
    assert_eq!(shared.0.borrow().counter, "0");

    let [a, b] = {
        let first = &memory.slots()[0];
        let other = memory
            .slots()
            .iter()
            .find(|slot| slot.item.name != first.item.name)
            .unwrap();
        [first.index, other.index]
    };
    memory.select_slot(a).unwrap();
    memory.select_slot(b).unwrap();
    assert_eq!(shared.0.borrow().counter, "1");

    cups.init(Difficulty::Easy);
    assert_eq!(cups.phase(), CupPhase::Idle);
    assert_eq!(shared.0.borrow().counter, "0");
    assert!(shared.0.borrow().message.contains("Start Shuffle"));
}
