use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::display::StatusDisplay;
use super::scheduler::{Scheduler, TaskId};
use super::state::{Difficulty, format_mm_ss};
use crate::catalog::Item;
use crate::config::Settings;
use crate::error::{GameError, InputError};

const TICK_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    Hidden,
    Flipped,
    Matched,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSlot {
    pub index: usize,
    pub item: Item,
    pub status: SlotStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MemoryPhase {
    #[default]
    Loading,
    Unavailable,
    Ready,
    Running,
    Resolving,
    Complete,
}

impl MemoryPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            MemoryPhase::Loading => "loading",
            MemoryPhase::Unavailable => "unavailable",
            MemoryPhase::Ready => "ready",
            MemoryPhase::Running => "running",
            MemoryPhase::Resolving => "resolving",
            MemoryPhase::Complete => "complete",
        }
    }

    fn accepts_flips(self) -> bool {
        matches!(self, MemoryPhase::Ready | MemoryPhase::Running)
    }

    fn clock_running(self) -> bool {
        matches!(self, MemoryPhase::Running | MemoryPhase::Resolving)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    Flipped,
    Matched { pair: [usize; 2] },
    Mismatched { pair: [usize; 2] },
    Completed { moves: u32, seconds_elapsed: u32 },
}

#[derive(Clone, Copy, Debug)]
enum MemoryTask {
    Tick,
    HideMismatch([usize; 2]),
}

#[derive(Debug, Default)]
struct MemorySession {
    phase: MemoryPhase,
    slots: Vec<BoardSlot>,
    flipped_indices: Vec<usize>,
    pair_count: usize,
    matched_pairs: usize,
    moves: u32,
    seconds_elapsed: u32,
    timer_task: Option<TaskId>,
}

pub struct MemoryGame<D: StatusDisplay> {
    display: D,
    catalog: Option<Vec<Item>>,
    difficulty: Difficulty,
    mismatch_delay_ms: u64,
    session: MemorySession,
    scheduler: Scheduler<MemoryTask>,
    rng: StdRng,
}

/// Doubles the first `pair_count` items and shuffles them into a board.
pub fn build_board<R: rand::Rng>(
    items: &[Item],
    pair_count: usize,
    rng: &mut R,
) -> Result<Vec<BoardSlot>, GameError> {
    if items.is_empty() {
        return Err(GameError::DataUnavailable);
    }
    if items.len() < pair_count {
        log::warn!(
            "Catalog has {} items, fewer than the {} pairs requested",
            items.len(),
            pair_count
        );
    }
    let deck = &items[..pair_count.min(items.len())];
    let mut values: Vec<Item> = deck.iter().chain(deck.iter()).cloned().collect();
    values.shuffle(rng);

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, item)| BoardSlot {
            index,
            item,
            status: SlotStatus::Hidden,
        })
        .collect())
}

impl<D: StatusDisplay> MemoryGame<D> {
    pub fn new(display: D, settings: &Settings) -> Self {
        Self::with_rng(display, settings, StdRng::from_os_rng())
    }

    pub fn with_rng(display: D, settings: &Settings, rng: StdRng) -> Self {
        MemoryGame {
            display,
            catalog: None,
            difficulty: settings.difficulty(),
            mismatch_delay_ms: settings.mismatch_delay_ms,
            session: MemorySession::default(),
            scheduler: Scheduler::new(),
            rng,
        }
    }

    pub fn phase(&self) -> MemoryPhase {
        self.session.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn slots(&self) -> &[BoardSlot] {
        &self.session.slots
    }

    pub fn flipped_indices(&self) -> &[usize] {
        &self.session.flipped_indices
    }

    pub fn pair_count(&self) -> usize {
        self.session.pair_count
    }

    pub fn matched_pairs(&self) -> usize {
        self.session.matched_pairs
    }

    pub fn moves(&self) -> u32 {
        self.session.moves
    }

    pub fn seconds_elapsed(&self) -> u32 {
        self.session.seconds_elapsed
    }

    /// Changes on every `init`; front-end callbacks compare it before
    /// touching the board.
    pub fn game_id(&self) -> u64 {
        self.scheduler.generation()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn needs_catalog(&self) -> bool {
        self.catalog.as_ref().is_none_or(|items| items.is_empty())
    }

    /// Keeps the catalog for the next `init` without touching the board or
    /// the display.
    pub fn store_catalog(&mut self, items: Vec<Item>) {
        self.catalog = Some(items);
    }

    pub fn provide_catalog(&mut self, items: Vec<Item>) {
        self.store_catalog(items);
        if matches!(
            self.session.phase,
            MemoryPhase::Loading | MemoryPhase::Unavailable
        ) {
            self.init(self.difficulty);
        }
    }

    pub fn init(&mut self, difficulty: Difficulty) {
        log::info!("Initializing memory game with difficulty: {difficulty}");
        self.scheduler.reset();
        self.difficulty = difficulty;
        self.session = MemorySession::default();
        self.display.show_counter("0");
        self.display.show_elapsed(&format_mm_ss(0));

        let Some(items) = self.catalog.as_deref() else {
            self.display.show_message("Loading cards...");
            return;
        };

        match build_board(items, difficulty.pair_count(), &mut self.rng) {
            Ok(slots) => {
                self.session.pair_count = slots.len() / 2;
                self.session.slots = slots;
                self.session.phase = MemoryPhase::Ready;
                self.display.show_message("");
            }
            Err(err) => {
                log::error!("No memory cards available to start the game: {err}");
                self.session.phase = MemoryPhase::Unavailable;
                self.display
                    .show_message("No cards available. The card list could not be loaded.");
            }
        }
    }

    pub fn reset(&mut self) {
        self.init(self.difficulty);
    }

    pub fn select_slot(&mut self, index: usize) -> Result<FlipOutcome, InputError> {
        let phase = self.session.phase;
        if !phase.accepts_flips() {
            log::debug!("Ignoring flip of slot {index} while {}", phase.as_str());
            return Err(InputError::NotAccepting {
                phase: phase.as_str(),
            });
        }
        let len = self.session.slots.len();
        if index >= len {
            return Err(InputError::OutOfRange { index, len });
        }
        if self.session.slots[index].status != SlotStatus::Hidden {
            return Err(InputError::SlotUnavailable { index });
        }

        if phase == MemoryPhase::Ready {
            self.session.phase = MemoryPhase::Running;
            self.session.timer_task = Some(self.scheduler.schedule(TICK_MS, MemoryTask::Tick));
        }

        self.session.slots[index].status = SlotStatus::Flipped;
        self.session.flipped_indices.push(index);
        if self.session.flipped_indices.len() < 2 {
            return Ok(FlipOutcome::Flipped);
        }

        self.session.moves += 1;
        self.display.show_counter(&self.session.moves.to_string());

        let pair = [
            self.session.flipped_indices[0],
            self.session.flipped_indices[1],
        ];
        if self.session.slots[pair[0]].item.name == self.session.slots[pair[1]].item.name {
            for idx in pair {
                self.session.slots[idx].status = SlotStatus::Matched;
            }
            self.session.flipped_indices.clear();
            self.session.matched_pairs += 1;
            if self.session.matched_pairs == self.session.pair_count {
                return Ok(self.complete());
            }
            Ok(FlipOutcome::Matched { pair })
        } else {
            self.session.phase = MemoryPhase::Resolving;
            self.scheduler
                .schedule(self.mismatch_delay_ms, MemoryTask::HideMismatch(pair));
            Ok(FlipOutcome::Mismatched { pair })
        }
    }

    fn complete(&mut self) -> FlipOutcome {
        self.session.phase = MemoryPhase::Complete;
        if let Some(timer) = self.session.timer_task.take() {
            self.scheduler.cancel(timer);
        }
        let moves = self.session.moves;
        let seconds_elapsed = self.session.seconds_elapsed;
        log::info!("Memory game complete in {moves} moves, {seconds_elapsed}s");
        self.display.show_message(&format!(
            "Congratulations! You completed the game in {} moves and {}!",
            moves,
            format_mm_ss(seconds_elapsed)
        ));
        FlipOutcome::Completed {
            moves,
            seconds_elapsed,
        }
    }

    /// Moves the clock forward and runs whatever fell due. Returns whether
    /// anything visible changed.
    pub fn advance(&mut self, elapsed_ms: u64) -> bool {
        let target = self.scheduler.now().saturating_add(elapsed_ms);
        let mut changed = false;
        while let Some(task) = self.scheduler.pop_due(target) {
            changed |= self.run_task(task);
        }
        self.scheduler.advance_to(target);
        changed
    }

    fn run_task(&mut self, task: MemoryTask) -> bool {
        match task {
            MemoryTask::Tick => {
                if !self.session.phase.clock_running() {
                    self.session.timer_task = None;
                    return false;
                }
                self.session.seconds_elapsed += 1;
                self.display
                    .show_elapsed(&format_mm_ss(self.session.seconds_elapsed));
                self.session.timer_task = Some(self.scheduler.schedule(TICK_MS, MemoryTask::Tick));
                true
            }
            MemoryTask::HideMismatch(pair) => {
                if self.session.phase != MemoryPhase::Resolving {
                    return false;
                }
                for idx in pair {
                    if let Some(slot) = self.session.slots.get_mut(idx)
                        && slot.status == SlotStatus::Flipped
                    {
                        slot.status = SlotStatus::Hidden;
                    }
                }
                self.session.flipped_indices.clear();
                self.session.phase = MemoryPhase::Running;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::display::TextDisplay;

    fn catalog(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| Item {
                name: format!("item-{i}"),
                image: format!("images/{i}.png"),
            })
            .collect()
    }

    fn game_with(items: Vec<Item>, difficulty: Difficulty) -> MemoryGame<TextDisplay> {
        let mut game = MemoryGame::with_rng(
            TextDisplay::default(),
            &Settings::default(),
            StdRng::seed_from_u64(42),
        );
        game.provide_catalog(items);
        game.init(difficulty);
        game
    }

    fn pair_of(game: &MemoryGame<TextDisplay>, name: &str) -> [usize; 2] {
        let found: Vec<usize> = game
            .slots()
            .iter()
            .filter(|slot| slot.item.name == name)
            .map(|slot| slot.index)
            .collect();
        [found[0], found[1]]
    }

    fn mismatched(game: &MemoryGame<TextDisplay>) -> [usize; 2] {
        let first = &game.slots()[0];
        let other = game
            .slots()
            .iter()
            .find(|slot| slot.item.name != first.item.name)
            .unwrap();
        [first.index, other.index]
    }

    #[test]
    fn board_holds_each_leading_item_twice() {
        for difficulty in Difficulty::ALL {
            let game = game_with(catalog(10), difficulty);
            let pairs = difficulty.pair_count();
            assert_eq!(game.slots().len(), pairs * 2);
            assert_eq!(game.phase(), MemoryPhase::Ready);
            for item in &catalog(10)[..pairs] {
                let copies = game.slots().iter().filter(|s| s.item == *item).count();
                assert_eq!(copies, 2, "{} on {difficulty}", item.name);
            }
            assert!(game.slots().iter().all(|s| s.status == SlotStatus::Hidden));
        }
    }

    #[test]
    fn short_catalog_uses_every_item() {
        let game = game_with(catalog(3), Difficulty::Hard);
        assert_eq!(game.slots().len(), 6);
        assert_eq!(game.pair_count(), 3);
    }

    #[test]
    fn empty_catalog_is_visible_and_inert() {
        let mut game = game_with(Vec::new(), Difficulty::Easy);
        assert_eq!(game.phase(), MemoryPhase::Unavailable);
        assert!(game.slots().is_empty());
        assert!(game.display().message.contains("No cards available"));
        assert!(matches!(
            game.select_slot(0),
            Err(InputError::NotAccepting { phase: "unavailable" })
        ));
    }

    #[test]
    fn flips_before_catalog_arrives_are_ignored() {
        let mut game = MemoryGame::with_rng(
            TextDisplay::default(),
            &Settings::default(),
            StdRng::seed_from_u64(1),
        );
        game.init(Difficulty::Medium);
        assert_eq!(game.phase(), MemoryPhase::Loading);
        assert!(game.select_slot(0).is_err());

        game.provide_catalog(catalog(8));
        assert_eq!(game.phase(), MemoryPhase::Ready);
        assert_eq!(game.slots().len(), 12);
    }

    #[test]
    fn match_is_immediate_and_permanent() {
        let mut game = game_with(catalog(8), Difficulty::Easy);
        let [a, b] = pair_of(&game, "item-0");
        assert_eq!(game.select_slot(a), Ok(FlipOutcome::Flipped));
        assert_eq!(game.select_slot(b), Ok(FlipOutcome::Matched { pair: [a, b] }));
        assert_eq!(game.slots()[a].status, SlotStatus::Matched);
        assert_eq!(game.slots()[b].status, SlotStatus::Matched);
        assert_eq!(game.moves(), 1);
        assert_eq!(game.matched_pairs(), 1);

        game.advance(5000);
        assert_eq!(game.slots()[a].status, SlotStatus::Matched);
        assert_eq!(
            game.select_slot(a),
            Err(InputError::SlotUnavailable { index: a })
        );
    }

    #[test]
    fn mismatch_reverts_after_delay_and_blocks_input() {
        let mut game = game_with(catalog(8), Difficulty::Easy);
        let [a, b] = mismatched(&game);
        game.select_slot(a).unwrap();
        assert_eq!(
            game.select_slot(b),
            Ok(FlipOutcome::Mismatched { pair: [a, b] })
        );
        assert_eq!(game.phase(), MemoryPhase::Resolving);
        assert_eq!(game.moves(), 1);
        assert_eq!(game.display().counter, "1");

        let third = (0..game.slots().len()).find(|i| *i != a && *i != b).unwrap();
        assert!(matches!(
            game.select_slot(third),
            Err(InputError::NotAccepting { .. })
        ));

        game.advance(999);
        assert_eq!(game.slots()[a].status, SlotStatus::Flipped);
        assert!(game.advance(1));
        assert_eq!(game.slots()[a].status, SlotStatus::Hidden);
        assert_eq!(game.slots()[b].status, SlotStatus::Hidden);
        assert_eq!(game.phase(), MemoryPhase::Running);
        assert_eq!(game.moves(), 1);
        assert!(game.select_slot(third).is_ok());
    }

    #[test]
    fn same_slot_twice_is_rejected() {
        let mut game = game_with(catalog(8), Difficulty::Easy);
        game.select_slot(2).unwrap();
        assert_eq!(
            game.select_slot(2),
            Err(InputError::SlotUnavailable { index: 2 })
        );
        assert_eq!(
            game.select_slot(99),
            Err(InputError::OutOfRange { index: 99, len: 8 })
        );
        assert_eq!(game.flipped_indices(), &[2]);
    }

    #[test]
    fn timer_runs_from_first_flip_until_completion() {
        let mut game = game_with(catalog(8), Difficulty::Easy);
        game.advance(10_000);
        assert_eq!(game.seconds_elapsed(), 0);

        let [a, b] = pair_of(&game, "item-0");
        game.select_slot(a).unwrap();
        game.advance(2500);
        assert_eq!(game.seconds_elapsed(), 2);
        assert_eq!(game.display().elapsed, "00:02");
        game.select_slot(b).unwrap();

        for name in ["item-1", "item-2"] {
            let [x, y] = pair_of(&game, name);
            game.select_slot(x).unwrap();
            game.select_slot(y).unwrap();
        }
        game.advance(1000);
        let [x, y] = pair_of(&game, "item-3");
        game.select_slot(x).unwrap();
        assert_eq!(
            game.select_slot(y),
            Ok(FlipOutcome::Completed {
                moves: 4,
                seconds_elapsed: 3,
            })
        );
        assert_eq!(game.phase(), MemoryPhase::Complete);
        assert!(game.display().message.contains("4 moves"));
        assert!(game.display().message.contains("00:03"));

        game.advance(60_000);
        assert_eq!(game.seconds_elapsed(), 3);
    }

    #[test]
    fn completed_board_ignores_everything() {
        let mut game = game_with(catalog(8), Difficulty::Easy);
        for i in 0..4 {
            let [x, y] = pair_of(&game, &format!("item-{i}"));
            game.select_slot(x).unwrap();
            game.select_slot(y).unwrap();
        }
        assert_eq!(game.phase(), MemoryPhase::Complete);
        for index in 0..8 {
            assert!(matches!(
                game.select_slot(index),
                Err(InputError::NotAccepting { phase: "complete" })
            ));
        }
        assert_eq!(game.moves(), 4);
    }

    #[test]
    fn reset_cancels_pending_revert() {
        let mut game = game_with(catalog(8), Difficulty::Easy);
        let [a, b] = mismatched(&game);
        game.select_slot(a).unwrap();
        game.select_slot(b).unwrap();
        let old_id = game.game_id();

        game.reset();
        assert_ne!(game.game_id(), old_id);
        assert_eq!(game.phase(), MemoryPhase::Ready);
        assert_eq!(game.moves(), 0);

        let first = game.slots()[0].index;
        game.select_slot(first).unwrap();
        assert!(!game.advance(999));
        game.advance(2000);
        assert_eq!(game.slots()[first].status, SlotStatus::Flipped);
        assert_eq!(game.phase(), MemoryPhase::Running);
    }
}
