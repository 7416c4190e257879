use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::display::StatusDisplay;
use super::scheduler::Scheduler;
use super::shuffle::{Cup, Shuffle, lay_out_cups};
use super::state::{CupSettings, Difficulty};
use crate::catalog::Item;
use crate::config::Settings;
use crate::error::{GameError, InputError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CupPhase {
    #[default]
    Loading,
    Unavailable,
    Idle,
    Shuffling,
    AwaitingGuess,
    Resolved,
}

impl CupPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            CupPhase::Loading => "loading",
            CupPhase::Unavailable => "unavailable",
            CupPhase::Idle => "idle",
            CupPhase::Shuffling => "shuffling",
            CupPhase::AwaitingGuess => "awaiting guess",
            CupPhase::Resolved => "resolved",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CupMark {
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessOutcome {
    pub correct: bool,
    pub guessed: usize,
    pub winning: usize,
    /// Lane of the winning cup, counted from the left.
    pub lane: usize,
    pub item: Item,
}

#[derive(Clone, Copy, Debug)]
enum CupTask {
    Lift,
    Lower,
    ShuffleStep,
    NewRound,
}

#[derive(Clone, Copy, Debug)]
struct PeekTimings {
    lead_ms: u64,
    show_ms: u64,
}

#[derive(Debug, Default)]
struct CupSession {
    phase: CupPhase,
    cups: Vec<Cup>,
    winning_index: Option<usize>,
    target: Option<Item>,
    marks: Vec<Option<CupMark>>,
    lifted: Option<usize>,
    shuffle: Option<Shuffle>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    attempts: u32,
    wins: u32,
}

pub struct CupGame<D: StatusDisplay> {
    display: D,
    catalog: Option<Vec<Item>>,
    difficulty: Difficulty,
    settings: CupSettings,
    restart_delay_ms: u64,
    peek: Option<PeekTimings>,
    session: CupSession,
    tally: Tally,
    scheduler: Scheduler<CupTask>,
    rng: StdRng,
}

impl<D: StatusDisplay> CupGame<D> {
    pub fn new(display: D, settings: &Settings) -> Self {
        Self::with_rng(display, settings, StdRng::from_os_rng())
    }

    pub fn with_rng(display: D, settings: &Settings, rng: StdRng) -> Self {
        let difficulty = settings.difficulty();
        CupGame {
            display,
            catalog: None,
            difficulty,
            settings: difficulty.cup_settings(),
            restart_delay_ms: settings.restart_delay_ms,
            peek: settings.peek_enabled().then_some(PeekTimings {
                lead_ms: settings.peek_lead_ms,
                show_ms: settings.peek_show_ms,
            }),
            session: CupSession::default(),
            tally: Tally::default(),
            scheduler: Scheduler::new(),
            rng,
        }
    }

    pub fn phase(&self) -> CupPhase {
        self.session.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn settings(&self) -> CupSettings {
        self.settings
    }

    pub fn cups(&self) -> &[Cup] {
        &self.session.cups
    }

    /// Only known once a round has started.
    pub fn winning_index(&self) -> Option<usize> {
        self.session.winning_index
    }

    /// Lane the hidden item sits in.
    pub fn item_lane(&self) -> Option<usize> {
        self.session
            .winning_index
            .and_then(|winning| self.session.cups.get(winning))
            .map(|cup| cup.position)
    }

    pub fn target(&self) -> Option<&Item> {
        self.session.target.as_ref()
    }

    pub fn marks(&self) -> &[Option<CupMark>] {
        &self.session.marks
    }

    pub fn lifted_cup(&self) -> Option<usize> {
        self.session.lifted
    }

    pub fn attempts(&self) -> u32 {
        self.tally.attempts
    }

    pub fn wins(&self) -> u32 {
        self.tally.wins
    }

    pub fn game_id(&self) -> u64 {
        self.scheduler.generation()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn needs_catalog(&self) -> bool {
        self.catalog.as_ref().is_none_or(|items| items.is_empty())
    }

    /// Keeps the catalog for the next `init` without touching the table or
    /// the display.
    pub fn store_catalog(&mut self, items: Vec<Item>) {
        self.catalog = Some(items);
    }

    pub fn provide_catalog(&mut self, items: Vec<Item>) {
        self.store_catalog(items);
        if matches!(self.session.phase, CupPhase::Loading | CupPhase::Unavailable) {
            self.init(self.difficulty);
        }
    }

    pub fn init(&mut self, difficulty: Difficulty) {
        log::info!("Setting cup game difficulty to: {difficulty}");
        self.scheduler.reset();
        self.difficulty = difficulty;
        self.settings = difficulty.cup_settings();
        self.tally = Tally::default();
        self.setup_round();
    }

    fn setup_round(&mut self) {
        self.session = CupSession {
            cups: lay_out_cups(self.settings.cups),
            marks: vec![None; self.settings.cups],
            ..CupSession::default()
        };
        self.display.show_counter(&self.tally.attempts.to_string());

        match self.pick_target() {
            Ok(Some(target)) => {
                self.session.target = Some(target);
                self.session.phase = CupPhase::Idle;
                self.display.show_message("Click \"Start Shuffle\" to begin!");
            }
            Ok(None) => {
                self.session.phase = CupPhase::Loading;
                self.display.show_message("Loading items...");
            }
            Err(err) => {
                log::error!("Cup game cannot start: {err}");
                self.session.phase = CupPhase::Unavailable;
                self.display
                    .show_message("No items available. The item list could not be loaded.");
            }
        }
    }

    fn pick_target(&mut self) -> Result<Option<Item>, GameError> {
        let Some(items) = self.catalog.as_deref() else {
            return Ok(None);
        };
        items
            .choose(&mut self.rng)
            .cloned()
            .map(Some)
            .ok_or(GameError::DataUnavailable)
    }

    pub fn start_round(&mut self) -> Result<(), InputError> {
        let phase = self.session.phase;
        if phase != CupPhase::Idle {
            log::debug!("Ignoring start while {}", phase.as_str());
            return Err(InputError::NotAccepting {
                phase: phase.as_str(),
            });
        }

        let winning = self.rng.random_range(0..self.session.cups.len());
        self.session.winning_index = Some(winning);
        self.session.shuffle = Some(Shuffle::new(
            self.settings.shuffle_moves,
            self.settings.shuffle_speed_ms,
        ));
        self.session.phase = CupPhase::Shuffling;
        self.display.show_message("Watch carefully...");
        log::info!(
            "Cup round started: {} cups, {} swaps every {}ms",
            self.settings.cups,
            self.settings.shuffle_moves,
            self.settings.shuffle_speed_ms
        );

        match self.peek {
            Some(peek) => self.scheduler.schedule(peek.lead_ms, CupTask::Lift),
            None => self.scheduler.schedule(0, CupTask::ShuffleStep),
        };
        Ok(())
    }

    pub fn guess(&mut self, cup_index: usize) -> Result<GuessOutcome, InputError> {
        let phase = self.session.phase;
        let (Some(winning), Some(item)) = (self.session.winning_index, self.session.target.clone())
        else {
            return Err(InputError::NotAccepting {
                phase: phase.as_str(),
            });
        };
        if phase != CupPhase::AwaitingGuess {
            log::debug!("Ignoring guess of cup {cup_index} while {}", phase.as_str());
            return Err(InputError::NotAccepting {
                phase: phase.as_str(),
            });
        }
        let len = self.session.cups.len();
        if cup_index >= len {
            return Err(InputError::OutOfRange {
                index: cup_index,
                len,
            });
        }

        self.session.marks = (0..len)
            .map(|idx| {
                Some(if idx == winning {
                    CupMark::Correct
                } else {
                    CupMark::Incorrect
                })
            })
            .collect();
        let correct = cup_index == winning;
        let lane = self.session.cups[winning].position;
        self.tally.attempts += 1;
        if correct {
            self.tally.wins += 1;
        }
        self.display.show_counter(&self.tally.attempts.to_string());
        if correct {
            self.display.show_message(&format!(
                "Correct! The {} was under cup {}. You win!",
                item.name,
                lane + 1
            ));
        } else {
            self.display.show_message(&format!(
                "Wrong! The {} was under cup {}.",
                item.name,
                lane + 1
            ));
        }

        self.session.phase = CupPhase::Resolved;
        self.scheduler
            .schedule(self.restart_delay_ms, CupTask::NewRound);
        Ok(GuessOutcome {
            correct,
            guessed: cup_index,
            winning,
            lane,
            item,
        })
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

    fn run_task(&mut self, task: CupTask) -> bool {
        match task {
            CupTask::NewRound => {
                if self.session.phase != CupPhase::Resolved {
                    return false;
                }
                self.setup_round();
                true
            }
            _ if self.session.phase != CupPhase::Shuffling => false,
            CupTask::Lift => {
                self.session.lifted = self.session.winning_index;
                if let Some(peek) = self.peek {
                    self.scheduler.schedule(peek.show_ms, CupTask::Lower);
                }
                true
            }
            CupTask::Lower => {
                self.session.lifted = None;
                let pause = self.peek.map_or(0, |peek| peek.lead_ms);
                self.scheduler.schedule(pause, CupTask::ShuffleStep);
                true
            }
            CupTask::ShuffleStep => {
                let Some(winning) = self.session.winning_index else {
                    return false;
                };
                let Some(shuffle) = self.session.shuffle.as_mut() else {
                    return false;
                };
                let step = shuffle.step(&mut self.rng, &mut self.session.cups, winning);
                let speed = shuffle.speed_ms;
                match step {
                    Some((_, next_winning)) => {
                        self.session.winning_index = Some(next_winning);
                        self.scheduler.schedule(speed, CupTask::ShuffleStep);
                    }
                    None => self.finish_shuffle(),
                }
                true
            }
        }
    }

    fn finish_shuffle(&mut self) {
        self.session.shuffle = None;
        self.session.phase = CupPhase::AwaitingGuess;
        let name = self
            .session
            .target
            .as_ref()
            .map_or("item", |item| item.name.as_str());
        self.display
            .show_message(&format!("Where is the {name}? Make your guess!"));
    }
}
