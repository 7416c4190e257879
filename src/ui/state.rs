use std::time::Instant;

use gtk4 as gtk;

use super::hud::LabelDisplay;
use crate::catalog::Item;
use crate::config::Settings;
use crate::engine::cups::CupGame;
use crate::engine::memory::MemoryGame;
use crate::engine::state::Difficulty;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum GameKind {
    #[default]
    Memory,
    Cups,
}

impl GameKind {
    pub fn page_name(self) -> &'static str {
        match self {
            GameKind::Memory => "memory",
            GameKind::Cups => "cups",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Memory => "Memory",
            GameKind::Cups => "Shell Game",
        }
    }
}

pub struct AppState {
    pub settings: Settings,
    pub active: GameKind,
    pub difficulty: Difficulty,
    pub memory: MemoryGame<LabelDisplay>,
    pub cups: CupGame<LabelDisplay>,
    pub catalog_loading: bool,

    pub view_stack: Option<gtk::Stack>,
    pub board_container: Option<gtk::Box>,
    pub grid_buttons: Vec<gtk::Button>,
    pub card_pictures: Vec<gtk::Picture>,
    pub rendered_board_id: Option<u64>,
    pub cup_area: Option<gtk::DrawingArea>,
    pub start_button: Option<gtk::Button>,
    pub main_action_button: Option<gtk::Button>,
    pub counter_caption: Option<gtk::Label>,
    pub elapsed_box: Option<gtk::Box>,
    pub difficulty_buttons: Vec<(Difficulty, gtk::ToggleButton)>,

    pub pump_handle: Option<glib::SourceId>,
    pub last_pump: Option<Instant>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        active: GameKind,
        difficulty: Difficulty,
        memory_display: LabelDisplay,
        cups_display: LabelDisplay,
    ) -> Self {
        let memory = MemoryGame::new(memory_display, &settings);
        let cups = CupGame::new(cups_display, &settings);
        AppState {
            settings,
            active,
            difficulty,
            memory,
            cups,
            catalog_loading: false,
            view_stack: None,
            board_container: None,
            grid_buttons: Vec::new(),
            card_pictures: Vec::new(),
            rendered_board_id: None,
            cup_area: None,
            start_button: None,
            main_action_button: None,
            counter_caption: None,
            elapsed_box: None,
            difficulty_buttons: Vec::new(),
            pump_handle: None,
            last_pump: None,
        }
    }

    pub fn needs_catalog(&self) -> bool {
        match self.active {
            GameKind::Memory => self.memory.needs_catalog(),
            GameKind::Cups => self.cups.needs_catalog(),
        }
    }

    /// Only the visible game rebuilds from the new catalog. The other one
    /// keeps it for its next `init`, so it never writes into the shared
    /// status labels while hidden.
    pub fn hand_over_catalog(&mut self, items: Vec<Item>) {
        match self.active {
            GameKind::Memory => {
                self.cups.store_catalog(items.clone());
                self.memory.provide_catalog(items);
            }
            GameKind::Cups => {
                self.memory.store_catalog(items.clone());
                self.cups.provide_catalog(items);
            }
        }
    }

    pub fn init_active(&mut self) {
        let difficulty = self.difficulty;
        match self.active {
            GameKind::Memory => self.memory.init(difficulty),
            GameKind::Cups => self.cups.init(difficulty),
        }
    }
}
