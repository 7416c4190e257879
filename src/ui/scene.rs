use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use super::board::{BOARD_COLUMNS, board_rows, build_board_grid, sync_board};
use super::cups::sync_cups;
use super::hud::update_status_captions;
use super::loader::fetch_catalog;
use super::state::{AppState, GameKind};
use crate::engine::cups::CupPhase;
use crate::engine::state::Difficulty;

pub(super) fn rebuild_board(state: &Rc<RefCell<AppState>>) {
    let (board_container, slot_count) = {
        let st = state.borrow();
        (st.board_container.clone(), st.memory.slots().len())
    };
    let Some(board_container) = board_container else {
        return;
    };

    while let Some(child) = board_container.first_child() {
        board_container.remove(&child);
    }
    let grid = build_board_grid(state);
    let grid_ratio = BOARD_COLUMNS as f32 / board_rows(slot_count) as f32;
    let grid_frame = gtk::AspectFrame::new(0.5, 0.5, grid_ratio, false);
    grid_frame.set_halign(gtk::Align::Fill);
    grid_frame.set_valign(gtk::Align::Fill);
    grid_frame.set_hexpand(true);
    grid_frame.set_vexpand(true);
    grid_frame.set_child(Some(&grid));
    board_container.append(&grid_frame);
}

fn sync_difficulty_buttons(st: &AppState) {
    let locked = st.active == GameKind::Cups && st.cups.phase() == CupPhase::Shuffling;
    for (_, button) in &st.difficulty_buttons {
        button.set_sensitive(!locked);
    }
}

/// Brings the widgets of the visible game in line with its controller.
pub(super) fn refresh_active(state: &Rc<RefCell<AppState>>) {
    let needs_rebuild = {
        let st = state.borrow();
        st.active == GameKind::Memory
            && (st.rendered_board_id != Some(st.memory.game_id())
                || st.grid_buttons.len() != st.memory.slots().len())
    };
    if needs_rebuild {
        rebuild_board(state);
    }

    let st = state.borrow();
    match st.active {
        GameKind::Memory => sync_board(&st),
        GameKind::Cups => sync_cups(&st),
    }
    sync_difficulty_buttons(&st);
}

pub(super) fn init_active(state: &Rc<RefCell<AppState>>) {
    let needs_catalog = {
        let mut st = state.borrow_mut();
        st.init_active();
        st.needs_catalog()
    };
    if needs_catalog {
        fetch_catalog(state);
    }
    refresh_active(state);
}

pub(super) fn show_game(state: &Rc<RefCell<AppState>>, game: GameKind) {
    {
        let mut st = state.borrow_mut();
        st.active = game;
        if let Some(stack) = &st.view_stack {
            stack.set_transition_type(match game {
                GameKind::Memory => gtk::StackTransitionType::SlideRight,
                GameKind::Cups => gtk::StackTransitionType::SlideLeft,
            });
            stack.set_visible_child_name(game.page_name());
        }
        if let Some(button) = &st.main_action_button {
            button.set_tooltip_text(Some(match game {
                GameKind::Memory => "Restart Game",
                GameKind::Cups => "New Game",
            }));
        }
        update_status_captions(&st);
        log::info!("Switched to {}", game.title());
    }
    init_active(state);
}

pub(super) fn apply_difficulty_change(state: &Rc<RefCell<AppState>>, difficulty: Difficulty) {
    {
        let mut st = state.borrow_mut();
        if st.difficulty == difficulty {
            return;
        }
        st.difficulty = difficulty;
    }
    init_active(state);
}
