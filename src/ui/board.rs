use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use super::scene::refresh_active;
use super::state::AppState;
use crate::engine::memory::{FlipOutcome, SlotStatus};

pub const CONTENT_MARGIN: i32 = 12;
pub const TILE_GAP: i32 = 6;
pub const BOARD_COLUMNS: i32 = 4;

pub(super) fn redraw_button_child(button: &gtk::Button) {
    if let Some(child) = button.child() {
        child.queue_draw();
    }
}

fn draw_card_face(
    area: &gtk::DrawingArea,
    cr: &cairo::Context,
    width: i32,
    height: i32,
    text: &str,
    hidden: bool,
) {
    let min_dim = width.min(height) as f64;
    let font_size = if hidden { min_dim * 0.34 } else { min_dim * 0.16 };

    cr.set_antialias(cairo::Antialias::Best);

    let layout = pangocairo::functions::create_layout(cr);
    let mut font_desc = pango::FontDescription::new();
    font_desc.set_family("Cantarell, Noto Sans, sans");
    if hidden {
        font_desc.set_weight(pango::Weight::Bold);
    }
    font_desc.set_size((font_size.max(1.0) * pango::SCALE as f64) as i32);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    let fg = area.style_context().color();
    cr.set_source_rgba(
        fg.red() as f64,
        fg.green() as f64,
        fg.blue() as f64,
        fg.alpha() as f64,
    );

    let (text_width, text_height) = layout.pixel_size();
    let y = if hidden {
        (height as f64 - text_height as f64) / 2.0
    } else {
        height as f64 - text_height as f64 - min_dim * 0.06
    };
    cr.move_to((width as f64 - text_width as f64) / 2.0, y);
    pangocairo::functions::show_layout(cr, &layout);
}

pub fn build_board_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("memory-board");
    grid.set_row_spacing(TILE_GAP as u32);
    grid.set_column_spacing(TILE_GAP as u32);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);
    grid.set_row_homogeneous(true);
    grid.set_column_homogeneous(true);

    let slots: Vec<(String, String)> = {
        let st = state.borrow();
        st.memory
            .slots()
            .iter()
            .map(|slot| (slot.item.name.clone(), slot.item.image.clone()))
            .collect()
    };

    let mut buttons = Vec::with_capacity(slots.len());
    let mut pictures = Vec::with_capacity(slots.len());

    for (index, (name, image)) in slots.into_iter().enumerate() {
        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder()
            .css_classes(vec!["memory-card"])
            .build();
        button.set_hexpand(true);
        button.set_vexpand(true);
        button.set_tooltip_text(Some(&format!("Card {}", index + 1)));

        let overlay = gtk::Overlay::new();

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        drawing_area.add_css_class("memory-card-label");

        let state_draw = state.clone();
        drawing_area.set_draw_func(move |area, cr, width, height| {
            let st = state_draw.borrow();
            let Some(slot) = st.memory.slots().get(index) else {
                return;
            };
            let hidden = slot.status == SlotStatus::Hidden;
            let text = if hidden { "?" } else { slot.item.name.as_str() };
            draw_card_face(area, cr, width, height, text, hidden);
        });
        overlay.set_child(Some(&drawing_area));

        let picture = gtk::Picture::for_filename(&image);
        picture.set_can_shrink(true);
        picture.set_margin_top(8);
        picture.set_margin_bottom(28);
        picture.set_margin_start(8);
        picture.set_margin_end(8);
        picture.set_can_target(false);
        picture.set_tooltip_text(Some(&name));
        picture.set_visible(false);
        overlay.add_overlay(&picture);

        button.set_child(Some(&overlay));

        let state_click = state.clone();
        button.connect_clicked(move |_| {
            handle_slot_click(&state_click, index);
        });

        aspect_frame.set_child(Some(&button));

        let col = index as i32 % BOARD_COLUMNS;
        let row = index as i32 / BOARD_COLUMNS;
        grid.attach(&aspect_frame, col, row, 1, 1);
        buttons.push(button);
        pictures.push(picture);
    }

    let mut st = state.borrow_mut();
    st.grid_buttons = buttons;
    st.card_pictures = pictures;
    let board_id = st.memory.game_id();
    st.rendered_board_id = Some(board_id);
    sync_board(&st);

    grid
}

pub(super) fn board_rows(slot_count: usize) -> i32 {
    let cols = BOARD_COLUMNS as usize;
    slot_count.div_ceil(cols).max(1) as i32
}

pub(super) fn sync_board(st: &AppState) {
    let slots = st.memory.slots();
    for (index, button) in st.grid_buttons.iter().enumerate() {
        let Some(slot) = slots.get(index) else {
            continue;
        };
        button.remove_css_class("active");
        button.remove_css_class("matched");
        match slot.status {
            SlotStatus::Matched => button.add_css_class("matched"),
            SlotStatus::Flipped => button.add_css_class("active"),
            SlotStatus::Hidden => (),
        }
        if let Some(picture) = st.card_pictures.get(index) {
            picture.set_visible(slot.status != SlotStatus::Hidden);
        }
        redraw_button_child(button);
    }
}

pub fn handle_slot_click(state: &Rc<RefCell<AppState>>, index: usize) {
    let outcome = state.borrow_mut().memory.select_slot(index);
    match outcome {
        Ok(FlipOutcome::Completed {
            moves,
            seconds_elapsed,
        }) => {
            log::info!("Board cleared in {moves} moves and {seconds_elapsed}s");
        }
        Ok(_) => (),
        Err(err) => {
            log::debug!("Card {index} not flipped: {err}");
            return;
        }
    }
    refresh_active(state);
}
