use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use super::hud::update_status_captions;
use super::scene::refresh_active;
use super::state::AppState;
use crate::engine::cups::{CupMark, CupPhase};

const CUP_COLOR: (f64, f64, f64) = (0.71, 0.42, 0.22);
const CORRECT_COLOR: (f64, f64, f64) = (0.18, 0.63, 0.35);
const INCORRECT_COLOR: (f64, f64, f64) = (0.82, 0.24, 0.24);
const ITEM_COLOR: (f64, f64, f64) = (0.96, 0.78, 0.26);

/// Lane under a horizontal offset for a table `width` pixels wide.
pub(super) fn lane_at(x: f64, width: f64, lanes: usize) -> Option<usize> {
    if lanes == 0 || width <= 0.0 || x < 0.0 || x >= width {
        return None;
    }
    let lane = ((x / width) * lanes as f64) as usize;
    Some(lane.min(lanes - 1))
}

struct CupGeometry {
    lane_width: f64,
    cup_width: f64,
    cup_height: f64,
    base_y: f64,
    lift: f64,
}

impl CupGeometry {
    fn new(width: f64, height: f64, lanes: usize) -> Self {
        let lane_width = width / lanes.max(1) as f64;
        let cup_width = (lane_width * 0.7).min(height * 0.55);
        let cup_height = cup_width * 1.1;
        CupGeometry {
            lane_width,
            cup_width,
            cup_height,
            base_y: height * 0.85,
            lift: cup_height * 0.75,
        }
    }

    fn center_x(&self, lane: usize) -> f64 {
        (lane as f64 + 0.5) * self.lane_width
    }
}

fn draw_item(
    cr: &cairo::Context,
    geo: &CupGeometry,
    lane: usize,
    name: &str,
) -> Result<(), cairo::Error> {
    let radius = geo.cup_width * 0.18;
    let x = geo.center_x(lane);
    let y = geo.base_y - radius;
    let (r, g, b) = ITEM_COLOR;
    cr.set_source_rgb(r, g, b);
    cr.arc(x, y, radius, 0.0, 2.0 * PI);
    cr.fill()?;

    let layout = pangocairo::functions::create_layout(cr);
    let mut font_desc = pango::FontDescription::new();
    font_desc.set_family("Cantarell, Noto Sans, sans");
    font_desc.set_weight(pango::Weight::Bold);
    font_desc.set_size(((geo.cup_width * 0.12).max(1.0) * pango::SCALE as f64) as i32);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(name);
    let (text_width, _) = layout.pixel_size();
    cr.set_source_rgb(0.2, 0.2, 0.2);
    cr.move_to(x - text_width as f64 / 2.0, geo.base_y + 4.0);
    pangocairo::functions::show_layout(cr, &layout);
    Ok(())
}

fn draw_cup(
    cr: &cairo::Context,
    geo: &CupGeometry,
    lane: usize,
    raised: bool,
    mark: Option<CupMark>,
) -> Result<(), cairo::Error> {
    let x = geo.center_x(lane);
    let bottom = if raised { geo.base_y - geo.lift } else { geo.base_y };
    let top = bottom - geo.cup_height;
    let half_bottom = geo.cup_width / 2.0;
    let half_top = half_bottom * 0.6;

    let (r, g, b) = match mark {
        Some(CupMark::Correct) => CORRECT_COLOR,
        Some(CupMark::Incorrect) => INCORRECT_COLOR,
        None => CUP_COLOR,
    };
    cr.set_source_rgb(r, g, b);
    cr.move_to(x - half_bottom, bottom);
    cr.line_to(x - half_top, top);
    cr.line_to(x + half_top, top);
    cr.line_to(x + half_bottom, bottom);
    cr.close_path();
    cr.fill_preserve()?;
    cr.set_source_rgba(0.0, 0.0, 0.0, 0.35);
    cr.set_line_width(2.0);
    cr.stroke()?;
    Ok(())
}

fn draw_table(
    st: &AppState,
    cr: &cairo::Context,
    width: i32,
    height: i32,
) -> Result<(), cairo::Error> {
    let game = &st.cups;
    let cups = game.cups();
    if cups.is_empty() {
        return Ok(());
    }
    cr.set_antialias(cairo::Antialias::Best);
    let geo = CupGeometry::new(width as f64, height as f64, cups.len());

    let revealed = game.phase() == CupPhase::Resolved;
    let lifted = game.lifted_cup();
    if let (Some(lane), Some(item)) = (game.item_lane(), game.target())
        && (revealed || lifted.is_some())
    {
        draw_item(cr, &geo, lane, &item.name)?;
    }

    let marks = game.marks();
    for cup in cups {
        let raised = revealed || lifted == Some(cup.index);
        let mark = marks.get(cup.index).copied().flatten();
        draw_cup(cr, &geo, cup.position, raised, mark)?;
    }
    Ok(())
}

pub fn build_cup_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("cups-root");

    let area = gtk::DrawingArea::builder()
        .hexpand(true)
        .vexpand(true)
        .content_height(240)
        .build();
    area.add_css_class("cup-table");

    let state_draw = state.clone();
    area.set_draw_func(move |_, cr, width, height| {
        let st = state_draw.borrow();
        if let Err(err) = draw_table(&st, cr, width, height) {
            log::warn!("Failed to draw cups: {err}");
        }
    });

    let click = gtk::GestureClick::new();
    let area_weak = area.downgrade();
    let state_click = state.clone();
    click.connect_pressed(move |_, _, x, _| {
        let Some(area) = area_weak.upgrade() else {
            return;
        };
        handle_table_click(&state_click, x, area.width() as f64);
    });
    area.add_controller(click);

    let start_button = gtk::Button::with_label("Start Shuffle");
    start_button.add_css_class("suggested-action");
    start_button.add_css_class("pill");
    start_button.set_halign(gtk::Align::Center);
    start_button.connect_clicked({
        let state = state.clone();
        move |_| {
            handle_start_shuffle(&state);
        }
    });

    root.append(&area);
    root.append(&start_button);

    {
        let mut st = state.borrow_mut();
        st.cup_area = Some(area);
        st.start_button = Some(start_button);
    }

    root
}

pub(super) fn sync_cups(st: &AppState) {
    if let Some(area) = &st.cup_area {
        area.queue_draw();
    }
    if let Some(button) = &st.start_button {
        button.set_sensitive(st.cups.phase() == CupPhase::Idle);
    }
    update_status_captions(st);
}

fn handle_start_shuffle(state: &Rc<RefCell<AppState>>) {
    let started = state.borrow_mut().cups.start_round();
    if let Err(err) = started {
        log::debug!("Shuffle not started: {err}");
        return;
    }
    refresh_active(state);
}

fn handle_table_click(state: &Rc<RefCell<AppState>>, x: f64, width: f64) {
    let outcome = {
        let mut st = state.borrow_mut();
        let lane = lane_at(x, width, st.cups.cups().len());
        let cup = lane.and_then(|lane| {
            st.cups
                .cups()
                .iter()
                .find(|cup| cup.position == lane)
                .map(|cup| cup.index)
        });
        let Some(cup) = cup else {
            return;
        };
        st.cups.guess(cup)
    };
    match outcome {
        Ok(outcome) => {
            log::info!(
                "Guessed cup {}, {} was in lane {}",
                outcome.guessed + 1,
                outcome.item.name,
                outcome.lane + 1
            );
            refresh_active(state);
        }
        Err(err) => log::debug!("Guess ignored: {err}"),
    }
}
