use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;

use super::scene::refresh_active;
use super::state::{AppState, GameKind};
use crate::engine::display::StatusDisplay;

pub(super) const PUMP_INTERVAL_MS: u64 = 33;

/// Writes controller status straight into the status bar labels.
#[derive(Clone)]
pub struct LabelDisplay {
    counter: gtk::Label,
    elapsed: Option<gtk::Label>,
    message: gtk::Label,
}

impl LabelDisplay {
    pub fn new(counter: gtk::Label, elapsed: Option<gtk::Label>, message: gtk::Label) -> Self {
        LabelDisplay {
            counter,
            elapsed,
            message,
        }
    }
}

impl StatusDisplay for LabelDisplay {
    fn show_counter(&mut self, text: &str) {
        self.counter.set_text(text);
    }

    fn show_elapsed(&mut self, text: &str) {
        if let Some(label) = &self.elapsed {
            label.set_text(text);
        }
    }

    fn show_message(&mut self, text: &str) {
        self.message.set_text(text);
    }
}

pub(super) struct StatusBar {
    pub root: gtk::Box,
    pub counter_caption: gtk::Label,
    pub counter: gtk::Label,
    pub elapsed_box: gtk::Box,
    pub elapsed: gtk::Label,
    pub message: gtk::Label,
}

fn stat_box(caption: &gtk::Label, value: &gtk::Label) -> gtk::Box {
    let stat = gtk::Box::new(gtk::Orientation::Vertical, 2);
    stat.add_css_class("status-stat");
    caption.add_css_class("caption");
    caption.add_css_class("dim-label");
    value.add_css_class("status-value");
    stat.append(caption);
    stat.append(value);
    stat
}

pub(super) fn build_status_bar() -> StatusBar {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
    root.add_css_class("status-bar");

    let stats = gtk::Box::new(gtk::Orientation::Horizontal, 24);
    stats.set_halign(gtk::Align::Center);

    let counter_caption = gtk::Label::new(Some("Moves"));
    let counter = gtk::Label::new(Some("0"));
    stats.append(&stat_box(&counter_caption, &counter));

    let elapsed_caption = gtk::Label::new(Some("Time"));
    let elapsed = gtk::Label::new(Some("00:00"));
    let elapsed_box = stat_box(&elapsed_caption, &elapsed);
    stats.append(&elapsed_box);

    let message = gtk::Label::builder()
        .label("")
        .wrap(true)
        .justify(gtk::Justification::Center)
        .halign(gtk::Align::Center)
        .css_classes(vec!["status-message"])
        .build();

    root.append(&stats);
    root.append(&message);

    StatusBar {
        root,
        counter_caption,
        counter,
        elapsed_box,
        elapsed,
        message,
    }
}

pub(super) fn attempts_caption(wins: u32) -> String {
    format!("Attempts ({wins} won)")
}

pub(super) fn update_status_captions(st: &AppState) {
    if let Some(caption) = &st.counter_caption {
        match st.active {
            GameKind::Memory => caption.set_text("Moves"),
            GameKind::Cups => caption.set_text(&attempts_caption(st.cups.wins())),
        }
    }
    if let Some(elapsed_box) = &st.elapsed_box {
        elapsed_box.set_visible(st.active == GameKind::Memory);
    }
}

pub(super) fn stop_pump(st: &mut AppState) {
    if let Some(handle) = st.pump_handle.take() {
        handle.remove();
    }
    st.last_pump = None;
}

/// Drives the active controller's clock from wall time.
pub(super) fn start_pump(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();
    stop_pump(&mut st);
    st.last_pump = Some(Instant::now());

    let state_weak = Rc::downgrade(state);
    let handle = glib::timeout_add_local(Duration::from_millis(PUMP_INTERVAL_MS), move || {
        let Some(state) = state_weak.upgrade() else {
            return glib::ControlFlow::Break;
        };
        let changed = {
            let mut st = state.borrow_mut();
            let last = st.last_pump.unwrap_or_else(Instant::now);
            let ms = last.elapsed().as_millis() as u64;
            if ms == 0 {
                return glib::ControlFlow::Continue;
            }
            // Carry the sub-millisecond remainder into the next tick.
            st.last_pump = Some(last + Duration::from_millis(ms));
            let active = st.active;
            match active {
                GameKind::Memory => st.memory.advance(ms),
                GameKind::Cups => st.cups.advance(ms),
            }
        };
        if changed {
            refresh_active(&state);
        }
        glib::ControlFlow::Continue
    });
    st.pump_handle = Some(handle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_caption_carries_the_win_tally() {
        assert_eq!(attempts_caption(0), "Attempts (0 won)");
        assert_eq!(attempts_caption(3), "Attempts (3 won)");
    }
}
