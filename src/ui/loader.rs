use std::cell::RefCell;
use std::rc::Rc;

use gio::prelude::*;
use gtk4::glib;

use super::scene::refresh_active;
use super::state::AppState;
use crate::catalog::parse_or_empty;

/// Fetches the item catalog off the main loop and hands it to the games.
/// A failed fetch still resolves the games, just with no items.
pub(super) fn fetch_catalog(state: &Rc<RefCell<AppState>>) {
    let location = {
        let mut st = state.borrow_mut();
        if st.catalog_loading {
            return;
        }
        st.catalog_loading = true;
        st.settings.catalog.clone()
    };

    let state = state.clone();
    glib::MainContext::default().spawn_local(async move {
        log::info!("Fetching item catalog from {location}");
        let file = gio::File::for_commandline_arg(&location);
        let items = match file.load_contents_future().await {
            Ok((bytes, _)) => parse_or_empty(&bytes, &location),
            Err(err) => {
                log::error!("Error fetching {location}: {err}");
                Vec::new()
            }
        };

        {
            let mut st = state.borrow_mut();
            st.catalog_loading = false;
            st.hand_over_catalog(items);
        }
        refresh_active(&state);
    });
}
