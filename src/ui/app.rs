use std::cell::RefCell;
use std::rc::Rc;

use adw::prelude::*;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;

use super::board::CONTENT_MARGIN;
use super::cups::build_cup_view;
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::hud::{LabelDisplay, build_status_bar, start_pump};
use super::scene::{apply_difficulty_change, init_active, show_game};
use super::state::{AppState, GameKind};
use crate::config::Settings;
use crate::engine::state::Difficulty;

const APP_ID: &str = "io.github.matchshell.Matchshell";

fn load_css() {
    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };
    let provider = gtk::CssProvider::new();
    provider.load_from_data(include_str!("../../data/style.css"));
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_memory_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Fill);
    board_card.set_valign(gtk::Align::Fill);
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);
    board_card.add_css_class("memory-board-container");
    root.append(&board_card);

    state.borrow_mut().board_container = Some(board_card);
    root
}

fn linked_box() -> gtk::Box {
    let linked = gtk::Box::new(gtk::Orientation::Horizontal, 0);
    linked.add_css_class("linked");
    linked
}

pub fn run(settings: Settings, game: GameKind, difficulty: Difficulty) -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        load_css();

        let status = build_status_bar();
        let memory_display = LabelDisplay::new(
            status.counter.clone(),
            Some(status.elapsed.clone()),
            status.message.clone(),
        );
        let cups_display = LabelDisplay::new(status.counter.clone(), None, status.message.clone());
        let state = Rc::new(RefCell::new(AppState::new(
            settings.clone(),
            game,
            difficulty,
            memory_display,
            cups_display,
        )));

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            let state = state.clone();
            move |_, _| {
                let active = state.borrow().active;
                show_instructions_dialog(&app, active);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let restart_action = SimpleAction::new("restart", None);
        restart_action.connect_activate({
            let state = state.clone();
            move |_, _| init_active(&state)
        });
        app.add_action(&restart_action);
        app.set_accels_for_action("app.restart", &["<primary>r"]);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<primary>q"]);

        let memory_nav = gtk::ToggleButton::with_label(GameKind::Memory.title());
        let cups_nav = gtk::ToggleButton::with_label(GameKind::Cups.title());
        cups_nav.set_group(Some(&memory_nav));
        match game {
            GameKind::Memory => memory_nav.set_active(true),
            GameKind::Cups => cups_nav.set_active(true),
        }
        let nav_box = linked_box();
        nav_box.append(&memory_nav);
        nav_box.append(&cups_nav);

        let difficulty_box = linked_box();
        let mut difficulty_buttons: Vec<(Difficulty, gtk::ToggleButton)> = Vec::new();
        for level in Difficulty::ALL {
            let button = gtk::ToggleButton::with_label(level.name());
            if let Some((_, first)) = difficulty_buttons.first() {
                button.set_group(Some(first));
            }
            button.set_active(level == difficulty);
            difficulty_box.append(&button);
            difficulty_buttons.push((level, button));
        }

        let header = adw::HeaderBar::builder().title_widget(&nav_box).build();
        header.add_css_class("flat");
        header.pack_start(&difficulty_box);

        let menu_model = gio::Menu::new();
        menu_model.append(Some("Instructions"), Some("app.instructions"));
        menu_model.append(Some("About Matchshell"), Some("app.about"));
        menu_model.append(Some("Quit"), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .action_name("app.restart")
            .build();
        let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        end_box.append(&restart_button);
        end_box.append(&menu_button);
        header.pack_end(&end_box);

        let view_stack = gtk::Stack::new();
        view_stack.set_hexpand(true);
        view_stack.set_vexpand(true);
        view_stack.set_hhomogeneous(false);
        view_stack.set_vhomogeneous(false);
        view_stack.set_transition_duration(300);
        view_stack.add_named(&build_memory_view(&state), Some(GameKind::Memory.page_name()));
        view_stack.add_named(&build_cup_view(&state), Some(GameKind::Cups.page_name()));

        let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
        content.set_margin_top(CONTENT_MARGIN);
        content.set_margin_bottom(CONTENT_MARGIN);
        content.set_margin_start(CONTENT_MARGIN);
        content.set_margin_end(CONTENT_MARGIN);
        content.append(&status.root);
        content.append(&view_stack);

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&content));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Matchshell")
            .default_width(760)
            .default_height(720)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 520);

        {
            let mut st = state.borrow_mut();
            st.view_stack = Some(view_stack);
            st.main_action_button = Some(restart_button);
            st.counter_caption = Some(status.counter_caption.clone());
            st.elapsed_box = Some(status.elapsed_box.clone());
            st.difficulty_buttons = difficulty_buttons.clone();
        }

        for (kind, button) in [(GameKind::Memory, &memory_nav), (GameKind::Cups, &cups_nav)] {
            let state = state.clone();
            button.connect_toggled(move |button| {
                if button.is_active() {
                    show_game(&state, kind);
                }
            });
        }

        for (level, button) in &difficulty_buttons {
            let level = *level;
            let state = state.clone();
            button.connect_toggled(move |button| {
                if button.is_active() {
                    apply_difficulty_change(&state, level);
                }
            });
        }

        start_pump(&state);
        show_game(&state, game);
        win.present();
    });

    app.run_with_args::<&str>(&[])
}
