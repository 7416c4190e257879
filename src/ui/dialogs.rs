use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

use super::state::GameKind;

fn instructions_for(game: GameKind) -> &'static str {
    match game {
        GameKind::Memory => {
            "Flip two cards at a time to find matching pairs.\n\
Cards that do not match turn back over after a moment.\n\
Clear the board in as few moves as you can."
        }
        GameKind::Cups => {
            "Press \"Start Shuffle\" and keep your eye on the item.\n\
The cups swap places, then you pick the one hiding it.\n\
A new round starts a few seconds after every guess."
        }
    }
}

pub fn show_instructions_dialog(app: &adw::Application, game: GameKind) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(Some(game.title()), Some(instructions_for(game)));
    dialog.add_response("ok", "Got it");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Matchshell")
        .application_icon("input-gaming-symbolic")
        .version(env!("CARGO_PKG_VERSION"))
        .comments("A card matching game and a shell game in one window.")
        .build();
    dialog.add_legal_section("Matchshell", None, gtk::License::MitX11, None);
    dialog.present(app.active_window().as_ref());
    dialog
}
