pub mod app;
pub mod board;
pub mod cups;
pub mod dialogs;
pub mod hud;
mod loader;
pub mod scene;
pub mod state;

pub use state::GameKind;
