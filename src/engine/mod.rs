pub mod cups;
pub mod display;
pub mod memory;
pub mod scheduler;
pub mod shuffle;
pub mod state;
