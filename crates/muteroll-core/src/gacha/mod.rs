//! Gacha draw engine.
//!
//! Decides how long a draw mutes the caller: ordinary draws roll on a
//! growth curve that rises with recent usage, rare "jackpot" draws resolve
//! through a pity/guarantee state machine to one of two fixed durations.

mod config;
mod engine;
mod record;
mod service;

pub use config::{GachaConfig, JackpotConfig};
pub use engine::{current_probability, draw, Outcome, COUNT_RESET_WINDOW_MS};
pub use record::GroupDrawRecord;
pub use service::DrawService;
