//! # Muteroll Core Library
//!
//! This library provides the core business logic for Muteroll, a self-service
//! "draw a mute" roulette for chat groups. It implements a CLI-first philosophy
//! where all operations are available via a standalone CLI binary, with any
//! chat-platform adapter being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Expression Evaluator**: A constrained arithmetic language (numbers,
//!   `+ - * / ^`, `sqrt()`, scientific notation, implicit multiplication)
//! - **Duration Parser**: `<expression><unit>` strings evaluated and clamped
//!   to a safe millisecond range
//! - **Gacha Engine**: Pity/guarantee state machine deciding each draw's
//!   outcome, pure over an injected random source
//! - **Storage**: JSON-backed per-group draw records and mute log, TOML-based
//!   configuration with per-group overrides
//! - **Simulation**: Seeded Monte Carlo harness over the draw engine
//!
//! ## Key Components
//!
//! - [`evaluate`]: Expression evaluation
//! - [`parse_duration`]: Duration parsing
//! - [`draw`]: A single gacha draw against a [`GroupDrawRecord`]
//! - [`DrawService`]: Serialized read-modify-write draws against a store
//! - [`Config`]: Global and per-group gacha configuration

pub mod duration;
pub mod error;
pub mod expr;
pub mod gacha;
pub mod simulation;
pub mod storage;

pub use duration::{
    format_duration, parse_counted, parse_duration, DurationError, MAX_DURATION_MS, MIN_DURATION_MS,
};
pub use error::{ConfigError, CoreError, StoreError};
pub use expr::{evaluate, ExprError};
pub use gacha::{
    current_probability, draw, DrawService, GachaConfig, GroupDrawRecord, JackpotConfig, Outcome,
};
pub use simulation::{DrawSimulator, SimulationConfig, SimulationReport};
pub use storage::{Config, JsonRecordStore, MemoryRecordStore, MuteLog, MuteRecord, RecordStore};
