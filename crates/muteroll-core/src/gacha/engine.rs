//! Draw resolution.
//!
//! [`draw`] is a pure function of the record, the configuration, the clock
//! and the injected random source -- no I/O, no platform calls. The caller
//! persists the mutated record and applies the mute.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::config::{GachaConfig, JackpotConfig};
use super::record::GroupDrawRecord;
use crate::duration::{parse_duration, DurationError};

/// Window after which the hourly draw count resets.
pub const COUNT_RESET_WINDOW_MS: i64 = 3_600_000;

/// Probability added per pull once soft pity is reached.
const SOFT_PITY_STEP: f64 = 0.06;

/// Result of a single draw. Returned, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Mute length to apply.
    pub milliseconds: i64,
    /// Whether this draw resolved through the jackpot system.
    pub is_jackpot: bool,
    /// Whether this jackpot was forced by hard pity rather than rolled.
    pub is_guaranteed_hit: bool,
}

/// Jackpot probability for the given pity counter.
///
/// Flat at `base_prob` until soft pity, then ramps linearly starting the pull
/// after the threshold is reached.
pub fn current_probability(pity: u32, jackpot: &JackpotConfig) -> f64 {
    if pity < jackpot.soft_pity {
        jackpot.base_prob
    } else {
        jackpot.base_prob + (pity - jackpot.soft_pity + 1) as f64 * SOFT_PITY_STEP
    }
}

/// Resolve one draw, mutating `record` in place.
///
/// Only a malformed `up_duration`/`lose_duration` configuration string can
/// make this fail; random outcomes never do.
pub fn draw<R: Rng>(
    record: &mut GroupDrawRecord,
    config: &GachaConfig,
    now_ms: i64,
    rng: &mut R,
) -> Result<Outcome, DurationError> {
    // Hourly count reset. Pity and the carried guarantee survive the window.
    if now_ms - record.last_reset_time > COUNT_RESET_WINDOW_MS {
        record.count = 0;
        record.last_reset_time = now_ms;
    }

    record.count += 1;
    record.pity += 1;

    let jackpot = &config.jackpot;
    let prob = current_probability(record.pity, jackpot);
    let is_jackpot = record.pity >= jackpot.hard_pity || rng.gen::<f64>() < prob;

    if is_jackpot {
        let forced = record.pity >= jackpot.hard_pity;
        record.pity = 0;

        // 50/50: a carried guarantee is consumed, otherwise a fresh coin may
        // set one up for the next jackpot.
        let had_guarantee = record.guaranteed;
        if had_guarantee {
            record.guaranteed = false;
        } else if rng.gen::<f64>() < 0.5 {
            record.guaranteed = true;
        }

        debug!(
            forced,
            had_guarantee,
            carries_guarantee = record.guaranteed,
            "jackpot draw"
        );

        if jackpot.enabled {
            let expr = if had_guarantee {
                &jackpot.lose_duration
            } else {
                &jackpot.up_duration
            };
            let milliseconds = parse_duration(expr)?;
            return Ok(Outcome {
                milliseconds,
                is_jackpot: true,
                is_guaranteed_hit: forced,
            });
        }

        // Jackpot system disabled: the state machine above still ran, but the
        // duration comes from the ordinary curve.
        return Ok(Outcome {
            milliseconds: curve_duration(record.count, config, rng),
            is_jackpot: true,
            is_guaranteed_hit: forced,
        });
    }

    Ok(Outcome {
        milliseconds: curve_duration(record.count, config, rng),
        is_jackpot: false,
        is_guaranteed_hit: false,
    })
}

/// Ordinary duration: uniform over a range whose ceiling grows with the cube
/// root of the hourly draw count.
fn curve_duration<R: Rng>(count: u32, config: &GachaConfig, rng: &mut R) -> i64 {
    let base_max_ms = (config.base_max * 60_000.0) as i64;
    let base_min_ms = (config.base_min * 1_000.0) as i64;
    let additional_minutes = (((count - 1) as f64).cbrt() * config.growth_rate).floor() as i64;
    let max_ms = (base_max_ms + additional_minutes * 60_000).max(base_min_ms);
    rng.gen_range(base_min_ms..=max_ms)
}
