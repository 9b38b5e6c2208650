//! Gacha configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the draw engine.
///
/// One table configures a group; per-group tables override the global one
/// wholesale (see [`crate::storage::Config`]). camelCase aliases are accepted
/// for keys carried over from earlier deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GachaConfig {
    /// Master switch for the draw command.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Floor of the ordinary duration range, in seconds.
    #[serde(default = "default_base_min", alias = "baseMin")]
    pub base_min: f64,
    /// Ceiling of the ordinary duration range before growth, in minutes.
    #[serde(default = "default_base_max", alias = "baseMax")]
    pub base_max: f64,
    /// Growth factor: extra ceiling minutes per cube root of the hourly
    /// draw count.
    #[serde(default = "default_growth_rate", alias = "growthRate")]
    pub growth_rate: f64,
    /// Jackpot sub-system configuration.
    #[serde(default)]
    pub jackpot: JackpotConfig,
}

/// Configuration for the jackpot pity system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JackpotConfig {
    /// Whether jackpot draws use the fixed durations below. The pity state
    /// machine runs either way.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Probability of a jackpot before soft pity, in `[0, 1]`.
    #[serde(default = "default_base_prob", alias = "baseProb")]
    pub base_prob: f64,
    /// Pull count at which the probability starts ramping.
    #[serde(default = "default_soft_pity", alias = "softPity")]
    pub soft_pity: u32,
    /// Pull count at which a jackpot is forced.
    #[serde(default = "default_hard_pity", alias = "hardPity")]
    pub hard_pity: u32,
    /// Duration expression for the featured outcome.
    #[serde(default = "default_up_duration", alias = "upDuration")]
    pub up_duration: String,
    /// Duration expression for the carried-guarantee outcome.
    #[serde(default = "default_lose_duration", alias = "loseDuration")]
    pub lose_duration: String,
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_min: default_base_min(),
            base_max: default_base_max(),
            growth_rate: default_growth_rate(),
            jackpot: JackpotConfig::default(),
        }
    }
}

impl Default for JackpotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_prob: default_base_prob(),
            soft_pity: default_soft_pity(),
            hard_pity: default_hard_pity(),
            up_duration: default_up_duration(),
            lose_duration: default_lose_duration(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_base_min() -> f64 {
    1.0
}
fn default_base_max() -> f64 {
    30.0
}
fn default_growth_rate() -> f64 {
    30.0
}
fn default_base_prob() -> f64 {
    0.006
}
fn default_soft_pity() -> u32 {
    73
}
fn default_hard_pity() -> u32 {
    89
}
fn default_up_duration() -> String {
    "24h".to_string()
}
fn default_lose_duration() -> String {
    "12h".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GachaConfig::default();
        assert!(config.enabled);
        assert_eq!(config.base_min, 1.0);
        assert_eq!(config.base_max, 30.0);
        assert_eq!(config.growth_rate, 30.0);
        assert_eq!(config.jackpot.base_prob, 0.006);
        assert_eq!(config.jackpot.soft_pity, 73);
        assert_eq!(config.jackpot.hard_pity, 89);
        assert_eq!(config.jackpot.up_duration, "24h");
        assert_eq!(config.jackpot.lose_duration, "12h");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: GachaConfig = toml::from_str("base_max = 10").unwrap();
        assert_eq!(config.base_max, 10.0);
        assert_eq!(config.base_min, 1.0);
        assert_eq!(config.jackpot.hard_pity, 89);
    }

    #[test]
    fn test_camel_case_aliases_are_accepted() {
        let json = r#"{
            "baseMin": 2,
            "baseMax": 15,
            "growthRate": 10,
            "jackpot": {"baseProb": 0.01, "softPity": 50, "hardPity": 60,
                        "upDuration": "1h", "loseDuration": "30m"}
        }"#;
        let config: GachaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.base_min, 2.0);
        assert_eq!(config.jackpot.soft_pity, 50);
        assert_eq!(config.jackpot.up_duration, "1h");
    }
}
