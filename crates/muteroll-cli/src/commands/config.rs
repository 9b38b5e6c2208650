use clap::Subcommand;
use muteroll_core::{parse_duration, Config, GachaConfig};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Show a group's effective table instead of the global one
        #[arg(long)]
        group: Option<String>,
    },
    /// Set a config value
    Set {
        /// Config key (e.g. "base_max", "jackpot.up_duration")
        key: String,
        /// New value
        value: String,
        /// Apply to a group override instead of the global table
        #[arg(long)]
        group: Option<String>,
    },
    /// Drop a group override, falling back to the global table
    Reset {
        #[arg(long)]
        group: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show { group } => {
            let config = Config::load()?;
            let table = match &group {
                Some(group) => config.effective(group),
                None => &config.gacha,
            };
            println!("{}", serde_json::to_string_pretty(table)?);
        }
        ConfigAction::Set { key, value, group } => {
            let mut config = Config::load()?;
            match &group {
                Some(group) => {
                    // Start a new override from the effective table.
                    let mut table = config.effective(group).clone();
                    set_key(&mut table, &key, &value)?;
                    config.set_group(group, table);
                }
                None => set_key(&mut config.gacha, &key, &value)?,
            }
            config.save()?;
            println!("ok");
        }
        ConfigAction::Reset { group } => {
            let mut config = Config::load()?;
            if config.reset_group(&group) {
                config.save()?;
                println!("group {group} reset to the global configuration");
            } else {
                println!("group {group} had no override");
            }
        }
    }
    Ok(())
}

/// Apply one key/value pair, validating duration strings up front so a typo
/// never surfaces as a failed draw later.
fn set_key(config: &mut GachaConfig, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    match key {
        "enabled" => config.enabled = value.parse()?,
        "base_min" => config.base_min = value.parse()?,
        "base_max" => config.base_max = value.parse()?,
        "growth_rate" => config.growth_rate = value.parse()?,
        "jackpot.enabled" => config.jackpot.enabled = value.parse()?,
        "jackpot.base_prob" => config.jackpot.base_prob = value.parse()?,
        "jackpot.soft_pity" => config.jackpot.soft_pity = value.parse()?,
        "jackpot.hard_pity" => config.jackpot.hard_pity = value.parse()?,
        "jackpot.up_duration" => {
            parse_duration(value)?;
            config.jackpot.up_duration = value.to_string();
        }
        "jackpot.lose_duration" => {
            parse_duration(value)?;
            config.jackpot.lose_duration = value.to_string();
        }
        other => return Err(format!("unknown key: {other}").into()),
    }
    Ok(())
}
