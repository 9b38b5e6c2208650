use chrono::Utc;
use clap::Subcommand;
use muteroll_core::{current_probability, Config, DrawService, JsonRecordStore};

#[derive(Subcommand)]
pub enum RecordAction {
    /// Show a group's draw record
    Show {
        #[arg(long)]
        group: String,
    },
    /// Reset a group's draw record
    Reset {
        #[arg(long)]
        group: String,
    },
}

pub fn run(action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = DrawService::new(JsonRecordStore::open()?);
    match action {
        RecordAction::Show { group } => match service.record(&group)? {
            Some(record) => {
                let config = Config::load()?;
                let jackpot = &config.effective(&group).jackpot;
                println!("{}", serde_json::to_string_pretty(&record)?);
                println!(
                    "next pull jackpot probability: {:.4}",
                    current_probability(record.pity + 1, jackpot)
                );
            }
            None => println!("group {group} has never drawn"),
        },
        RecordAction::Reset { group } => {
            service.reset(&group, Utc::now().timestamp_millis())?;
            println!("record for group {group} reset");
        }
    }
    Ok(())
}
