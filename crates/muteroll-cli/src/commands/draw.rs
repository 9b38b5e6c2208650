use chrono::Utc;
use muteroll_core::{format_duration, Config, DrawService, JsonRecordStore, MuteLog};

pub fn run(group: &str, user: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let gacha = config.effective(group);

    if !gacha.enabled {
        println!("draws are disabled for group {group}");
        return Ok(());
    }

    let service = DrawService::new(JsonRecordStore::open()?);
    let now = Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();

    let (outcome, record) = service.draw(group, gacha, now, &mut rng)?;

    if let Some(user) = user {
        MuteLog::open()?.record(group, user, now, outcome.milliseconds)?;
    }

    if json {
        let payload = serde_json::json!({
            "outcome": outcome,
            "record": record,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("drew a {} mute", format_duration(outcome.milliseconds));
    if outcome.is_jackpot {
        if record.guaranteed {
            println!("jackpot -- off-banner this time, the next one is guaranteed");
        } else {
            println!("jackpot -- featured reward!");
        }
        if outcome.is_guaranteed_hit {
            println!("hard pity kicked in");
        }
    }
    println!(
        "pity: {}  hourly count: {}",
        record.pity, record.count
    );
    Ok(())
}
