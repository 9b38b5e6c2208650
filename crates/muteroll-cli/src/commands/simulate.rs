use muteroll_core::{format_duration, Config, DrawSimulator, SimulationConfig};

pub fn run(
    draws: usize,
    seed: Option<u64>,
    group: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let gacha = match group {
        Some(group) => config.effective(group),
        None => &config.gacha,
    };

    let simulator = DrawSimulator::with_config(SimulationConfig {
        draws,
        seed,
        ..SimulationConfig::default()
    });
    let report = simulator.simulate(gacha)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("draws:               {}", report.draws);
    println!(
        "jackpots:            {} ({:.2}%)",
        report.jackpots,
        report.jackpot_rate() * 100.0
    );
    println!("hard pity hits:      {}", report.hard_pity_hits);
    println!("50/50 misses:        {}", report.fifty_fifty_misses);
    println!("guarantees consumed: {}", report.guarantees_consumed);
    println!("max pity spent:      {}", report.max_pity_spent);
    println!(
        "avg mute:            {}",
        format_duration(report.avg_mute_ms as i64)
    );
    println!(
        "max mute:            {}",
        format_duration(report.max_mute_ms)
    );
    Ok(())
}
