use muteroll_core::{format_duration, parse_counted, parse_duration};

pub fn run(input: &str, count: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let ms = match count {
        Some(count) => parse_counted(input, count)?,
        None => parse_duration(input)?,
    };
    println!("{ms} ms ({})", format_duration(ms));
    Ok(())
}
