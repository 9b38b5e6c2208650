use muteroll_core::evaluate;

pub fn run(expr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let value = evaluate(expr)?;
    println!("{value}");
    Ok(())
}
