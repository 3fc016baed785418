//! Cave explorer bot entry point.
use std::io;

use anyhow::{Context, Result};
use cave_bot::{BotConfig, Runner, logging};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = BotConfig::from_env();
    let _guard = logging::init(&config)?;

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    Runner::new(stdin, stdout, config)
        .run()
        .context("writing moves to stdout")?;

    Ok(())
}
