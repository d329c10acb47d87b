//! Inkling CLI — ask questions grounded in your Notion workspace.
//!
//! One-shot `ask`, an interactive `chat` loop, and corpus/config
//! management commands.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
