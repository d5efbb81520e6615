//! Apply pending database migrations and exit.
//!
//! Usage:
//! `migrate --database-url postgres://localhost/mindweaver`
//!
//! The URL falls back to `MINDWEAVER_DATABASE_URL` when the flag is omitted.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use mindweaver::outbound::persistence::run_pending_migrations;

#[derive(Debug, Parser)]
#[command(name = "migrate", about = "Apply pending MindWeaver schema migrations")]
struct Cli {
    /// PostgreSQL connection URL.
    #[arg(long, env = "MINDWEAVER_DATABASE_URL")]
    database_url: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let applied =
        run_pending_migrations(&cli.database_url).context("failed to apply migrations")?;
    if applied.is_empty() {
        println!("schema is up to date");
    }
    for version in applied {
        println!("applied {version}");
    }
    Ok(())
}
