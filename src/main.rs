use anyhow::Result;
use clap::Parser;

use tareas::{cli::Cli, runtime::Orchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    Orchestrator::new(cli)?.run().await
}
