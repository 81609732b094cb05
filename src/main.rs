// src/main.rs
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use machineid_crew::crew::demo::build_demo_crew;
use machineid_crew::crew::OpenAiChat;
use machineid_crew::{Cli, Config, MachineIdClient};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "info",
        1 => "info,machineid_crew=debug",
        _ => "info,machineid_crew=trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = Config::from_cli(cli)?;
    let client = MachineIdClient::new(&config)?;

    let llm_config = config.llm.clone();
    let build = move || -> machineid_crew::Result<_> {
        let llm = OpenAiChat::new(&llm_config)?;
        build_demo_crew(Arc::new(llm))
    };

    let mut stdout = std::io::stdout();
    let outcome = machineid_crew::run(&config, &client, build, &mut stdout).await?;
    Ok(outcome.exit_code())
}
