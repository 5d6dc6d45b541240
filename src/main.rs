use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use waitgate::coordinator::dial_configs;
use waitgate::progress::{self, ProgressSink, TracingSink};

mod cli;
mod command;
mod telemetry;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // a missing .env is the normal case
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    telemetry::init(cli.debug);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("waitgate: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let app = cli.into_app_config()?;
    let specs = app.connection_specs()?;

    let sink: Arc<dyn ProgressSink> = if app.debug {
        Arc::new(TracingSink)
    } else {
        progress::noop()
    };

    dial_configs(&specs, sink).await?;
    tracing::info!(targets = specs.len(), "All targets are available");

    command::run_post_command(&app.command).await
}
