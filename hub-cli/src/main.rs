mod cli;
mod commands;
mod config;
mod output;

use anyhow::Context;
use clap::Parser;
use std::process;
use tracing::{debug, error, warn};

use stream_hub::StreamHub;
use stream_hub::logging::init_logging;

use crate::cli::Args;
use crate::output::OutputManager;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {:#}", e);
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}

/// Run one command. Operation failures are printed as failure envelopes and
/// yield exit code 1; startup failures are returned as errors.
async fn run(args: Args) -> anyhow::Result<i32> {
    init_logging(args.log_format.into(), args.verbosity())?;

    let config = config::resolve(args.config.as_deref(), args.database.as_deref())?;
    debug!(database = %config.database_url, "Opening stream database");

    let hub = StreamHub::connect(&config)
        .await
        .context("failed to open the stream database")?;
    let output = OutputManager::new(args.output);

    let code = match commands::execute(&hub, args.command).await {
        Ok(result) => {
            print_stdout(&output.render(result)?);
            0
        }
        Err(e) => {
            if e.is_caller_error() {
                debug!(kind = e.kind(), "{}", e);
            } else {
                warn!(kind = e.kind(), "{}", e);
            }
            print_stdout(&output.render_failure(&e));
            1
        }
    };

    hub.pool.close().await;
    Ok(code)
}

fn print_stdout(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}
