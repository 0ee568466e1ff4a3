mod cli;
mod error;
mod logging;
mod progress;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ibexsnap_core::{
    ibex35, QuoteFetcher, ReqwestHttpClient, SnapshotBuilder, TokioSleeper, YahooAdapter,
    OUTPUT_PATH,
};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::error::CliError;
use crate::progress::ConsoleProgress;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _cli = Cli::parse();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("\n\n❌ Critical error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    logging::init()?;

    let registry = ibex35()?;
    let adapter = YahooAdapter::new(Arc::new(ReqwestHttpClient::new()?));
    let fetcher = QuoteFetcher::new(
        Arc::new(adapter),
        Arc::new(TokioSleeper),
        Arc::new(ConsoleProgress),
    );
    let builder = SnapshotBuilder::new(fetcher)?;

    tokio::select! {
        result = builder.refresh(OUTPUT_PATH, &registry) => {
            let snapshot = result?;
            info!(path = OUTPUT_PATH, included = snapshot.companies.len(), "refresh complete");

            println!("\n✅ Data refreshed successfully!");
            println!("📁 File written: {OUTPUT_PATH}");
            println!(
                "📊 Companies processed: {}/{}",
                snapshot.companies.len(),
                registry.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        () = interrupted() => {
            println!("\n\n⚠️  Refresh interrupted by user");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
