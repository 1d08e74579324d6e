//! Harvest - a single-shot query-result export worker.

use db_harvest::cli::Cli;
use db_harvest::error::HarvestError;
use db_harvest::{app, logging};
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init();

    let code = run().await;
    if code != 0 {
        std::process::exit(code);
    }
}

/// Performs one run and maps the outcome to the process exit code.
async fn run() -> i32 {
    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => return fail(e),
    };

    let params = match cli.to_run_parameters() {
        Ok(params) => params,
        Err(e) => return fail(e),
    };

    match app::run(&params).await {
        Ok(()) => 0,
        Err(e) => fail(e),
    }
}

fn fail(e: HarvestError) -> i32 {
    error!("{}: {}", e.category(), e);
    e.exit_code()
}
