// statlab/src/main.rs
//! statlab entry point.
//!
//! Parses the command line, sets up logging and hands off to a command.

use clap::Parser;

use statlab::cli::{Cli, Commands};
use statlab::commands;
use statlab::logger;
use statlab::ui::output;

#[tokio::main]
async fn main() {
    // Loaded before the logger so a RUST_LOG set in .env applies. A missing
    // .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug, cli.disable_debug));

    let result = match cli.command {
        Commands::Serve(cmd) => commands::serve::run_serve(cmd).await,
        Commands::Compute(cmd) => commands::compute::run_compute(cmd),
    };

    if let Err(e) = result {
        output::error_msg(format!("{:#}", e));
        std::process::exit(1);
    }
}
