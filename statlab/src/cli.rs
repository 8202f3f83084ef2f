// statlab/src/cli.rs
//! This file defines the command-line interface (CLI) for the statlab application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use statlab_core::{ConfigOverrides, MissingValuePolicy, PageKind, SessionMode};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "statlab",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive statistics in the browser",
    long_about = "statlab serves small teaching pages for the t-test, z-test, one-way ANOVA, linear regression and histograms. Each page shows its data in an editable table and recomputes the result as the table changes. The `compute` command runs the same recompute once, without a browser.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG to DEBUG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Explicitly disable debug logging, even if RUST_LOG is set to DEBUG
    #[arg(long = "disable-debug", global = true, help = "Disable debug logging, overriding RUST_LOG.")]
    pub disable_debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `statlab` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Starts the web server.
    #[command(about = "Start the web server.")]
    Serve(ServeCommand),

    /// Recomputes one page from a JSON payload and prints the result.
    #[command(about = "Recompute one page from a JSON payload and print the result.")]
    Compute(ComputeCommand),
}

/// Settings shared by every command that loads configuration.
#[derive(Parser, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Path to a configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Fix the random seed tables.
    #[arg(long = "seed", value_name = "N", help = "Seed for the random tables, for reproducible data.")]
    pub seed: Option<u64>,

    /// Rows in each random seed table.
    #[arg(long = "rows", value_name = "N", help = "Number of rows in each random seed table.")]
    pub rows: Option<usize>,

    /// How non-numeric cells are treated.
    #[arg(long = "missing-values", value_name = "POLICY", help = "Drop non-numeric cells or count them as zero.")]
    pub missing_values: Option<MissingValuesChoice>,

    /// Significance level for the ANOVA interpretation.
    #[arg(long = "alpha", value_name = "LEVEL", help = "Significance level used when interpreting p-values.")]
    pub alpha: Option<f64>,
}

impl ConfigArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::default();
        overrides.seed.random_seed = self.seed;
        overrides.seed.rows = self.rows;
        overrides.analysis.missing_values = self.missing_values.map(Into::into);
        overrides.analysis.significance_level = self.alpha;
        overrides
    }
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Address to bind.
    #[arg(long, value_name = "HOST", help = "Interface to listen on (default 127.0.0.1).")]
    pub host: Option<String>,

    /// Port to bind.
    #[arg(long, short = 'p', value_name = "PORT", help = "Port to listen on (default 3000).")]
    pub port: Option<u16>,

    /// Whether sessions share one dataset.
    #[arg(long = "session-mode", value_name = "MODE", help = "Give each browser its own tables (isolated) or share one set (shared).")]
    pub session_mode: Option<SessionModeChoice>,

    /// Appended population rows draw a random value.
    #[arg(long = "random-new-rows", help = "Fill appended population rows with random values in [80, 100] instead of 0.")]
    pub random_new_rows: bool,

    #[command(flatten)]
    pub settings: ConfigArgs,
}

impl ServeCommand {
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = self.settings.overrides();
        overrides.server.host = self.host.clone();
        overrides.server.port = self.port;
        overrides.session.mode = self.session_mode.map(Into::into);
        if self.random_new_rows {
            overrides.seed.random_new_rows = Some(true);
        }
        overrides
    }
}

/// Arguments for the `compute` command.
#[derive(Parser, Debug)]
pub struct ComputeCommand {
    /// Which page to recompute.
    #[arg(long, value_name = "PAGE", help = "The page to recompute.")]
    pub page: PageChoice,

    /// Path to a JSON payload (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read the JSON payload from a file instead of stdin.")]
    pub input: Option<PathBuf>,

    /// Print the whole update as JSON.
    #[arg(long, help = "Print the tables and outcome as JSON.")]
    pub json: bool,

    #[command(flatten)]
    pub settings: ConfigArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PageChoice {
    /// Two-sample t-test.
    Ttest,
    /// Two-sample z-test.
    Ztest,
    /// One-way ANOVA over three populations.
    Anova,
    /// Simple linear regression.
    Regression,
    /// Histogram of a single column.
    Distribution,
}

impl From<PageChoice> for PageKind {
    fn from(choice: PageChoice) -> Self {
        match choice {
            PageChoice::Ttest => PageKind::TTest,
            PageChoice::Ztest => PageKind::ZTest,
            PageChoice::Anova => PageKind::Anova,
            PageChoice::Regression => PageKind::Regression,
            PageChoice::Distribution => PageKind::Distribution,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SessionModeChoice {
    /// One dataset per browser session.
    Isolated,
    /// One dataset for everyone; the last write wins.
    Shared,
}

impl From<SessionModeChoice> for SessionMode {
    fn from(choice: SessionModeChoice) -> Self {
        match choice {
            SessionModeChoice::Isolated => SessionMode::Isolated,
            SessionModeChoice::Shared => SessionMode::Shared,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum MissingValuesChoice {
    /// Leave non-numeric cells out.
    Drop,
    /// Count non-numeric cells as 0.
    Zero,
}

impl From<MissingValuesChoice> for MissingValuePolicy {
    fn from(choice: MissingValuesChoice) -> Self {
        match choice {
            MissingValuesChoice::Drop => MissingValuePolicy::Drop,
            MissingValuesChoice::Zero => MissingValuePolicy::Zero,
        }
    }
}
