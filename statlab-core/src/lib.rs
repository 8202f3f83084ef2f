// statlab-core/src/lib.rs
//! # statlab Core Library
//!
//! `statlab-core` holds everything behind the statlab pages that does not
//! touch a socket: typed data tables, seed datasets, the recompute functions
//! for each statistical procedure, the interaction layer that maps page
//! events to table mutation and recompute, the session store, configuration
//! and HTML rendering.
//!
//! ## Modules
//!
//! * `table`: `CellValue`, explicit row records per table kind, `Table<R>` and `add_row`.
//! * `seed`: The datasets each page starts with.
//! * `chart`: A Plotly-compatible figure model.
//! * `procedure`: The `StatProcedure` trait plus `Analysis` and `AnalysisOptions`.
//! * `procedures`: t-test, z-test, ANOVA, regression and distribution pages.
//! * `interaction`: `PageKind`, `Trigger`, `handle_event`.
//! * `session`: Per-session or shared table storage.
//! * `config`: Layered YAML configuration.
//! * `pages`: Static and interactive HTML pages.
//! * `headless`: One-shot recompute for the command line.
//! * `errors`: The `StatlabError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use statlab_core::{headless_compute, AppConfig, PageKind, UpdateRequest};
//!
//! let update = headless_compute(PageKind::TTest, UpdateRequest::default(), &AppConfig::default());
//! let analysis = update.outcome.analysis().unwrap();
//! assert_eq!(analysis.summary, "T-Statistic: -0.09, P-Value: 0.9338");
//! ```
//!
//! ## Error Handling
//!
//! Missing columns and invalid values are typed `StatlabError`s and reach the
//! page as an inline `Outcome::Failed`. Statistically degenerate input
//! (too few values, zero variance) is not an error: it yields a descriptive
//! summary line. Configuration loading uses `anyhow` with context.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod chart;
pub mod config;
pub mod errors;
pub mod headless;
pub mod interaction;
pub mod pages;
pub mod procedure;
pub mod procedures;
pub mod seed;
pub mod session;
pub mod table;

/// Re-exports the configuration types and the merge helper.
pub use config::{
    config_candidate_paths, merge_config, AnalysisOverrides, AppConfig, ConfigOverrides,
    SeedOverrides, ServerOverrides, SessionOverrides,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::{ErrorKind, StatlabError};

pub use chart::{Figure, Trace};

pub use procedure::{Analysis, AnalysisOptions, StatProcedure, StatSummary};

pub use interaction::{
    handle_event, EventContext, Outcome, PageKind, PageState, Trigger, TriggerMode, Update,
    UpdateRequest,
};

pub use session::{new_session_id, SessionMode, SessionStore, SESSION_COOKIE};

pub use table::{add_row, CellValue, MissingValuePolicy, Record, Table, TableRow};

/// Re-exports types and functions for one-shot, non-interactive use.
pub use headless::{headless_compute, parse_request};

pub use pages::{resolve_submission, NavOption, NAV_OPTIONS};
