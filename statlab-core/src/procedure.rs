// statlab-core/src/procedure.rs
//! Defines the `StatProcedure` trait and the result types every procedure shares.
//!
//! A procedure owns everything page-specific: which tables the page has,
//! what the seed data looks like, how rows are appended and how a result is
//! recomputed from the current tables. The interaction layer only ever talks
//! to this trait.
//!
//! License: MIT OR Apache-2.0

use rand::RngCore;
use serde::{Deserialize, Serialize};
use statlab_numeric::hypothesis::VarianceAssumption;

use crate::chart::Figure;
use crate::errors::{Result, StatlabError};
use crate::interaction::PageState;
use crate::table::{add_row, IndexedRow, MissingValuePolicy, Table};

/// Significance level used when none is configured.
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Knobs shared by every recompute function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    pub missing_values: MissingValuePolicy,
    pub significance_level: f64,
    pub variance: VarianceAssumption,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            missing_values: MissingValuePolicy::Drop,
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            variance: VarianceAssumption::Pooled,
        }
    }
}

/// Raw numbers behind a summary line, for JSON clients.
///
/// Non-finite values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatSummary {
    Test {
        statistic: f64,
        p_value: f64,
        df: Option<f64>,
    },
    Anova {
        statistic: f64,
        p_value: f64,
        significant: bool,
    },
    Regression {
        slope: f64,
        intercept: f64,
        r_squared: f64,
        equation: String,
    },
    Histogram {
        observations: usize,
        bins: usize,
    },
}

/// The transient `(chart, text)` pair shown under a page's tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub figure: Figure,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatSummary>,
}

/// One interactive statistics page.
pub trait StatProcedure: Send + Sync {
    /// Table slot names, as used by the page's DOM ids.
    fn slots(&self) -> &'static [&'static str];

    /// Column names of `slot` in display order.
    fn columns(&self, slot: &str) -> Option<Vec<&'static str>>;

    /// Fresh tables for a new page or session. `rows` sizes the random tables.
    fn seed(&self, rows: usize, rng: &mut dyn RngCore) -> PageState;

    /// Whether appended rows may take a random population draw instead of 0.
    fn draws_populations(&self) -> bool {
        false
    }

    /// Appends one row to `slot` when `n_clicks` is positive.
    fn append_row(
        &self,
        state: &mut PageState,
        slot: &str,
        n_clicks: u32,
        fill: &mut dyn FnMut() -> f64,
    ) -> Result<()> {
        let _ = (state, n_clicks, fill);
        Err(StatlabError::invalid(slot, "rows cannot be appended to this table"))
    }

    /// Recomputes the result from the current tables.
    fn recompute(&self, state: &PageState, options: &AnalysisOptions) -> Result<Analysis>;
}

/// Parses `slot`, applies [`add_row`] and stores the result back.
pub(crate) fn append_to<R: IndexedRow>(
    state: &mut PageState,
    slot: &str,
    layout: R::Layout,
    n_clicks: u32,
    fill: &mut dyn FnMut() -> f64,
) -> Result<()> {
    let table = Table::<R>::from_records(state.table(slot), layout)?;
    let table = add_row(table, n_clicks, fill);
    state.insert(slot, table.to_records());
    Ok(())
}
