// statlab-core/src/procedures/distribution.rs
//! Frequency histogram of the single "Values" column.

use rand::RngCore;
use statlab_numeric::histogram::{auto_bins, bin};

use crate::chart::{Figure, Trace};
use crate::errors::Result;
use crate::interaction::PageState;
use crate::procedure::{Analysis, AnalysisOptions, StatProcedure, StatSummary};
use crate::seed;
use crate::table::{Record, Table, TableRow, ValueRow, VALUES_COLUMN};

pub const SLOTS: &[&str] = &["data-table"];

/// Buckets the column into a histogram.
///
/// Validation is strict: any non-numeric cell fails with an invalid-value
/// error instead of being dropped. An empty table is a valid, empty histogram.
pub fn distribution_analysis(records: &[Record]) -> Result<Analysis> {
    let table = Table::<ValueRow>::from_records(records, ())?;
    let values = table
        .rows()
        .iter()
        .map(|row| row.value.strict(VALUES_COLUMN))
        .collect::<Result<Vec<f64>>>()?;

    let bins = bin(&values, auto_bins(values.len()));
    let figure = Figure::new("Histogram of Data")
        .axes(VALUES_COLUMN, "Frequency")
        .bargap(0.05)
        .without_legend()
        .trace(Trace::histogram(VALUES_COLUMN, &bins));

    let summary = if values.is_empty() {
        "Histogram of 0 values".to_string()
    } else {
        format!("Histogram of {} values in {} bins", values.len(), bins.len())
    };

    Ok(Analysis {
        figure,
        summary,
        stats: Some(StatSummary::Histogram { observations: values.len(), bins: bins.len() }),
    })
}

/// The distributions page: live recompute on every edit, no row appends.
pub struct Distribution;

impl StatProcedure for Distribution {
    fn slots(&self) -> &'static [&'static str] {
        SLOTS
    }

    fn columns(&self, slot: &str) -> Option<Vec<&'static str>> {
        SLOTS.contains(&slot).then(|| ValueRow::columns(()))
    }

    fn seed(&self, _rows: usize, _rng: &mut dyn RngCore) -> PageState {
        let mut state = PageState::default();
        state.insert(SLOTS[0], seed::distribution_table().to_records());
        state
    }

    fn recompute(&self, state: &PageState, _options: &AnalysisOptions) -> Result<Analysis> {
        distribution_analysis(state.table(SLOTS[0]))
    }
}
