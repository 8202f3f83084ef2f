// statlab-core/src/procedures/regression.rs
//! Simple linear regression of "Y Values" on "X Values".

use log::warn;
use rand::RngCore;
use statlab_numeric::descriptive::{distinct_count, min_max};
use statlab_numeric::regression::fit_line;

use crate::chart::{Figure, ScatterMode, Trace};
use crate::errors::{Result, StatlabError};
use crate::interaction::PageState;
use crate::procedure::{append_to, Analysis, AnalysisOptions, StatProcedure, StatSummary};
use crate::seed;
use crate::table::{PointRow, Record, Table, TableRow, INDEX_COLUMN, Y_COLUMN};

pub const SLOTS: &[&str] = &["data-table"];

pub const UNDEFINED: &str = "Regression: Undefined (need at least two distinct X values)";

/// Fits `y = slope·x + intercept` by least squares.
///
/// Both columns must exist on every row. Rows whose X or Y does not coerce
/// to a number are dropped before fitting. With fewer than two distinct X
/// values the points are still plotted but no line is fitted.
pub fn regression_analysis(records: &[Record]) -> Result<Analysis> {
    let table = Table::<PointRow>::from_records(records, ())?;

    let (x, y): (Vec<f64>, Vec<f64>) = table
        .rows()
        .iter()
        .filter_map(|row| Some((row.x.coerce()?, row.y.coerce()?)))
        .unzip();

    if x.is_empty() {
        return Err(StatlabError::invalid(
            INDEX_COLUMN,
            "no valid numeric values after cleaning",
        ));
    }

    let points = Trace::scatter(
        "Data Points",
        ScatterMode::Markers,
        x.iter().copied().map(Some).collect(),
        y.iter().copied().map(Some).collect(),
    );
    let mut figure = Figure::new("Linear Regression Plot")
        .axes(INDEX_COLUMN, Y_COLUMN)
        .trace(points);

    if distinct_count(&x) < 2 {
        warn!("Regression not fitted: fewer than two distinct X values");
        return Ok(Analysis { figure, summary: UNDEFINED.to_string(), stats: None });
    }

    let fit = fit_line(&x, &y)?;
    let equation = format!("y = {:.2}x + {:.2}", fit.slope, fit.intercept);

    if let Some((lo, hi)) = min_max(&x) {
        figure = figure.trace(Trace::scatter(
            "Regression Line",
            ScatterMode::Lines,
            vec![Some(lo), Some(hi)],
            vec![Some(fit.predict(lo)), Some(fit.predict(hi))],
        ));
    }

    Ok(Analysis {
        figure,
        summary: format!("{}\nR²: {:.4}", equation, fit.r_squared),
        stats: Some(StatSummary::Regression {
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            equation,
        }),
    })
}

/// The regression page: recomputes on the Calculate button.
pub struct Regression;

impl StatProcedure for Regression {
    fn slots(&self) -> &'static [&'static str] {
        SLOTS
    }

    fn columns(&self, slot: &str) -> Option<Vec<&'static str>> {
        SLOTS.contains(&slot).then(|| PointRow::columns(()))
    }

    fn seed(&self, _rows: usize, _rng: &mut dyn RngCore) -> PageState {
        let mut state = PageState::default();
        state.insert(SLOTS[0], seed::regression_table().to_records());
        state
    }

    fn append_row(
        &self,
        state: &mut PageState,
        slot: &str,
        n_clicks: u32,
        fill: &mut dyn FnMut() -> f64,
    ) -> Result<()> {
        if !SLOTS.contains(&slot) {
            return Err(StatlabError::UnknownTable(slot.to_string()));
        }
        append_to::<PointRow>(state, slot, (), n_clicks, fill)
    }

    fn recompute(&self, state: &PageState, _options: &AnalysisOptions) -> Result<Analysis> {
        regression_analysis(state.table(SLOTS[0]))
    }
}
