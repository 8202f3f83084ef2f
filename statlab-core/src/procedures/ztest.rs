// statlab-core/src/procedures/ztest.rs
//! Two-sample z-test on the "Population 1" and "Population 2" tables.

use log::warn;
use rand::RngCore;
use statlab_numeric::descriptive::distinct_count;
use statlab_numeric::hypothesis::z_test_ind;

use crate::chart::{Figure, Trace};
use crate::errors::{Result, StatlabError};
use crate::interaction::PageState;
use crate::procedure::{append_to, Analysis, AnalysisOptions, StatProcedure, StatSummary};
use crate::seed;
use crate::table::{SampleRow, Table, TableRow, POPULATION_LAYOUTS};

pub const SLOTS: &[&str] = &["data-table1", "data-table2"];

pub const UNDEFINED: &str = "Z-Statistic: Undefined (insufficient variance in data)";

fn undefined(figure: Figure) -> Analysis {
    Analysis {
        figure,
        summary: UNDEFINED.to_string(),
        stats: Some(StatSummary::Test { statistic: f64::NAN, p_value: f64::NAN, df: None }),
    }
}

/// Box plot of both populations plus the z statistic and two-sided p-value.
///
/// A population with at most one distinct value makes the statistic
/// undefined; the result then carries `NaN` and a descriptive line.
pub fn ztest_analysis(
    first: &Table<SampleRow>,
    second: &Table<SampleRow>,
    options: &AnalysisOptions,
) -> Analysis {
    let a = first.values(options.missing_values);
    let b = second.values(options.missing_values);

    let figure = Figure::new("Box Plot of Sample Populations")
        .axes("Population", "Values")
        .trace(Trace::boxplot(first.layout().value_column, a.clone()))
        .trace(Trace::boxplot(second.layout().value_column, b.clone()));

    if distinct_count(&a) <= 1 || distinct_count(&b) <= 1 {
        warn!("z-test undefined: a population has no variance");
        return undefined(figure);
    }

    match z_test_ind(&a, &b) {
        Ok(result) => Analysis {
            figure,
            summary: format!(
                "Z-Statistic: {:.2}, P-value: {:.4}",
                result.statistic, result.p_value
            ),
            stats: Some(StatSummary::Test {
                statistic: result.statistic,
                p_value: result.p_value,
                df: None,
            }),
        },
        Err(e) => {
            warn!("z-test not computed: {}", e);
            undefined(figure)
        }
    }
}

/// The z-test page: recomputes on the Calculate button.
pub struct ZTest;

impl ZTest {
    fn layout(slot: &str) -> Result<crate::table::SampleLayout> {
        SLOTS
            .iter()
            .position(|s| *s == slot)
            .map(|i| POPULATION_LAYOUTS[i])
            .ok_or_else(|| StatlabError::UnknownTable(slot.to_string()))
    }
}

impl StatProcedure for ZTest {
    fn slots(&self) -> &'static [&'static str] {
        SLOTS
    }

    fn columns(&self, slot: &str) -> Option<Vec<&'static str>> {
        Self::layout(slot).ok().map(SampleRow::columns)
    }

    fn seed(&self, rows: usize, rng: &mut dyn RngCore) -> PageState {
        let [first, second] = seed::ztest_tables(rows, rng);
        let mut state = PageState::default();
        state.insert(SLOTS[0], first.to_records());
        state.insert(SLOTS[1], second.to_records());
        state
    }

    fn draws_populations(&self) -> bool {
        true
    }

    fn append_row(
        &self,
        state: &mut PageState,
        slot: &str,
        n_clicks: u32,
        fill: &mut dyn FnMut() -> f64,
    ) -> Result<()> {
        append_to::<SampleRow>(state, slot, Self::layout(slot)?, n_clicks, fill)
    }

    fn recompute(&self, state: &PageState, options: &AnalysisOptions) -> Result<Analysis> {
        let first = Table::from_records(state.table(SLOTS[0]), POPULATION_LAYOUTS[0])?;
        let second = Table::from_records(state.table(SLOTS[1]), POPULATION_LAYOUTS[1])?;
        Ok(ztest_analysis(&first, &second, options))
    }
}
