// statlab-core/src/procedures/ttest.rs
//! Two-sample t-test over two independently editable tables.

use log::warn;
use rand::RngCore;
use statlab_numeric::hypothesis::t_test_ind;
use statlab_numeric::NumericError;

use crate::chart::{Figure, ScatterMode, Trace};
use crate::errors::Result;
use crate::interaction::PageState;
use crate::procedure::{append_to, Analysis, AnalysisOptions, StatProcedure, StatSummary};
use crate::seed;
use crate::table::{SampleRow, Table, TableRow, INDEX_COLUMN, Y_COLUMN, Y_LAYOUT};

pub const SLOTS: &[&str] = &["data-table1", "data-table2"];

pub const INSUFFICIENT_DATA: &str =
    "T-Statistic: insufficient data (need at least 2 values per dataset)";
pub const UNDEFINED: &str = "T-Statistic: Undefined (insufficient variance in data)";

fn line(name: &str, table: &Table<SampleRow>) -> Trace {
    let x = table.rows().iter().map(|r| r.x.coerce()).collect();
    let y = table.rows().iter().map(|r| r.value.coerce()).collect();
    Trace::scatter(name, ScatterMode::LinesMarkers, x, y)
}

/// Line chart of both datasets plus the t statistic and p-value.
///
/// Fewer than two usable values on either side, or a zero pooled variance,
/// produce a descriptive line instead of numbers.
pub fn ttest_analysis(
    first: &Table<SampleRow>,
    second: &Table<SampleRow>,
    options: &AnalysisOptions,
) -> Analysis {
    let figure = Figure::new("Comparison of Two Datasets")
        .axes(INDEX_COLUMN, Y_COLUMN)
        .trace(line("Dataset 1", first))
        .trace(line("Dataset 2", second));

    let a = first.values(options.missing_values);
    let b = second.values(options.missing_values);
    if a.len() < 2 || b.len() < 2 {
        return Analysis { figure, summary: INSUFFICIENT_DATA.to_string(), stats: None };
    }

    match t_test_ind(&a, &b, options.variance) {
        Ok(result) => Analysis {
            figure,
            summary: format!(
                "T-Statistic: {:.2}, P-Value: {:.4}",
                result.statistic, result.p_value
            ),
            stats: Some(StatSummary::Test {
                statistic: result.statistic,
                p_value: result.p_value,
                df: result.df,
            }),
        },
        Err(NumericError::ZeroVariance) => {
            warn!("t-test undefined: both datasets have zero variance");
            Analysis {
                figure,
                summary: UNDEFINED.to_string(),
                stats: Some(StatSummary::Test { statistic: f64::NAN, p_value: f64::NAN, df: None }),
            }
        }
        Err(e) => {
            warn!("t-test not computed: {}", e);
            Analysis { figure, summary: INSUFFICIENT_DATA.to_string(), stats: None }
        }
    }
}

/// The t-test page: live recompute on every edit.
pub struct TTest;

impl StatProcedure for TTest {
    fn slots(&self) -> &'static [&'static str] {
        SLOTS
    }

    fn columns(&self, slot: &str) -> Option<Vec<&'static str>> {
        SLOTS.contains(&slot).then(|| SampleRow::columns(Y_LAYOUT))
    }

    fn seed(&self, _rows: usize, _rng: &mut dyn RngCore) -> PageState {
        let [first, second] = seed::ttest_tables();
        let mut state = PageState::default();
        state.insert(SLOTS[0], first.to_records());
        state.insert(SLOTS[1], second.to_records());
        state
    }

    fn append_row(
        &self,
        state: &mut PageState,
        slot: &str,
        n_clicks: u32,
        fill: &mut dyn FnMut() -> f64,
    ) -> Result<()> {
        append_to::<SampleRow>(state, slot, Y_LAYOUT, n_clicks, fill)
    }

    fn recompute(&self, state: &PageState, options: &AnalysisOptions) -> Result<Analysis> {
        let first = Table::from_records(state.table(SLOTS[0]), Y_LAYOUT)?;
        let second = Table::from_records(state.table(SLOTS[1]), Y_LAYOUT)?;
        Ok(ttest_analysis(&first, &second, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::MissingValuePolicy;

    fn table(values: &[f64]) -> Table<SampleRow> {
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, v)| SampleRow { x: ((i + 1) as f64).into(), value: (*v).into() })
            .collect();
        Table::with_rows(Y_LAYOUT, rows)
    }

    #[test]
    fn test_fixture_dataset() {
        let [first, second] = seed::ttest_tables();
        let analysis = ttest_analysis(&first, &second, &AnalysisOptions::default());
        assert_eq!(analysis.summary, "T-Statistic: -0.09, P-Value: 0.9338");
        assert_eq!(analysis.figure.data.len(), 2);
    }

    #[test]
    fn test_unequal_lengths_are_allowed() {
        let analysis = ttest_analysis(
            &table(&[10.0, 15.0, 13.0, 17.0, 19.0]),
            &table(&[12.0, 14.0, 11.0]),
            &AnalysisOptions::default(),
        );
        assert_eq!(analysis.summary, "T-Statistic: 1.13, P-Value: 0.3010");
    }

    #[test]
    fn test_insufficient_data() {
        let analysis = ttest_analysis(&table(&[1.0]), &table(&[1.0, 2.0]), &AnalysisOptions::default());
        assert_eq!(analysis.summary, INSUFFICIENT_DATA);
        assert!(analysis.stats.is_none());
    }

    #[test]
    fn test_zero_variance_is_described() {
        let analysis = ttest_analysis(&table(&[3.0, 3.0]), &table(&[5.0, 5.0]), &AnalysisOptions::default());
        assert_eq!(analysis.summary, UNDEFINED);
    }

    #[test]
    fn test_missing_value_policy_changes_sample() {
        let mut first = table(&[10.0, 15.0]);
        first.push(SampleRow { x: 3.0.into(), value: "n/a".to_string().into() });
        let second = table(&[12.0, 14.0, 11.0]);

        let dropped = ttest_analysis(&first, &second, &AnalysisOptions::default());
        let zeroed = ttest_analysis(
            &first,
            &second,
            &AnalysisOptions { missing_values: MissingValuePolicy::Zero, ..Default::default() },
        );
        assert_ne!(dropped.summary, zeroed.summary);
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let [first, second] = seed::ttest_tables();
        let a = ttest_analysis(&first, &second, &AnalysisOptions::default());
        let b = ttest_analysis(&first, &second, &AnalysisOptions::default());
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.stats, b.stats);
    }
}
