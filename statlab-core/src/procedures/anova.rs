// statlab-core/src/procedures/anova.rs
//! One-way ANOVA across the three population columns of a single table.

use log::warn;
use rand::RngCore;
use statlab_numeric::hypothesis::f_oneway;

use crate::chart::{Figure, Trace};
use crate::errors::Result;
use crate::interaction::PageState;
use crate::procedure::{append_to, Analysis, AnalysisOptions, StatProcedure, StatSummary};
use crate::seed;
use crate::table::{GroupRow, Table, TableRow, GROUP_LAYOUT, POPULATION_COLUMNS};

pub const SLOTS: &[&str] = &["data-table"];

pub const INSUFFICIENT_DATA: &str =
    "ANOVA Test: insufficient data (every population needs a value and more values than populations)";

/// The explanatory sentence appended to the F-statistic line.
pub fn significance_sentence(p_value: f64, alpha: f64) -> String {
    if p_value < alpha {
        format!(
            "The p-value is less than {}, indicating that there is a significant difference between the groups.",
            alpha
        )
    } else {
        format!(
            "The p-value is greater than {}, indicating that there is no significant difference between the groups.",
            alpha
        )
    }
}

/// Box plot of the three populations plus F, p and its interpretation.
///
/// Zero within-group variance is passed straight through, so F and p may be
/// `inf` or `NaN`.
pub fn anova_analysis(table: &Table<GroupRow>, options: &AnalysisOptions) -> Analysis {
    let groups: Vec<Vec<f64>> = (0..POPULATION_COLUMNS.len())
        .map(|g| table.group_values(g, options.missing_values))
        .collect();

    let mut figure = Figure::new("ANOVA Test").axes("Population", "Values");
    for (name, values) in POPULATION_COLUMNS.iter().zip(&groups) {
        figure = figure.trace(Trace::boxplot(*name, values.clone()));
    }

    let slices: Vec<&[f64]> = groups.iter().map(Vec::as_slice).collect();
    match f_oneway(&slices) {
        Ok(result) => {
            let headline = format!(
                "ANOVA Test: F-statistic = {:.2}, P-value = {:.4}",
                result.statistic, result.p_value
            );
            let significant = result.p_value < options.significance_level;
            figure.layout.title = headline.clone().into();
            Analysis {
                figure,
                summary: format!(
                    "{}\n{}",
                    headline,
                    significance_sentence(result.p_value, options.significance_level)
                ),
                stats: Some(StatSummary::Anova {
                    statistic: result.statistic,
                    p_value: result.p_value,
                    significant,
                }),
            }
        }
        Err(e) => {
            warn!("ANOVA not computed: {}", e);
            Analysis { figure, summary: INSUFFICIENT_DATA.to_string(), stats: None }
        }
    }
}

/// The ANOVA page: recomputes on the Calculate button.
pub struct Anova;

impl StatProcedure for Anova {
    fn slots(&self) -> &'static [&'static str] {
        SLOTS
    }

    fn columns(&self, slot: &str) -> Option<Vec<&'static str>> {
        SLOTS.contains(&slot).then(|| GroupRow::columns(GROUP_LAYOUT))
    }

    fn seed(&self, rows: usize, rng: &mut dyn RngCore) -> PageState {
        let mut state = PageState::default();
        state.insert(SLOTS[0], seed::anova_table(rows, rng).to_records());
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
        append_to::<GroupRow>(state, slot, GROUP_LAYOUT, n_clicks, fill)
    }

    fn recompute(&self, state: &PageState, options: &AnalysisOptions) -> Result<Analysis> {
        let table = Table::from_records(state.table(SLOTS[0]), GROUP_LAYOUT)?;
        Ok(anova_analysis(&table, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(a: &[f64], b: &[f64], c: &[f64]) -> Table<GroupRow> {
        let rows = (0..a.len())
            .map(|i| GroupRow {
                x: ((i + 1) as f64).into(),
                values: [a[i].into(), b[i].into(), c[i].into()],
            })
            .collect();
        Table::with_rows(GROUP_LAYOUT, rows)
    }

    #[test]
    fn test_overlapping_groups_not_significant() {
        let table = groups(
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[1.5, 2.5, 3.5, 4.5, 5.5],
            &[2.0, 3.0, 4.0, 5.0, 6.0],
        );
        let analysis = anova_analysis(&table, &AnalysisOptions::default());
        assert_eq!(
            analysis.summary,
            "ANOVA Test: F-statistic = 0.50, P-value = 0.6186\n\
             The p-value is greater than 0.05, indicating that there is no significant difference between the groups."
        );
    }

    #[test]
    fn test_disjoint_groups_significant() {
        let table = groups(&[1.0, 2.0, 3.0], &[10.0, 11.0, 12.0], &[20.0, 21.0, 22.0]);
        let analysis = anova_analysis(&table, &AnalysisOptions::default());
        assert!(analysis.summary.starts_with("ANOVA Test: F-statistic = 271.00, P-value = 0.0000"));
        assert!(analysis.summary.ends_with("indicating that there is a significant difference between the groups."));
        assert_eq!(analysis.figure.layout.title.text, "ANOVA Test: F-statistic = 271.00, P-value = 0.0000");
        assert!(matches!(analysis.stats, Some(StatSummary::Anova { significant: true, .. })));
    }

    #[test]
    fn test_zero_within_variance_is_not_guarded() {
        let table = groups(&[1.0, 1.0], &[2.0, 2.0], &[3.0, 3.0]);
        let analysis = anova_analysis(&table, &AnalysisOptions::default());
        assert!(analysis.summary.starts_with("ANOVA Test: F-statistic = inf, P-value = 0.0000"));
        assert!(analysis.summary.contains("there is a significant difference"));
    }

    #[test]
    fn test_empty_table_is_insufficient() {
        let analysis = anova_analysis(&Table::new(GROUP_LAYOUT), &AnalysisOptions::default());
        assert_eq!(analysis.summary, INSUFFICIENT_DATA);
    }

    #[test]
    fn test_three_populations_plotted() {
        let table = groups(&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]);
        let analysis = anova_analysis(&table, &AnalysisOptions::default());
        assert_eq!(analysis.figure.data.len(), 3);
    }
}
