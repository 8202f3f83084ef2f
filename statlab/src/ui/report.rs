// statlab/src/ui/report.rs
//! Tabular rendering of analysis numbers for the `compute` command.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use statlab_core::StatSummary;

fn number(value: f64) -> String {
    if value.is_nan() {
        "undefined".to_string()
    } else {
        format!("{:.4}", value)
    }
}

/// A two-column `Statistic | Value` table for `stats`.
pub fn stats_table(stats: &StatSummary) -> Table {
    let rows: Vec<(&str, String)> = match stats {
        StatSummary::Test { statistic, p_value, df } => {
            let mut rows = vec![("statistic", number(*statistic)), ("p-value", number(*p_value))];
            if let Some(df) = df {
                rows.push(("degrees of freedom", number(*df)));
            }
            rows
        }
        StatSummary::Anova { statistic, p_value, significant } => vec![
            ("F-statistic", number(*statistic)),
            ("p-value", number(*p_value)),
            ("significant", significant.to_string()),
        ],
        StatSummary::Regression { slope, intercept, r_squared, equation } => vec![
            ("equation", equation.clone()),
            ("slope", number(*slope)),
            ("intercept", number(*intercept)),
            ("R²", number(*r_squared)),
        ],
        StatSummary::Histogram { observations, bins } => vec![
            ("observations", observations.to_string()),
            ("bins", bins.to_string()),
        ],
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Statistic", "Value"]);
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    table
}
