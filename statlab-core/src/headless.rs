// statlab-core/src/headless.rs
//! One-shot recompute outside the web server.
//!
//! Tables missing from the payload fall back to the page's seed tables, so
//! `{}` recomputes the page as it first appears in the browser.

use anyhow::{Context, Result};
use log::debug;

use crate::config::AppConfig;
use crate::interaction::{handle_event, EventContext, PageKind, Update, UpdateRequest};
use crate::seed::rng_from_seed;

/// Parses a JSON `{trigger?, tables?}` payload. Empty input means `{}`.
pub fn parse_request(payload: &str) -> Result<UpdateRequest> {
    if payload.trim().is_empty() {
        return Ok(UpdateRequest::default());
    }
    serde_json::from_str(payload).context("Failed to parse the request payload as JSON")
}

/// Runs one event for `page` against its seed tables overlaid with the
/// payload's tables.
pub fn headless_compute(page: PageKind, request: UpdateRequest, config: &AppConfig) -> Update {
    let mut rng = rng_from_seed(config.seed.random_seed);
    let mut tables = page.procedure().seed(config.seed.rows, &mut rng);
    tables.merge(request.tables, page.slots());
    debug!("Headless compute on page '{}' with {:?}", page, request.trigger);

    let options = config.analysis_options();
    let mut ctx = EventContext {
        options: &options,
        random_new_rows: config.seed.random_new_rows,
        rng: &mut rng,
    };
    handle_event(page, &request.trigger, tables, &mut ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{Outcome, Trigger};

    #[test]
    fn test_empty_payload_uses_seed_tables() {
        let request = parse_request("  ").unwrap();
        let update = headless_compute(PageKind::TTest, request, &AppConfig::default());
        let analysis = update.outcome.analysis().unwrap();
        assert_eq!(analysis.summary, "T-Statistic: -0.09, P-Value: 0.9338");
    }

    #[test]
    fn test_payload_tables_replace_seed() {
        let request = parse_request(
            r#"{"tables": {"data-table": [
                {"X Values": 1, "Y Values": 3},
                {"X Values": 2, "Y Values": 5},
                {"X Values": 3, "Y Values": 7},
                {"X Values": 4, "Y Values": 9}
            ]}}"#,
        )
        .unwrap();
        let update = headless_compute(PageKind::Regression, request, &AppConfig::default());
        assert_eq!(update.tables.row_count("data-table"), 4);
        assert!(update.outcome.analysis().unwrap().summary.starts_with("y = 2.00x + 1.00"));
    }

    #[test]
    fn test_zero_clicks_placeholder() {
        let request = UpdateRequest {
            trigger: Trigger::Calculate { n_clicks: 0 },
            ..Default::default()
        };
        let update = headless_compute(PageKind::ZTest, request, &AppConfig::default());
        assert!(matches!(update.outcome, Outcome::Placeholder { .. }));
    }

    #[test]
    fn test_malformed_payload() {
        assert!(parse_request("{not json").is_err());
    }
}
