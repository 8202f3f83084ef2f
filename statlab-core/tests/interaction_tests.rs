// statlab-core/tests/interaction_tests.rs
//! End-to-end event handling across every page, through the public API.

use serde_json::{json, Value};

use statlab_core::seed::rng_from_seed;
use statlab_core::{
    handle_event, AnalysisOptions, EventContext, Outcome, PageKind, PageState, Trigger,
    UpdateRequest,
};

fn seeded(page: PageKind) -> PageState {
    page.procedure().seed(30, &mut rng_from_seed(Some(21)))
}

fn fire(page: PageKind, trigger: Trigger, tables: PageState) -> Outcome {
    let options = AnalysisOptions::default();
    let mut rng = rng_from_seed(Some(1));
    let mut ctx = EventContext { options: &options, random_new_rows: false, rng: &mut rng };
    handle_event(page, &trigger, tables, &mut ctx).outcome
}

fn tables(value: Value) -> PageState {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_every_page_mounts_without_computing() {
    for page in PageKind::ALL {
        let outcome = fire(page, Trigger::Calculate { n_clicks: 0 }, seeded(page));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"status": "placeholder", "message": "No update requested"})
        );
    }
}

#[test]
fn test_every_page_computes_on_seed_data() {
    for page in PageKind::ALL {
        let outcome = fire(page, Trigger::Calculate { n_clicks: 1 }, seeded(page));
        assert!(outcome.analysis().is_some(), "page {} did not compute", page);
    }
}

#[test_log::test]
fn test_ztest_degenerate_populations() {
    let state = tables(json!({
        "data-table1": (1..=5).map(|i| json!({"X Values": i, "Population 1": 90})).collect::<Vec<_>>(),
        "data-table2": (1..=5).map(|i| json!({"X Values": i, "Population 2": 85})).collect::<Vec<_>>(),
    }));
    let outcome = fire(PageKind::ZTest, Trigger::Calculate { n_clicks: 1 }, state);
    let value = serde_json::to_value(&outcome).unwrap();
    assert!(value["summary"].as_str().unwrap().contains("Undefined"));
    assert!(value["stats"]["statistic"].is_null());
}

#[test]
fn test_distribution_rejects_text_inline() {
    let state = tables(json!({"data-table": [{"Values": "a"}, {"Values": "b"}, {"Values": "c"}]}));
    let value = serde_json::to_value(fire(PageKind::Distribution, Trigger::Edit, state)).unwrap();
    assert_eq!(value["status"], json!("failed"));
    assert_eq!(value["kind"], json!("invalid_value"));
}

#[test]
fn test_distribution_empty_is_valid() {
    let state = tables(json!({"data-table": []}));
    let outcome = fire(PageKind::Distribution, Trigger::Edit, state);
    assert!(outcome.analysis().is_some());
}

#[test]
fn test_anova_significance_wording() {
    let rows = |a: [f64; 3], b: [f64; 3], c: [f64; 3]| {
        (0..3)
            .map(|i| {
                json!({
                    "X Values": i + 1,
                    "Population 1": a[i],
                    "Population 2": b[i],
                    "Population 3": c[i],
                })
            })
            .collect::<Vec<_>>()
    };

    let separated = tables(json!({"data-table": rows([1.0, 2.0, 3.0], [10.0, 11.0, 12.0], [20.0, 21.0, 22.0])}));
    let outcome = fire(PageKind::Anova, Trigger::Calculate { n_clicks: 1 }, separated);
    assert!(outcome.analysis().unwrap().summary.contains("there is a significant difference"));

    let overlapping = tables(json!({"data-table": rows([1.0, 2.0, 3.0], [2.0, 1.0, 3.0], [3.0, 2.0, 1.0])}));
    let outcome = fire(PageKind::Anova, Trigger::Calculate { n_clicks: 1 }, overlapping);
    assert!(outcome.analysis().unwrap().summary.contains("no significant difference"));
}

#[test]
fn test_add_row_index_and_count() {
    for page in [PageKind::TTest, PageKind::ZTest, PageKind::Anova, PageKind::Regression] {
        let state = seeded(page);
        let slot = page.slots()[0];
        let before = state.row_count(slot);

        let options = AnalysisOptions::default();
        let mut rng = rng_from_seed(None);
        let mut ctx = EventContext { options: &options, random_new_rows: false, rng: &mut rng };
        let update = handle_event(
            page,
            &Trigger::AddRow { table: slot.to_string(), n_clicks: 4 },
            state,
            &mut ctx,
        );

        let rows = update.tables.table(slot);
        assert_eq!(rows.len(), before + 1, "page {}", page);
        assert_eq!(rows[before]["X Values"], json!((before + 1) as f64));
    }
}

#[test]
fn test_request_round_trip_through_json() {
    let request: UpdateRequest = serde_json::from_value(json!({
        "trigger": {"kind": "edit"},
        "tables": {"data-table": [{"Values": 1}, {"Values": 2}, {"Values": 2}]}
    }))
    .unwrap();
    let options = AnalysisOptions::default();
    let mut rng = rng_from_seed(Some(0));
    let mut ctx = EventContext { options: &options, random_new_rows: false, rng: &mut rng };
    let update = handle_event(PageKind::Distribution, &request.trigger, request.tables, &mut ctx);

    let value = serde_json::to_value(&update).unwrap();
    assert_eq!(value["outcome"]["status"], json!("analysis"));
    assert_eq!(value["outcome"]["stats"]["kind"], json!("histogram"));
    assert_eq!(value["outcome"]["stats"]["observations"], json!(3));
    assert_eq!(value["tables"]["data-table"].as_array().unwrap().len(), 3);
}
