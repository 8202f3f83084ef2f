// statlab-core/src/pages.rs
//! HTML pages, rendered with `tinytemplate` from embedded templates.
//!
//! License: MIT OR Apache-2.0

use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::errors::{Result, StatlabError};
use crate::interaction::{PageKind, TriggerMode};
use crate::session::SessionMode;
use crate::table::MissingValuePolicy;

/// Browser script for the interactive pages.
pub const SCRIPT: &str = include_str!("../static/statlab.js");
/// Shared stylesheet.
pub const STYLESHEET: &str = include_str!("../static/statlab.css");

const TEMPLATES: &[(&str, &str)] = &[
    ("head", include_str!("../templates/head.html")),
    ("foot", include_str!("../templates/foot.html")),
    ("home", include_str!("../templates/home.html")),
    ("about", include_str!("../templates/about.html")),
    ("reference", include_str!("../templates/reference.html")),
    ("interactive", include_str!("../templates/interactive.html")),
    ("not_found", include_str!("../templates/not_found.html")),
];

/// A home-page dropdown entry and the route it leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavOption {
    pub label: &'static str,
    pub route: &'static str,
}

pub const NAV_OPTIONS: &[NavOption] = &[
    NavOption { label: "t-test", route: "/ttest" },
    NavOption { label: "z-test", route: "/z_test_page" },
    NavOption { label: "Distributions", route: "/distributions_page" },
    NavOption { label: "ANOVA", route: "/anova" },
    NavOption { label: "Regressions", route: "/regressions" },
    NavOption { label: "Reference", route: "/reference_page" },
    NavOption { label: "About", route: "/about" },
];

/// Route for a submitted dropdown label; unknown labels go home.
pub fn resolve_submission(label: Option<&str>) -> &'static str {
    label
        .and_then(|label| NAV_OPTIONS.iter().find(|o| o.label == label))
        .map(|o| o.route)
        .unwrap_or("/")
}

#[derive(Serialize)]
struct Concept {
    term: &'static str,
    definition: &'static str,
}

const CONCEPTS: &[Concept] = &[
    Concept {
        term: "Null hypothesis",
        definition: "The default claim a test tries to reject, usually that two or more populations share the same mean.",
    },
    Concept {
        term: "p-value",
        definition: "The probability of seeing a statistic at least this extreme if the null hypothesis were true. Small values count as evidence against it.",
    },
    Concept {
        term: "Significance level",
        definition: "The threshold, commonly 0.05, below which a p-value is called significant.",
    },
    Concept {
        term: "t-test",
        definition: "Compares the means of two independent samples when the population variance is unknown. The statistic follows Student's t distribution.",
    },
    Concept {
        term: "z-test",
        definition: "Compares two means using the normal distribution. It suits large samples, where the estimated variance is close to the true one.",
    },
    Concept {
        term: "ANOVA",
        definition: "One-way analysis of variance compares the means of several groups at once by contrasting the spread between groups with the spread within them. The ratio is the F statistic.",
    },
    Concept {
        term: "Linear regression",
        definition: "Fits the straight line y = mx + b that minimises the squared vertical distances to the points. R² is the share of the variation in y the line explains.",
    },
    Concept {
        term: "Histogram",
        definition: "Groups values into equal-width bins and counts how many fall into each, showing the shape of a distribution.",
    },
];

#[derive(Serialize)]
struct Chrome {
    title: String,
    nav: &'static [NavOption],
    version: &'static str,
}

impl Chrome {
    fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), nav: NAV_OPTIONS, version: env!("CARGO_PKG_VERSION") }
    }
}

#[derive(Serialize)]
struct HomeContext {
    #[serde(flatten)]
    chrome: Chrome,
}

#[derive(Serialize)]
struct AboutContext {
    #[serde(flatten)]
    chrome: Chrome,
    missing_values: &'static str,
    session_note: &'static str,
}

#[derive(Serialize)]
struct ReferenceContext {
    #[serde(flatten)]
    chrome: Chrome,
    concepts: &'static [Concept],
}

#[derive(Serialize)]
struct TableContext {
    slot: &'static str,
    label: String,
    can_add_rows: bool,
}

#[derive(Serialize)]
struct InteractiveContext {
    #[serde(flatten)]
    chrome: Chrome,
    heading: &'static str,
    intro: &'static str,
    slug: &'static str,
    mode: &'static str,
    button: bool,
    tables: Vec<TableContext>,
}

#[derive(Serialize)]
struct NotFoundContext {
    #[serde(flatten)]
    chrome: Chrome,
    path: String,
}

fn render<C: Serialize>(name: &str, context: &C) -> Result<String> {
    let mut tt = TinyTemplate::new();
    for &(template_name, text) in TEMPLATES {
        tt.add_template(template_name, text)
            .map_err(|e| StatlabError::Template(template_name.to_string(), e.to_string()))?;
    }
    tt.render(name, context)
        .map_err(|e| StatlabError::Template(name.to_string(), e.to_string()))
}

pub fn render_home() -> Result<String> {
    render("home", &HomeContext { chrome: Chrome::new("Welcome!") })
}

pub fn render_about(policy: MissingValuePolicy, mode: SessionMode) -> Result<String> {
    let missing_values = match policy {
        MissingValuePolicy::Drop => "left out",
        MissingValuePolicy::Zero => "counted as 0",
    };
    let session_note = match mode {
        SessionMode::Isolated => "private to your browser session.",
        SessionMode::Shared => "shared with everyone using this server, so the last edit wins.",
    };
    render(
        "about",
        &AboutContext { chrome: Chrome::new("About"), missing_values, session_note },
    )
}

pub fn render_reference() -> Result<String> {
    render(
        "reference",
        &ReferenceContext { chrome: Chrome::new("Reference"), concepts: CONCEPTS },
    )
}

fn intro(page: PageKind) -> &'static str {
    match page {
        PageKind::TTest => "Compare two datasets with an independent two-sample t-test. Edit any cell and the t-test result is recalculated.",
        PageKind::ZTest => "Compare two populations with a two-sample z-test. Edit the tables or add rows, then press Calculate.",
        PageKind::Anova => "Compare three populations with a one-way ANOVA. Edit the table or add rows, then press Calculate.",
        PageKind::Regression => "Fit a least-squares line through the points. Edit the table or add rows, then press Calculate.",
        PageKind::Distribution => "See the distribution of a column of values as a histogram. Every value must be a number.",
    }
}

fn table_label(page: PageKind, index: usize) -> String {
    match page {
        PageKind::TTest => format!("Dataset {}", index + 1),
        PageKind::ZTest => format!("Population {}", index + 1),
        PageKind::Anova => "Populations".to_string(),
        PageKind::Regression => "Observations".to_string(),
        PageKind::Distribution => "Values".to_string(),
    }
}

/// An interactive page; its script talks to `/dash_{slug}/`.
pub fn render_page(page: PageKind) -> Result<String> {
    let tables = page
        .slots()
        .iter()
        .copied()
        .enumerate()
        .map(|(i, slot)| TableContext {
            slot,
            label: table_label(page, i),
            can_add_rows: page.can_add_rows(),
        })
        .collect();
    let (mode, button) = match page.mode() {
        TriggerMode::Live => ("live", false),
        TriggerMode::Button => ("button", true),
    };
    render(
        "interactive",
        &InteractiveContext {
            chrome: Chrome::new(page.title()),
            heading: page.title(),
            intro: intro(page),
            slug: page.slug(),
            mode,
            button,
            tables,
        },
    )
}

pub fn render_not_found(path: &str) -> Result<String> {
    render(
        "not_found",
        &NotFoundContext { chrome: Chrome::new("Not found"), path: path.to_string() },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_submission() {
        assert_eq!(resolve_submission(Some("z-test")), "/z_test_page");
        assert_eq!(resolve_submission(Some("Regressions")), "/regressions");
        assert_eq!(resolve_submission(Some("Example")), "/");
        assert_eq!(resolve_submission(None), "/");
    }

    #[test]
    fn test_home_lists_every_option() {
        let html = render_home().unwrap();
        assert!(html.contains("<h1>Welcome!</h1>"));
        for option in NAV_OPTIONS {
            assert!(html.contains(&format!("<option value=\"{}\">", option.label)));
        }
    }

    #[test]
    fn test_interactive_pages_embed_slug() {
        for page in PageKind::ALL {
            let html = render_page(page).unwrap();
            assert!(html.contains(&format!("data-slug=\"{}\"", page.slug())));
            for slot in page.slots() {
                assert!(html.contains(&format!("id=\"{}\"", slot)));
            }
        }
    }

    #[test]
    fn test_button_only_on_button_pages() {
        assert!(render_page(PageKind::ZTest).unwrap().contains("id=\"calculate\""));
        assert!(!render_page(PageKind::TTest).unwrap().contains("id=\"calculate\""));
        assert!(!render_page(PageKind::Distribution).unwrap().contains("Add Row"));
    }

    #[test]
    fn test_script_keeps_tables_on_rejected_update() {
        assert!(SCRIPT.contains("if (!reply.ok)"));
        assert!(SCRIPT.contains("showOutcome(reply.body);"));
    }

    #[test]
    fn test_not_found_escapes_path() {
        let html = render_not_found("/<script>").unwrap();
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_about_reflects_settings() {
        let html = render_about(MissingValuePolicy::Zero, SessionMode::Shared).unwrap();
        assert!(html.contains("counted as 0"));
        assert!(html.contains("last edit wins"));
    }
}
