// statlab-core/src/interaction.rs
//! Binds page events to table mutation and recompute.
//!
//! Every request carries the full client-visible state of a page. The
//! handler turns `(trigger, tables)` into `(tables', outcome)` without any
//! hidden state of its own: whoever calls it decides where tables live.
//!
//! License: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorKind, StatlabError};
use crate::procedure::{Analysis, AnalysisOptions, StatProcedure};
use crate::procedures::{Anova, Distribution, Regression, TTest, ZTest};
use crate::seed::draw_population;
use crate::table::Record;

/// Shown when a button page is mounted before anyone clicks.
pub const PLACEHOLDER: &str = "No update requested";

/// The interactive pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    TTest,
    ZTest,
    Anova,
    Regression,
    Distribution,
}

/// When a page recomputes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// On any table edit.
    Live,
    /// Only on a Calculate click.
    Button,
}

impl PageKind {
    pub const ALL: [PageKind; 5] = [
        PageKind::TTest,
        PageKind::ZTest,
        PageKind::Distribution,
        PageKind::Anova,
        PageKind::Regression,
    ];

    /// Prefix of the page's interaction endpoints, `/dash_{slug}/`.
    pub fn slug(self) -> &'static str {
        match self {
            PageKind::TTest => "ttest",
            PageKind::ZTest => "ztest",
            PageKind::Anova => "anova",
            PageKind::Regression => "regression",
            PageKind::Distribution => "distribution",
        }
    }

    /// Path of the HTML page.
    pub fn route(self) -> &'static str {
        match self {
            PageKind::TTest => "/ttest",
            PageKind::ZTest => "/z_test_page",
            PageKind::Anova => "/anova",
            PageKind::Regression => "/regressions",
            PageKind::Distribution => "/distributions_page",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PageKind::TTest => "Interactive t-test",
            PageKind::ZTest => "Interactive z-test",
            PageKind::Anova => "One-way ANOVA",
            PageKind::Regression => "Linear Regression",
            PageKind::Distribution => "Data distribution",
        }
    }

    pub fn mode(self) -> TriggerMode {
        match self {
            PageKind::TTest | PageKind::Distribution => TriggerMode::Live,
            PageKind::ZTest | PageKind::Anova | PageKind::Regression => TriggerMode::Button,
        }
    }

    /// Whether the page shows "Add Row" buttons.
    pub fn can_add_rows(self) -> bool {
        !matches!(self, PageKind::Distribution)
    }

    pub fn procedure(self) -> &'static dyn StatProcedure {
        match self {
            PageKind::TTest => &TTest,
            PageKind::ZTest => &ZTest,
            PageKind::Anova => &Anova,
            PageKind::Regression => &Regression,
            PageKind::Distribution => &Distribution,
        }
    }

    pub fn slots(self) -> &'static [&'static str] {
        self.procedure().slots()
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        PageKind::ALL
            .into_iter()
            .find(|p| p.slug() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = PageKind::ALL.iter().map(|p| p.slug()).collect();
                format!("unknown page '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Named tables of one page in their wire form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageState {
    tables: BTreeMap<String, Vec<Record>>,
}

impl PageState {
    /// Rows of `slot`; an absent table reads as empty.
    pub fn table(&self, slot: &str) -> &[Record] {
        self.tables.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, slot: impl Into<String>, records: Vec<Record>) {
        self.tables.insert(slot.into(), records);
    }

    /// Overlays the tables of `other` named in `slots`. Tables under any
    /// other name are discarded.
    pub fn merge(&mut self, other: PageState, slots: &[&str]) {
        for (slot, records) in other.tables {
            if slots.contains(&slot.as_str()) {
                self.tables.insert(slot, records);
            } else {
                debug!("Discarding table '{}' that the page does not have", slot);
            }
        }
    }

    pub fn row_count(&self, slot: &str) -> usize {
        self.table(slot).len()
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// A table was edited in place.
    Edit,
    /// The Calculate button; `n_clicks` is 0 on first mount.
    Calculate {
        #[serde(default)]
        n_clicks: u32,
    },
    /// An "Add Row" button bound to `table`.
    AddRow {
        table: String,
        #[serde(default)]
        n_clicks: u32,
    },
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::Calculate { n_clicks: 1 }
    }
}

/// Body of `POST /dash_{slug}/update`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub tables: PageState,
}

/// What the result area should show after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Placeholder { message: String },
    Analysis(Analysis),
    Failed { kind: ErrorKind, message: String },
    /// Keep showing whatever was there.
    Unchanged,
}

impl Outcome {
    fn placeholder() -> Self {
        Outcome::Placeholder { message: PLACEHOLDER.to_string() }
    }

    fn failed(err: &StatlabError) -> Self {
        Outcome::Failed { kind: err.kind(), message: err.to_string() }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            Outcome::Analysis(a) => Some(a),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Update {
    pub tables: PageState,
    pub outcome: Outcome,
}

/// Everything an event handler needs besides the event itself.
pub struct EventContext<'a> {
    pub options: &'a AnalysisOptions,
    /// Appended population rows take a random draw instead of 0.
    pub random_new_rows: bool,
    pub rng: &'a mut dyn RngCore,
}

fn recompute(page: PageKind, tables: PageState, options: &AnalysisOptions) -> Update {
    match page.procedure().recompute(&tables, options) {
        Ok(analysis) => Update { tables, outcome: Outcome::Analysis(analysis) },
        Err(e) => {
            warn!("Recompute on page '{}' failed: {}", page, e);
            Update { outcome: Outcome::failed(&e), tables }
        }
    }
}

/// Handles one event against the page's full current state.
///
/// A zero click count never runs a statistic. Button pages recompute only on
/// Calculate; live pages recompute on edits and row appends too.
pub fn handle_event(
    page: PageKind,
    trigger: &Trigger,
    mut tables: PageState,
    ctx: &mut EventContext<'_>,
) -> Update {
    debug!("Page '{}' received {:?}", page, trigger);
    let live = page.mode() == TriggerMode::Live;

    match trigger {
        Trigger::Calculate { n_clicks: 0 } => Update { tables, outcome: Outcome::placeholder() },
        Trigger::Calculate { .. } => recompute(page, tables, ctx.options),
        Trigger::Edit if live => recompute(page, tables, ctx.options),
        Trigger::Edit => Update { tables, outcome: Outcome::Unchanged },
        Trigger::AddRow { table, .. } if !page.slots().contains(&table.as_str()) => {
            let err = StatlabError::UnknownTable(table.clone());
            Update { outcome: Outcome::failed(&err), tables }
        }
        Trigger::AddRow { n_clicks: 0, .. } => Update { tables, outcome: Outcome::Unchanged },
        Trigger::AddRow { table, n_clicks } => {
            let procedure = page.procedure();
            let random = ctx.random_new_rows && procedure.draws_populations();
            let rng = &mut *ctx.rng;
            let mut fill = || if random { draw_population(rng) } else { 0.0 };

            if let Err(e) = procedure.append_row(&mut tables, table, *n_clicks, &mut fill) {
                warn!("Add row on '{}' of page '{}' failed: {}", table, page, e);
                return Update { outcome: Outcome::failed(&e), tables };
            }
            debug!("Table '{}' now has {} rows", table, tables.row_count(table));

            if live {
                recompute(page, tables, ctx.options)
            } else {
                Update { tables, outcome: Outcome::Unchanged }
            }
        }
    }
}
