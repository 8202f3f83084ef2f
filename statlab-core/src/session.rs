// statlab-core/src/session.rs
//! Where page tables live between requests.
//!
//! In isolated mode every browser session owns a copy of the seed tables. In
//! shared mode all sessions read and write one process-wide copy, so the last
//! write wins. Each update is a read-modify-write under one lock.
//!
//! License: MIT OR Apache-2.0

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::interaction::{handle_event, EventContext, PageKind, PageState, Update, UpdateRequest};
use crate::procedure::AnalysisOptions;
use crate::seed::rng_from_seed;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "statlab_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// One dataset per browser session.
    #[default]
    Isolated,
    /// One dataset for everybody.
    Shared,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Isolated => f.write_str("isolated"),
            SessionMode::Shared => f.write_str("shared"),
        }
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolated" => Ok(SessionMode::Isolated),
            "shared" => Ok(SessionMode::Shared),
            other => Err(format!("unknown session mode '{}' (expected isolated or shared)", other)),
        }
    }
}

/// A fresh random session id.
pub fn new_session_id() -> Uuid {
    Uuid::new_v4()
}

/// All pages' tables for one session.
type Workspace = HashMap<PageKind, PageState>;

struct Inner {
    baseline: Workspace,
    sessions: HashMap<Uuid, Workspace>,
    order: VecDeque<Uuid>,
    rng: StdRng,
}

/// Holds page tables for every session.
pub struct SessionStore {
    mode: SessionMode,
    max_sessions: usize,
    random_new_rows: bool,
    options: AnalysisOptions,
    inner: Mutex<Inner>,
}

fn workspace<'a>(
    mode: SessionMode,
    max_sessions: usize,
    baseline: &'a mut Workspace,
    sessions: &'a mut HashMap<Uuid, Workspace>,
    order: &mut VecDeque<Uuid>,
    session: Uuid,
) -> &'a mut Workspace {
    if mode == SessionMode::Shared {
        return baseline;
    }
    if sessions.contains_key(&session) {
        // Most recently used sessions sit at the back.
        if let Some(pos) = order.iter().position(|id| *id == session) {
            order.remove(pos);
        }
        order.push_back(session);
    } else {
        while sessions.len() >= max_sessions {
            match order.pop_front() {
                Some(stale) => {
                    debug!("Evicting session {}", stale);
                    sessions.remove(&stale);
                }
                None => break,
            }
        }
        debug!("Starting session {} from the seed tables", session);
        sessions.insert(session, baseline.clone());
        order.push_back(session);
    }
    sessions.entry(session).or_insert_with(|| baseline.clone())
}

impl SessionStore {
    /// Seeds every page once; sessions start from copies of these tables.
    pub fn new(config: &AppConfig) -> Self {
        let mut rng = rng_from_seed(config.seed.random_seed);
        let baseline: Workspace = PageKind::ALL
            .into_iter()
            .map(|page| (page, page.procedure().seed(config.seed.rows, &mut rng)))
            .collect();
        info!(
            "Session store ready ({} mode, {} seed rows)",
            config.session.mode, config.seed.rows
        );
        Self {
            mode: config.session.mode,
            max_sessions: config.session.max_sessions.max(1),
            random_new_rows: config.seed.random_new_rows,
            options: config.analysis_options(),
            inner: Mutex::new(Inner {
                baseline,
                sessions: HashMap::new(),
                order: VecDeque::new(),
                rng,
            }),
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// The page's current tables as seen by `session`.
    pub async fn state(&self, session: Uuid, page: PageKind) -> PageState {
        let mut guard = self.inner.lock().await;
        let Inner { baseline, sessions, order, .. } = &mut *guard;
        let ws = workspace(self.mode, self.max_sessions, baseline, sessions, order, session);
        ws.get(&page).cloned().unwrap_or_default()
    }

    /// Applies one event and stores the resulting tables.
    ///
    /// Tables present in the request replace the stored ones before the
    /// event runs; tables it omits keep their stored contents.
    pub async fn update(&self, session: Uuid, page: PageKind, request: UpdateRequest) -> Update {
        let mut guard = self.inner.lock().await;
        let Inner { baseline, sessions, order, rng } = &mut *guard;
        let ws = workspace(self.mode, self.max_sessions, baseline, sessions, order, session);

        let mut tables = ws.get(&page).cloned().unwrap_or_default();
        tables.merge(request.tables, page.slots());

        let mut ctx = EventContext {
            options: &self.options,
            random_new_rows: self.random_new_rows,
            rng,
        };
        let update = handle_event(page, &request.trigger, tables, &mut ctx);
        ws.insert(page, update.tables.clone());
        update
    }

    /// Number of isolated sessions currently held.
    pub async fn session_count(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Trigger;

    fn config(mode: SessionMode, max_sessions: usize) -> AppConfig {
        let mut config = AppConfig::default();
        config.session.mode = mode;
        config.session.max_sessions = max_sessions;
        config.seed.rows = 4;
        config.seed.random_seed = Some(5);
        config
    }

    fn add_row(table: &str) -> UpdateRequest {
        UpdateRequest {
            trigger: Trigger::AddRow { table: table.to_string(), n_clicks: 1 },
            tables: PageState::default(),
        }
    }

    #[tokio::test]
    async fn test_isolated_sessions_do_not_interfere() {
        let store = SessionStore::new(&config(SessionMode::Isolated, 16));
        let (alice, bob) = (new_session_id(), new_session_id());

        store.update(alice, PageKind::ZTest, add_row("data-table1")).await;
        let a = store.state(alice, PageKind::ZTest).await;
        let b = store.state(bob, PageKind::ZTest).await;
        assert_eq!(a.row_count("data-table1"), 5);
        assert_eq!(b.row_count("data-table1"), 4);
        assert_eq!(store.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_shared_mode_last_write_wins() {
        let store = SessionStore::new(&config(SessionMode::Shared, 16));
        let (alice, bob) = (new_session_id(), new_session_id());

        store.update(alice, PageKind::Anova, add_row("data-table")).await;
        store.update(bob, PageKind::Anova, add_row("data-table")).await;
        assert_eq!(store.state(alice, PageKind::Anova).await.row_count("data-table"), 6);
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_tables_are_not_stored() {
        let store = SessionStore::new(&config(SessionMode::Isolated, 16));
        let session = new_session_id();

        for i in 0..3 {
            let tables: PageState = serde_json::from_value(serde_json::json!({
                (format!("junk-{}", i)): [{"X Values": 1, "Y Values": 1}]
            }))
            .unwrap();
            let request = UpdateRequest { trigger: Trigger::Edit, tables };
            store.update(session, PageKind::Regression, request).await;
        }

        let state = store.state(session, PageKind::Regression).await;
        let stored = serde_json::to_value(&state).unwrap();
        let keys: Vec<&String> = stored.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["data-table"]);
        assert_eq!(state.row_count("data-table"), 10);
    }

    #[tokio::test]
    async fn test_recently_used_session_survives_eviction() {
        let store = SessionStore::new(&config(SessionMode::Isolated, 2));
        let (active, idle, newcomer) = (new_session_id(), new_session_id(), new_session_id());

        store.update(active, PageKind::Regression, add_row("data-table")).await;
        store.state(idle, PageKind::Regression).await;
        store.state(active, PageKind::Regression).await;
        store.state(newcomer, PageKind::Regression).await;

        assert_eq!(store.session_count().await, 2);
        assert_eq!(store.state(active, PageKind::Regression).await.row_count("data-table"), 11);
    }

    #[tokio::test]
    async fn test_oldest_session_is_evicted() {
        let store = SessionStore::new(&config(SessionMode::Isolated, 1));
        let (first, second) = (new_session_id(), new_session_id());

        store.update(first, PageKind::Regression, add_row("data-table")).await;
        store.state(second, PageKind::Regression).await;
        assert_eq!(store.session_count().await, 1);
        // The evicted session starts over from the seed tables.
        assert_eq!(store.state(first, PageKind::Regression).await.row_count("data-table"), 10);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Shared".parse::<SessionMode>().unwrap(), SessionMode::Shared);
        assert!("global".parse::<SessionMode>().is_err());
    }
}
