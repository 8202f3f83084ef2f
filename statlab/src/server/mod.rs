// statlab/src/server/mod.rs
//! HTTP surface: static pages, interactive pages and their per-page
//! interaction endpoints.
//!
//! Each interactive page `P` is mounted at `P.route()` and owns two
//! endpoints under `/dash_{slug}/`: `GET state` for the current tables and
//! `POST update` for events.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Form, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use statlab_core::pages;
use statlab_core::{
    new_session_id, resolve_submission, AppConfig, ErrorKind, PageKind, PageState, SessionStore,
    StatlabError, TriggerMode, UpdateRequest, SESSION_COOKIE,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { store: Arc::new(SessionStore::new(&config)), config: Arc::new(config) }
    }
}

/// A library error rendered as an HTTP response.
pub struct ServerError(StatlabError);

impl From<StatlabError> for ServerError {
    fn from(err: StatlabError) -> Self {
        ServerError(err)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", self.0)).into_response()
    }
}

/// The caller's session id, and whether it was just minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub fresh: bool,
}

impl Session {
    /// Reads the session cookie, minting a new id when it is absent or malformed.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let existing = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok());
        match existing {
            Some(id) => Self { id, fresh: false },
            None => Self { id: new_session_id(), fresh: true },
        }
    }

    /// Attaches `Set-Cookie` when the id is new.
    pub fn attach(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.fresh {
            let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

/// Body of `GET /dash_{slug}/state`. Column order is listed separately
/// because JSON objects do not keep key order.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub page: &'static str,
    pub mode: &'static str,
    pub columns: std::collections::BTreeMap<&'static str, Vec<&'static str>>,
    pub tables: PageState,
}

#[derive(Debug, Serialize)]
struct PayloadError {
    status: &'static str,
    kind: ErrorKind,
    message: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub options: Option<String>,
}

async fn home() -> Result<Html<String>, ServerError> {
    Ok(Html(pages::render_home()?))
}

async fn about(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    Ok(Html(pages::render_about(
        state.config.analysis.missing_values,
        state.config.session.mode,
    )?))
}

async fn reference() -> Result<Html<String>, ServerError> {
    Ok(Html(pages::render_reference()?))
}

async fn submit(Form(form): Form<SubmitForm>) -> Redirect {
    let target = resolve_submission(form.options.as_deref());
    debug!("Dropdown selection {:?} redirects to {}", form.options, target);
    Redirect::to(target)
}

async fn interactive(page: PageKind, headers: HeaderMap) -> Result<Response, ServerError> {
    let session = Session::from_headers(&headers);
    let html = pages::render_page(page)?;
    Ok(session.attach(Html(html)))
}

async fn page_state(page: PageKind, state: AppState, headers: HeaderMap) -> Response {
    let session = Session::from_headers(&headers);
    let tables = state.store.state(session.id, page).await;
    let procedure = page.procedure();
    let columns = procedure
        .slots()
        .iter()
        .filter_map(|slot| procedure.columns(slot).map(|cols| (*slot, cols)))
        .collect();
    let mode = match page.mode() {
        TriggerMode::Live => "live",
        TriggerMode::Button => "button",
    };
    debug!("Serving state of page '{}' to session {}", page, session.id);
    session.attach((
        [(CACHE_CONTROL, "no-store")],
        Json(StateResponse { page: page.slug(), mode, columns, tables }),
    ))
}

async fn page_update(page: PageKind, state: AppState, headers: HeaderMap, body: Bytes) -> Response {
    let session = Session::from_headers(&headers);
    let request: UpdateRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            let err = StatlabError::Payload(e);
            debug!("Rejecting update for page '{}': {}", page, err);
            let body = PayloadError { status: "failed", kind: err.kind(), message: err.to_string() };
            return session.attach((StatusCode::BAD_REQUEST, Json(body)));
        }
    };
    debug!("Session {} sent {:?} to page '{}'", session.id, request.trigger, page);
    let update = state.store.update(session.id, page, request).await;
    session.attach(Json(update))
}

async fn script() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/javascript; charset=utf-8")], pages::SCRIPT)
}

async fn stylesheet() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], pages::STYLESHEET)
}

async fn not_found(uri: Uri) -> Response {
    debug!("No route for {}", uri.path());
    match pages::render_not_found(uri.path()) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => ServerError(e).into_response(),
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/reference_page", get(reference))
        .route("/submit", post(submit))
        .route("/static/statlab.js", get(script))
        .route("/static/statlab.css", get(stylesheet));

    for page in PageKind::ALL {
        let prefix = format!("/dash_{}", page.slug());
        app = app
            .route(page.route(), get(move |headers: HeaderMap| interactive(page, headers)))
            .route(
                &format!("{}/state", prefix),
                get(move |State(state): State<AppState>, headers: HeaderMap| {
                    page_state(page, state, headers)
                }),
            )
            .route(
                &format!("{}/update", prefix),
                post(move |State(state): State<AppState>, headers: HeaderMap, body: Bytes| {
                    page_update(page, state, headers, body)
                }),
            );
    }

    app.fallback(not_found).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_parsed() {
        let id = new_session_id();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, id)).unwrap(),
        );
        assert_eq!(Session::from_headers(&headers), Session { id, fresh: false });
    }

    #[test]
    fn malformed_cookie_mints_new_session() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("statlab_session=not-a-uuid"));
        assert!(Session::from_headers(&headers).fresh);
    }

    #[test]
    fn fresh_session_sets_cookie() {
        let session = Session { id: new_session_id(), fresh: true };
        let response = session.attach("ok");
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with(&format!("{}={}", SESSION_COOKIE, session.id)));
    }
}
