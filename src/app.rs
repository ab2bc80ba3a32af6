use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_http::services::ServeDir;

use crate::config::ServerConfig;
use crate::employee::Roster;
use crate::expand::ExpandState;
use crate::hierarchy::{Node, build_tree_named};
use crate::source::{RosterSource, SourceError};
use crate::view::ChartView;

/// The latest roster and the chart built from it.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub roster: Roster,
    pub tree: Option<Node>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

pub struct AppState {
    source: RosterSource,
    org_name: String,
    templates: Handlebars<'static>,
    snapshot: RwLock<Snapshot>,
    expand: Mutex<ExpandState>,
    // Serialises rebuilds between the timer and manual refreshes
    refresh_lock: tokio::sync::Mutex<()>,
}

impl AppState {
    pub fn new(
        source: RosterSource,
        org_name: impl Into<String>,
    ) -> Result<Self, handlebars::TemplateError> {
        let mut templates = Handlebars::new();
        templates.register_template_string("chart", include_str!("./static/chart.hbs"))?;

        Ok(AppState {
            source,
            org_name: org_name.into(),
            templates,
            snapshot: RwLock::new(Snapshot::default()),
            expand: Mutex::new(ExpandState::new()),
            refresh_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn snapshot(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_mut(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.snapshot.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn expand_state(&self) -> MutexGuard<'_, ExpandState> {
        self.expand.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the current chart with one built from `roster`.
    ///
    /// An empty roster keeps the previous chart: there is nothing to show
    /// until data arrives.
    pub fn apply_roster(&self, roster: Roster) {
        let tree = build_tree_named(&roster, &self.org_name);

        let mut snapshot = self.snapshot_mut();
        snapshot.refreshed_at = Some(Utc::now());
        snapshot.last_error = None;

        if tree.is_none() {
            log::info!("roster from {} is empty, keeping previous chart", self.source.describe());
            return;
        }
        snapshot.tree = tree;
        snapshot.roster = roster;
    }

    fn record_error(&self, err: &SourceError) {
        log::warn!("roster refresh from {} failed: {}", self.source.describe(), err);
        self.snapshot_mut().last_error = Some(err.to_string());
    }
}

/// Fetch the roster once and rebuild the chart.
///
/// # Returns
/// * `Ok(usize)` - Number of employees in the fetched roster
/// * `Err(SourceError)` - The fetch or parse failed; the previous chart stays
pub async fn refresh_once(state: &AppState) -> Result<usize, SourceError> {
    let _guard = state.refresh_lock.lock().await;

    match state.source.load().await {
        Ok(roster) => {
            let employees = roster.len();
            state.apply_roster(roster);
            Ok(employees)
        }
        Err(e) => {
            state.record_error(&e);
            Err(e)
        }
    }
}

/// Refresh the chart on a fixed period, starting immediately.
pub fn spawn_refresher(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            // Failures are recorded on the snapshot by refresh_once
            let _ = refresh_once(&state).await;
        }
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_chart))
        .route("/api/tree", get(get_tree))
        .route("/api/status", get(get_status))
        .route("/api/toggle/:key", post(toggle_node))
        .route("/api/expand_all", post(expand_all))
        .route("/api/collapse_all", post(collapse_all))
        .route("/api/refresh", post(refresh_now))
        .nest_service("/static", ServeDir::new("static"))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = RosterSource::parse(&config.source, config.timeout())?;
    log::info!(
        "Reading roster from {} every {}s",
        source.describe(),
        config.interval_secs
    );

    let state = Arc::new(AppState::new(source, config.org_name.clone())?);
    spawn_refresher(Arc::clone(&state), config.interval());

    let app = router(state);
    let listener = TcpListener::bind(config.bind.as_str()).await?;
    log::info!("Listening on http://{}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct StatusResponse {
    source: String,
    employees: usize,
    lines: usize,
    nodes: usize,
    tracked_keys: usize,
    refreshed_at: Option<String>,
    last_error: Option<String>,
}

#[derive(Serialize)]
struct ToggleResponse {
    key: String,
    expanded: bool,
}

#[derive(Serialize)]
struct RefreshResponse {
    status: String,
    employees: usize,
    message: Option<String>,
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let resp = next.run(req).await;
    log::info!(
        "{} {} -> {} ({:?})",
        method,
        uri,
        resp.status().as_u16(),
        started.elapsed()
    );
    resp
}

async fn serve_chart(State(state): State<Arc<AppState>>) -> Response {
    let rendered = {
        let snapshot = state.snapshot();
        let Some(tree) = snapshot.tree.as_ref() else {
            return Html(include_str!("./static/loading.html")).into_response();
        };
        let view = ChartView::build(tree, &state.expand_state());
        state.templates.render("chart", &view)
    };

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            log::error!("failed to render chart: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render chart").into_response()
        }
    }
}

async fn get_tree(State(state): State<Arc<AppState>>) -> Response {
    match state.snapshot().tree.clone() {
        Some(tree) => Json(tree).into_response(),
        None => (StatusCode::NOT_FOUND, "no roster data yet").into_response(),
    }
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.snapshot();

    Json(StatusResponse {
        source: state.source.describe(),
        employees: snapshot.roster.len(),
        lines: snapshot.tree.as_ref().map_or(0, |t| t.children.len()),
        nodes: snapshot.tree.as_ref().map_or(0, Node::count),
        tracked_keys: state.expand_state().tracked_keys(),
        refreshed_at: snapshot.refreshed_at.map(|t| t.to_rfc3339()),
        last_error: snapshot.last_error.clone(),
    })
}

async fn toggle_node(Path(key): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.snapshot();
    if snapshot.tree.as_ref().and_then(|t| t.find(&key)).is_none() {
        return (StatusCode::NOT_FOUND, "no such node").into_response();
    }

    let expanded = state.expand_state().toggle(&key);
    Json(ToggleResponse { key, expanded }).into_response()
}

async fn expand_all(State(state): State<Arc<AppState>>) -> StatusCode {
    set_all(&state, true)
}

async fn collapse_all(State(state): State<Arc<AppState>>) -> StatusCode {
    set_all(&state, false)
}

fn set_all(state: &AppState, open: bool) -> StatusCode {
    let snapshot = state.snapshot();
    match snapshot.tree.as_ref() {
        Some(tree) => {
            state.expand_state().set_all(tree, open);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn refresh_now(State(state): State<Arc<AppState>>) -> Response {
    match refresh_once(&state).await {
        Ok(employees) => Json(RefreshResponse {
            status: "ok".to_string(),
            employees,
            message: None,
        })
        .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(RefreshResponse {
                status: "error".to_string(),
                employees: 0,
                message: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}
