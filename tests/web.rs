#![cfg(feature = "web")]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use orgchart::app::{AppState, refresh_once, router};
use orgchart::source::RosterSource;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const ROSTER: &str = "\
codigo,nombre,cargo,linea,codigoJefe,salario
E1,Ana,JEFE,WAREHOUSE,,\"2.000.000\"
E2,Luis,LIDER,WAREHOUSE,E1,\"1.000.000\"
E3,Sara,SUPERVISOR,LAST MILE,,\"1.500.000\"
";

fn fixture(csv: &str) -> (TempDir, Arc<AppState>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.csv");
    std::fs::write(&path, csv).unwrap();

    let source = RosterSource::parse(path.to_str().unwrap(), Duration::from_secs(5)).unwrap();
    let state = Arc::new(AppState::new(source, "Quick").unwrap());
    (dir, state)
}

fn roster_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("roster.csv")
}

async fn send(state: &Arc<AppState>, method: &str, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = router(Arc::clone(state)).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn rewrite(path: &Path, csv: &str) {
    std::fs::write(path, csv).unwrap();
}

#[tokio::test]
async fn nothing_to_show_before_first_refresh() {
    let (_dir, state) = fixture(ROSTER);

    let (status, _) = send(&state, "GET", "/api/tree").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&state, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Cargando datos"));

    let (status, _) = send(&state, "POST", "/api/expand_all").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn refresh_builds_the_tree() {
    let (_dir, state) = fixture(ROSTER);
    assert_eq!(refresh_once(&state).await.unwrap(), 3);

    let (status, body) = send(&state, "GET", "/api/tree").await;
    assert_eq!(status, StatusCode::OK);
    let tree: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(tree["key"], "quick");
    assert_eq!(tree["label"], "QUICK (3 members)");
    assert_eq!(tree["children"][0]["key"], "WAREHOUSE");
    assert_eq!(tree["children"][0]["kind"], "line");
    assert_eq!(tree["children"].as_array().unwrap().len(), 2);

    let (_, body) = send(&state, "GET", "/api/status").await;
    let status: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(status["employees"], 3);
    assert_eq!(status["lines"], 2);
    assert!(status["refreshed_at"].is_string());
    assert!(status["last_error"].is_null());
}

#[tokio::test]
async fn toggle_decodes_keys_and_flips_state() {
    let (_dir, state) = fixture(ROSTER);
    refresh_once(&state).await.unwrap();

    let (status, body) = send(&state, "POST", "/api/toggle/LAST%20MILE").await;
    assert_eq!(status, StatusCode::OK);
    let resp: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(resp["key"], "LAST MILE");
    assert_eq!(resp["expanded"], true);

    let (_, body) = send(&state, "POST", "/api/toggle/LAST%20MILE").await;
    let resp: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(resp["expanded"], false);
}

#[tokio::test]
async fn chart_page_follows_expand_state() {
    let (_dir, state) = fixture(ROSTER);
    refresh_once(&state).await.unwrap();

    let (_, body) = send(&state, "GET", "/").await;
    assert!(body.contains("WAREHOUSE (2 members)"));
    assert!(!body.contains("JEFE (1)"));

    let (status, _) = send(&state, "POST", "/api/expand_all").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = send(&state, "GET", "/").await;
    assert!(body.contains("JEFE (1)"));
    assert!(body.contains("SUPERVISOR (1)"));

    send(&state, "POST", "/api/collapse_all").await;
    let (_, body) = send(&state, "GET", "/").await;
    assert!(!body.contains("JEFE (1)"));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_chart() {
    let (dir, state) = fixture(ROSTER);
    refresh_once(&state).await.unwrap();

    std::fs::remove_file(roster_path(&dir)).unwrap();
    assert!(refresh_once(&state).await.is_err());

    let (status, _) = send(&state, "GET", "/api/tree").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&state, "POST", "/api/refresh").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let resp: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(resp["status"], "error");

    let (_, body) = send(&state, "GET", "/api/status").await;
    let status: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(status["last_error"].is_string());
}

#[tokio::test]
async fn empty_roster_keeps_previous_chart() {
    let (dir, state) = fixture(ROSTER);
    refresh_once(&state).await.unwrap();

    rewrite(&roster_path(&dir), "codigo,nombre,cargo,linea,codigoJefe,salario\n");
    assert_eq!(refresh_once(&state).await.unwrap(), 0);

    let snapshot = state.snapshot();
    assert_eq!(snapshot.roster.len(), 3);
    assert!(snapshot.tree.is_some());
}

#[tokio::test]
async fn expand_state_survives_rebuilds() {
    let (dir, state) = fixture(ROSTER);
    refresh_once(&state).await.unwrap();
    send(&state, "POST", "/api/toggle/WAREHOUSE").await;

    rewrite(
        &roster_path(&dir),
        &format!("{}E4,Mar,AUXILIAR,WAREHOUSE,E2,\"900.000\"\n", ROSTER),
    );
    assert_eq!(refresh_once(&state).await.unwrap(), 4);

    assert!(state.expand_state().is_expanded("WAREHOUSE"));
    let (_, body) = send(&state, "GET", "/").await;
    assert!(body.contains("WAREHOUSE (3 members)"));
    assert!(body.contains("JEFE (1)"));
}

#[tokio::test]
async fn toggle_rejects_keys_outside_the_chart() {
    let (_dir, state) = fixture(ROSTER);

    let (status, _) = send(&state, "POST", "/api/toggle/WAREHOUSE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    refresh_once(&state).await.unwrap();
    send(&state, "POST", "/api/toggle/WAREHOUSE").await;
    assert_eq!(state.expand_state().tracked_keys(), 1);

    for i in 0..50 {
        let (status, _) = send(&state, "POST", &format!("/api/toggle/junk{}", i)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    assert_eq!(state.expand_state().tracked_keys(), 1);

    let (_, body) = send(&state, "GET", "/api/status").await;
    let status: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(status["tracked_keys"], 1);
}
