//! Common test utilities for integration tests.
//!
//! Each TestContext owns a temporary asset directory and a router over the
//! built-in screens, so tests do not share engine state.

#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use cardmatch_server::{build_router, AppState};

/// Sounds written into the temporary asset directory.
const SOUNDS: &[&str] = &["la", "mala", "apt", "bag", "money", "sujan"];

/// Test context containing the test server and its asset directory.
pub struct TestContext {
    pub server: TestServer,
    _assets: TempDir,
}

impl TestContext {
    /// Create a context with every cue present on disk.
    pub fn new() -> Self {
        let assets = tempfile::tempdir().expect("Failed to create asset dir");
        std::fs::create_dir_all(assets.path().join("sounds")).expect("Failed to create sounds dir");
        for sound in SOUNDS {
            std::fs::write(
                assets.path().join("sounds").join(format!("{}.mp3", sound)),
                sound.as_bytes(),
            )
            .expect("Failed to write sound");
        }
        Self::with_assets(assets)
    }

    /// Create a context whose asset directory is empty.
    ///
    /// Every cue fails to load, which must not block play.
    pub fn without_assets() -> Self {
        let assets = tempfile::tempdir().expect("Failed to create asset dir");
        Self::with_assets(assets)
    }

    fn with_assets(assets: TempDir) -> Self {
        let state = AppState::new(assets.path()).expect("Failed to build app state");
        let app = build_router(state, assets.path());
        let server = TestServer::new(app).expect("Failed to start test server");

        Self {
            server,
            _assets: assets,
        }
    }

    pub async fn mount(&self, screen: &str) -> Value {
        self.post(&format!("/api/screens/{}/mount", screen), None).await
    }

    pub async fn select(&self, screen: &str, token: &str) -> Value {
        self.post(
            &format!("/api/screens/{}/select", screen),
            Some(json!({ "token": token })),
        )
        .await
    }

    pub async fn select_side(&self, screen: &str, side: &str, token: &str) -> Value {
        self.post(
            &format!("/api/screens/{}/select", screen),
            Some(json!({ "token": token, "side": side })),
        )
        .await
    }

    pub async fn check(&self, screen: &str) -> Value {
        self.post(&format!("/api/screens/{}/check", screen), None).await
    }

    pub async fn advance(&self, screen: &str) -> Value {
        self.post(&format!("/api/screens/{}/advance", screen), None).await
    }

    pub async fn view(&self, screen: &str) -> Value {
        let response = self.server.get(&format!("/api/screens/{}", screen)).await;
        response.assert_status_ok();
        response.json()
    }

    pub async fn now_playing(&self) -> Value {
        let response = self.server.get("/api/cue").await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["now_playing"].clone()
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Value {
        let request = self.server.post(path);
        let response = match body {
            Some(body) => request.json(&body).await,
            None => request.await,
        };
        response.assert_status_ok();
        response.json()
    }
}

/// Highlight of the card with `token` in a list of card views.
pub fn highlight_of<'a>(cards: &'a Value, token: &str) -> &'a str {
    cards
        .as_array()
        .expect("cards should be an array")
        .iter()
        .find(|c| c["token"] == token)
        .and_then(|c| c["highlight"].as_str())
        .expect("card should be on the board")
}
