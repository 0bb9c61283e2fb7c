//! Cue endpoint polled by the front-end

use axum::{extract::State, Json};

use crate::models::CueStatusResponse;
use crate::AppState;

/// GET /api/cue
/// Returns the clip the front-end should be playing, if any
pub async fn now_playing(State(state): State<AppState>) -> Json<CueStatusResponse> {
    Json(CueStatusResponse {
        now_playing: state.cues.backend().now_playing(),
    })
}
