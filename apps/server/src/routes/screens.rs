//! Screen endpoints
//!
//! Engine calls that do not apply (unknown token, check before a selection,
//! advance before a verdict) are not errors: the unchanged snapshot is
//! returned.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::screens::{apply_effects, schedule_settle, Screen, ScreenHandle};
use crate::AppState;
use cardmatch_core::CheckResult;

fn find_screen(state: &AppState, id: &str) -> Result<ScreenHandle> {
    state
        .screens
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("screen {}", id)))
}

/// GET /api/screens
pub async fn list(State(state): State<AppState>) -> Json<ScreenListResponse> {
    Json(ScreenListResponse {
        screens: state.screens.summaries().await,
    })
}

/// GET /api/screens/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScreenView>> {
    let screen = find_screen(&state, &id)?;
    let view = screen.lock().await.view();
    Ok(Json(view))
}

/// POST /api/screens/:id/mount
/// Starts a fresh round (or match session) and plays its cue
pub async fn mount(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScreenView>> {
    let screen = find_screen(&state, &id)?;

    let (owner, effects, view) = {
        let mut screen = screen.lock().await;
        let effects = match &mut *screen {
            Screen::Single(engine) => vec![engine.next_round(&mut rand::thread_rng())],
            Screen::Pairs(engine) => {
                engine.restart();
                Vec::new()
            }
        };
        (screen.id().clone(), effects, screen.view())
    };

    tracing::info!("Mounted screen {}", id);
    apply_effects(&state.cues, &owner, effects).await;

    Ok(Json(view))
}

/// POST /api/screens/:id/select
pub async fn select(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<ScreenView>> {
    let screen = find_screen(&state, &id)?;
    let mut screen = screen.lock().await;

    match (&mut *screen, request.side) {
        (Screen::Single(engine), None) => {
            engine.select_choice(&request.token);
        }
        (Screen::Pairs(engine), Some(side)) => {
            engine.select(side, &request.token);
        }
        (Screen::Single(_), Some(_)) => {
            return Err(ApiError::BadRequest(format!(
                "screen {} has a single column of cards",
                id
            )));
        }
        (Screen::Pairs(_), None) => {
            return Err(ApiError::BadRequest(format!(
                "screen {} needs a side (left or right)",
                id
            )));
        }
    }

    Ok(Json(screen.view()))
}

/// POST /api/screens/:id/check
pub async fn check(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScreenView>> {
    let handle = find_screen(&state, &id)?;
    let mut screen = handle.lock().await;

    match &mut *screen {
        Screen::Single(engine) => {
            engine.check();
        }
        Screen::Pairs(engine) => {
            if let CheckResult::Matched(ticket) = engine.check() {
                schedule_settle(handle.clone(), ticket);
            }
        }
    }

    Ok(Json(screen.view()))
}

/// POST /api/screens/:id/advance
/// Continue after a correct answer, or clear a wrong one
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdvanceResponse>> {
    let screen = find_screen(&state, &id)?;

    let (owner, effects, view) = {
        let mut screen = screen.lock().await;
        let effects = match &mut *screen {
            Screen::Single(engine) => engine.advance(&mut rand::thread_rng()),
            Screen::Pairs(engine) => engine.advance(),
        };
        (screen.id().clone(), effects, screen.view())
    };

    let navigate = apply_effects(&state.cues, &owner, effects).await;

    Ok(Json(AdvanceResponse {
        navigate,
        screen: view,
    }))
}

/// POST /api/screens/:id/replay
/// Plays the current prompt's cue again
pub async fn replay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScreenView>> {
    let screen = find_screen(&state, &id)?;

    let (owner, effects, view) = {
        let screen = screen.lock().await;
        let effects = match &*screen {
            Screen::Single(engine) => vec![engine.replay_cue()],
            Screen::Pairs(_) => Vec::new(),
        };
        (screen.id().clone(), effects, screen.view())
    };

    apply_effects(&state.cues, &owner, effects).await;

    Ok(Json(view))
}

/// POST /api/screens/:id/unmount
/// Releases the screen's audio; a cue another screen started keeps playing
pub async fn unmount(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let owner = find_screen(&state, &id)?.lock().await.id().clone();
    let released = state.cues.stop_and_release(&owner).await;

    tracing::info!("Unmounted screen {} (cue released: {})", id, released);

    Ok(StatusCode::NO_CONTENT)
}
