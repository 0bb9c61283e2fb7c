//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from cardmatch-core
pub use cardmatch_core::{
    ButtonLabel, CardView, ChoiceView, CueRef, Highlight, PairsView, RoundView, ScreenId, Side,
    Verdict,
};

// === Screen Types ===

/// Which engine drives a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenVariant {
    Single,
    Pairs,
}

/// Render state of any screen.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ScreenView {
    Single(RoundView),
    Pairs(PairsView),
}

/// Entry of the screen list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenSummary {
    pub id: ScreenId,
    pub variant: ScreenVariant,
    pub next: ScreenId,
}

/// Response for GET /api/screens
#[derive(Debug, Serialize, Deserialize)]
pub struct ScreenListResponse {
    pub screens: Vec<ScreenSummary>,
}

/// Request for POST /api/screens/:id/select
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectRequest {
    pub token: String,
    /// Column of the card; required on the pairs screen, rejected elsewhere.
    #[serde(default)]
    pub side: Option<Side>,
}

/// Response for POST /api/screens/:id/advance
#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    /// Screen the front-end should route to, if the round was won.
    pub navigate: Option<ScreenId>,
    pub screen: ScreenView,
}

// === Cue Types ===

/// Cue the front-end should be playing right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub id: Uuid,
    pub cue: CueRef,
    pub url: String,
    pub started_at: DateTime<Utc>,
}

/// Response for GET /api/cue
#[derive(Debug, Serialize, Deserialize)]
pub struct CueStatusResponse {
    pub now_playing: Option<NowPlaying>,
}
