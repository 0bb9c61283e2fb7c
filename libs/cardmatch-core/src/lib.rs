//! Core card-matching library shared by the app's quiz screens.
//!
//! Provides:
//! - Single-select engine (hear a cue, pick one card)
//! - Pairs-matching engine with delayed, identity-checked pair removal
//! - Audio cue controller that keeps at most one clip alive
//! - Built-in content tables and shared types (Verdict, Highlight, Effect, etc.)

pub mod content;
pub mod cue;
pub mod error;
pub mod pairs;
pub mod round;
pub mod types;

pub use content::{PairsContent, Prompt, PromptOrder, SingleSelectContent, WordPair, SETTLE_DELAY};
pub use cue::{CueBackend, CueController, CueOutcome};
pub use error::{ContentError, CueError, Result};
pub use pairs::{CardView, CheckResult, PairsEngine, PairsView, SettleTicket, Side};
pub use round::{ChoiceView, RoundView, SelectEngine};
pub use types::{ButtonLabel, CueRef, Effect, Highlight, ScreenId, Verdict};
