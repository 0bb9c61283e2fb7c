//! Core types shared by both engine variants.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MESSAGE_CORRECT: &str = "Well Done!";
pub const MESSAGE_INCORRECT: &str = "Try Again";
pub const MESSAGE_COMPLETED: &str = "Congratulations! All pairs matched.";

/// Identifier of a screen in the shell's routing table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(String);

impl ScreenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScreenId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Reference to an audio clip, relative to the asset root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueRef(String);

impl CueRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Highlight state of a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    Neutral,
    Pending,
    Correct,
    Incorrect,
}

impl Default for Highlight {
    fn default() -> Self {
        Self::Neutral
    }
}

/// Outcome of the last check in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Unknown,
    Correct,
    Incorrect,
}

impl Default for Verdict {
    fn default() -> Self {
        Self::Unknown
    }
}

impl Verdict {
    pub fn is_decided(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn from_match(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }

    /// Highlight a checked card takes for this verdict.
    pub fn highlight(self) -> Highlight {
        match self {
            Self::Unknown => Highlight::Neutral,
            Self::Correct => Highlight::Correct,
            Self::Incorrect => Highlight::Incorrect,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::Correct => MESSAGE_CORRECT,
            Self::Incorrect => MESSAGE_INCORRECT,
        }
    }
}

/// Label of the single control button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonLabel {
    Check,
    Continue,
    Retry,
    #[serde(rename = "Try Again")]
    TryAgain,
}

impl Default for ButtonLabel {
    fn default() -> Self {
        Self::Check
    }
}

impl ButtonLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Check => "Check",
            Self::Continue => "Continue",
            Self::Retry => "Retry",
            Self::TryAgain => "Try Again",
        }
    }
}

impl fmt::Display for ButtonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something the shell must do on the engine's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Effect {
    PlayCue(CueRef),
    Navigate(ScreenId),
}
