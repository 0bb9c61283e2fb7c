//! Pairs-matching engine.
//!
//! The board shows the left and right token of every pair still in play.
//! A correct check does not remove the pair straight away: it hands out a
//! [`SettleTicket`] and the shell calls [`PairsEngine::settle`] once
//! [`SETTLE_DELAY`](crate::content::SETTLE_DELAY) has passed, so the green
//! highlight stays on screen for a moment. The ticket names the session and
//! the exact pair, so a timer that fires after the board moved on does
//! nothing.

use crate::content::{PairsContent, WordPair, SETTLE_DELAY};
use crate::error::Result;
use crate::types::{ButtonLabel, Effect, Highlight, ScreenId, Verdict, MESSAGE_COMPLETED};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Left or right column of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Pending removal of a matched pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleTicket {
    session: Uuid,
    pair: WordPair,
    delay: Duration,
}

impl SettleTicket {
    pub fn pair(&self) -> &WordPair {
        &self.pair
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Result of pressing "Check" on the pairs board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// Nothing to check, or the board already has a verdict.
    Ignored,
    Mismatch,
    Matched(SettleTicket),
}

#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub token: String,
    pub highlight: Highlight,
    pub selected: bool,
}

/// Read-only snapshot of the match session.
#[derive(Debug, Clone, Serialize)]
pub struct PairsView {
    pub screen: ScreenId,
    pub session_id: Uuid,
    pub left: Vec<CardView>,
    pub right: Vec<CardView>,
    pub selected_left: Option<String>,
    pub selected_right: Option<String>,
    pub verdict: Verdict,
    pub message: String,
    pub button: ButtonLabel,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct PairsEngine {
    content: PairsContent,
    session: Uuid,
    pairs: Vec<WordPair>,
    selected_left: Option<String>,
    selected_right: Option<String>,
    highlight_left: HashMap<String, Highlight>,
    highlight_right: HashMap<String, Highlight>,
    verdict: Verdict,
    button: ButtonLabel,
    message: &'static str,
    completed: bool,
    pending: Option<WordPair>,
}

impl PairsEngine {
    pub fn new(content: PairsContent) -> Result<Self> {
        content.validate()?;

        let mut engine = Self {
            session: Uuid::new_v4(),
            pairs: content.pairs.clone(),
            content,
            selected_left: None,
            selected_right: None,
            highlight_left: HashMap::new(),
            highlight_right: HashMap::new(),
            verdict: Verdict::Unknown,
            button: ButtonLabel::Check,
            message: "",
            completed: false,
            pending: None,
        };
        engine.reset_selections();
        Ok(engine)
    }

    pub fn screen(&self) -> &ScreenId {
        &self.content.screen
    }

    pub fn content(&self) -> &PairsContent {
        &self.content
    }

    /// Pairs still on the board.
    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn button(&self) -> ButtonLabel {
        self.button
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn highlight(&self, side: Side, token: &str) -> Option<Highlight> {
        self.highlights(side).get(token).copied()
    }

    /// Start a new session over the full table.
    pub fn restart(&mut self) {
        self.session = Uuid::new_v4();
        self.pairs = self.content.pairs.clone();
        self.completed = false;
        self.pending = None;
        self.reset_selections();
        tracing::debug!(screen = %self.content.screen, session = %self.session, "match session started");
    }

    pub fn select(&mut self, side: Side, token: &str) -> bool {
        if self.completed || self.verdict.is_decided() {
            return false;
        }
        let on_board = self.pairs.iter().any(|p| match side {
            Side::Left => p.left == token,
            Side::Right => p.right == token,
        });
        if !on_board {
            tracing::debug!(screen = %self.content.screen, token, ?side, "ignoring unknown card");
            return false;
        }

        let (selected, highlights) = match side {
            Side::Left => (&mut self.selected_left, &mut self.highlight_left),
            Side::Right => (&mut self.selected_right, &mut self.highlight_right),
        };
        if let Some(prev) = selected.take() {
            highlights.insert(prev, Highlight::Neutral);
        }
        highlights.insert(token.to_string(), Highlight::Pending);
        *selected = Some(token.to_string());
        true
    }

    pub fn select_left(&mut self, token: &str) -> bool {
        self.select(Side::Left, token)
    }

    pub fn select_right(&mut self, token: &str) -> bool {
        self.select(Side::Right, token)
    }

    /// Judge the selected left/right tokens against the remaining pairs.
    pub fn check(&mut self) -> CheckResult {
        if self.completed || self.verdict.is_decided() {
            return CheckResult::Ignored;
        }
        let (Some(left), Some(right)) = (self.selected_left.clone(), self.selected_right.clone())
        else {
            return CheckResult::Ignored;
        };

        let matched = self
            .pairs
            .iter()
            .find(|p| p.left == left && p.right == right)
            .cloned();
        let verdict = Verdict::from_match(matched.is_some());

        self.verdict = verdict;
        self.message = verdict.message();
        self.highlight_left.insert(left, verdict.highlight());
        self.highlight_right.insert(right, verdict.highlight());

        tracing::debug!(screen = %self.content.screen, ?verdict, "pair checked");

        match matched {
            Some(pair) => {
                self.button = ButtonLabel::Continue;
                self.pending = Some(pair.clone());
                CheckResult::Matched(SettleTicket {
                    session: self.session,
                    pair,
                    delay: SETTLE_DELAY,
                })
            }
            None => {
                self.button = ButtonLabel::Retry;
                CheckResult::Mismatch
            }
        }
    }

    /// Remove the matched pair named by the ticket.
    ///
    /// Returns false when the ticket is stale: another session, or the pair
    /// is no longer waiting for removal.
    pub fn settle(&mut self, ticket: &SettleTicket) -> bool {
        if ticket.session != self.session || self.pending.as_ref() != Some(&ticket.pair) {
            tracing::debug!(screen = %self.content.screen, "dropping stale settle");
            return false;
        }
        self.apply_settle();
        true
    }

    fn apply_settle(&mut self) {
        let Some(pair) = self.pending.take() else {
            return;
        };
        self.pairs.retain(|p| p != &pair);

        // Completion is judged on the collection after removal.
        if self.pairs.is_empty() {
            self.completed = true;
            self.selected_left = None;
            self.selected_right = None;
            self.message = MESSAGE_COMPLETED;
            self.button = ButtonLabel::Continue;
            tracing::info!(screen = %self.content.screen, session = %self.session, "all pairs matched");
        } else {
            self.reset_selections();
        }
    }

    /// Handle the "Continue"/"Retry" button.
    ///
    /// A completed session navigates on and starts over. A pending match is
    /// settled immediately. A mismatch is cleared so the user can try again.
    pub fn advance(&mut self) -> Vec<Effect> {
        if self.completed {
            let navigate = Effect::Navigate(self.content.next.clone());
            self.restart();
            return vec![navigate];
        }
        if self.pending.is_some() {
            self.apply_settle();
        } else if self.verdict == Verdict::Incorrect {
            self.reset_selections();
        }
        Vec::new()
    }

    pub fn snapshot(&self) -> PairsView {
        let column = |side: Side| -> Vec<CardView> {
            let selected = match side {
                Side::Left => self.selected_left.as_deref(),
                Side::Right => self.selected_right.as_deref(),
            };
            self.pairs
                .iter()
                .map(|p| {
                    let token = match side {
                        Side::Left => &p.left,
                        Side::Right => &p.right,
                    };
                    CardView {
                        token: token.clone(),
                        highlight: self.highlight(side, token).unwrap_or_default(),
                        selected: selected == Some(token.as_str()),
                    }
                })
                .collect()
        };

        PairsView {
            screen: self.content.screen.clone(),
            session_id: self.session,
            left: column(Side::Left),
            right: column(Side::Right),
            selected_left: self.selected_left.clone(),
            selected_right: self.selected_right.clone(),
            verdict: self.verdict,
            message: self.message.to_string(),
            button: self.button,
            completed: self.completed,
        }
    }

    fn highlights(&self, side: Side) -> &HashMap<String, Highlight> {
        match side {
            Side::Left => &self.highlight_left,
            Side::Right => &self.highlight_right,
        }
    }

    fn reset_selections(&mut self) {
        self.selected_left = None;
        self.selected_right = None;
        self.highlight_left = self
            .content
            .pairs
            .iter()
            .map(|p| (p.left.clone(), Highlight::Neutral))
            .collect();
        self.highlight_right = self
            .content
            .pairs
            .iter()
            .map(|p| (p.right.clone(), Highlight::Neutral))
            .collect();
        self.verdict = Verdict::Unknown;
        self.button = ButtonLabel::Check;
        self.message = "";
    }
}
