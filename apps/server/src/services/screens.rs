//! Per-screen engine instances and effect handling.
//!
//! Every screen owns its own engine behind a `tokio::sync::Mutex`. User
//! actions and settle timers both go through that lock, so transitions on a
//! screen never interleave.

use std::collections::BTreeMap;
use std::sync::Arc;

use cardmatch_core::{
    ContentError, Effect, PairsContent, PairsEngine, ScreenId, SelectEngine, SettleTicket,
    SingleSelectContent,
};
use tokio::sync::Mutex;

use crate::models::{ScreenSummary, ScreenVariant, ScreenView};
use crate::services::cue::ShellCueController;

/// Engine behind one screen.
#[derive(Debug)]
pub enum Screen {
    Single(SelectEngine),
    Pairs(PairsEngine),
}

impl Screen {
    pub fn id(&self) -> &ScreenId {
        match self {
            Screen::Single(engine) => engine.screen(),
            Screen::Pairs(engine) => engine.screen(),
        }
    }

    pub fn view(&self) -> ScreenView {
        match self {
            Screen::Single(engine) => ScreenView::Single(engine.snapshot()),
            Screen::Pairs(engine) => ScreenView::Pairs(engine.snapshot()),
        }
    }

    pub fn summary(&self) -> ScreenSummary {
        match self {
            Screen::Single(engine) => ScreenSummary {
                id: engine.screen().clone(),
                variant: ScreenVariant::Single,
                next: engine.content().next.clone(),
            },
            Screen::Pairs(engine) => ScreenSummary {
                id: engine.screen().clone(),
                variant: ScreenVariant::Pairs,
                next: engine.content().next.clone(),
            },
        }
    }
}

pub type ScreenHandle = Arc<Mutex<Screen>>;

/// All engine-backed screens, keyed by id.
#[derive(Debug, Default)]
pub struct ScreenRegistry {
    screens: BTreeMap<ScreenId, ScreenHandle>,
}

impl ScreenRegistry {
    pub fn from_content(
        single: Vec<SingleSelectContent>,
        pairs: Vec<PairsContent>,
    ) -> Result<Self, ContentError> {
        let mut registry = Self::default();
        for content in single {
            registry.insert(Screen::Single(SelectEngine::new(content)?));
        }
        for content in pairs {
            registry.insert(Screen::Pairs(PairsEngine::new(content)?));
        }
        Ok(registry)
    }

    fn insert(&mut self, screen: Screen) {
        let id = screen.id().clone();
        self.screens.insert(id, Arc::new(Mutex::new(screen)));
    }

    pub fn get(&self, id: &str) -> Option<ScreenHandle> {
        self.screens.get(&ScreenId::new(id)).cloned()
    }

    pub async fn summaries(&self) -> Vec<ScreenSummary> {
        let mut summaries = Vec::with_capacity(self.screens.len());
        for screen in self.screens.values() {
            summaries.push(screen.lock().await.summary());
        }
        summaries
    }
}

/// Apply the effects `screen` emitted, in order.
///
/// Cues are played through the shared controller on behalf of `screen`; the
/// last navigation target is returned for the front-end to route to.
pub async fn apply_effects(
    cues: &ShellCueController,
    screen: &ScreenId,
    effects: Vec<Effect>,
) -> Option<ScreenId> {
    let mut navigate = None;
    for effect in effects {
        match effect {
            Effect::PlayCue(cue) => {
                let outcome = cues.play(screen, &cue).await;
                tracing::debug!(%screen, %cue, ?outcome, "cue requested");
            }
            Effect::Navigate(target) => {
                tracing::info!("Navigating to {}", target);
                navigate = Some(target);
            }
        }
    }
    navigate
}

/// Remove a matched pair once its display delay has passed.
pub fn schedule_settle(screen: ScreenHandle, ticket: SettleTicket) {
    tokio::spawn(async move {
        tokio::time::sleep(ticket.delay()).await;
        let mut screen = screen.lock().await;
        if let Screen::Pairs(engine) = &mut *screen {
            let applied = engine.settle(&ticket);
            tracing::debug!(pair = %ticket.pair().left, applied, "settle timer fired");
        }
    });
}
