//! Static content tables for each screen.
//!
//! A single-select screen is a list of prompts; each prompt contributes one
//! card whose token is the prompt's answer. A pairs screen is an ordered list
//! of word pairs.

use crate::error::{ContentError, Result};
use crate::types::{ButtonLabel, CueRef, ScreenId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Delay between a successful pair check and the pair leaving the board.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// One audio prompt and the answer it expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub key: String,
    pub cue: CueRef,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Prompt {
    pub fn new(key: &str, answer: &str) -> Self {
        Self {
            key: key.to_string(),
            cue: CueRef::new(format!("sounds/{key}.mp3")),
            answer: answer.to_string(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(format!("images/{image}.png"));
        self
    }
}

/// How the next prompt is chosen when a round starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum PromptOrder {
    /// Always the same prompt.
    Fixed(String),
    /// Uniform draw over the whole table.
    Random,
}

/// Content and behavior of a single-select screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleSelectContent {
    pub screen: ScreenId,
    pub prompts: Vec<Prompt>,
    pub order: PromptOrder,
    /// Whether choices are locked once the round has been checked.
    pub selection_lock: bool,
    /// Button label shown after a wrong answer.
    pub retry_label: ButtonLabel,
    pub next: ScreenId,
}

impl SingleSelectContent {
    /// Check the table for the invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        let screen = self.screen.to_string();
        if self.prompts.is_empty() {
            return Err(ContentError::EmptyTable { screen });
        }

        let mut keys = HashSet::new();
        let mut answers = HashSet::new();
        for prompt in &self.prompts {
            if !keys.insert(prompt.key.as_str()) {
                return Err(ContentError::DuplicatePrompt {
                    screen,
                    key: prompt.key.clone(),
                });
            }
            if !answers.insert(prompt.answer.as_str()) {
                return Err(ContentError::DuplicateAnswer {
                    screen,
                    token: prompt.answer.clone(),
                });
            }
        }

        if let PromptOrder::Fixed(key) = &self.order {
            if !keys.contains(key.as_str()) {
                return Err(ContentError::UnknownFixedPrompt {
                    screen,
                    key: key.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn prompt_index(&self, key: &str) -> Option<usize> {
        self.prompts.iter().position(|p| p.key == key)
    }

    /// Prompt a round starts on when nothing else picks one: the fixed key,
    /// or the first prompt for randomized screens.
    pub fn default_index(&self) -> usize {
        match &self.order {
            PromptOrder::Fixed(key) => self.prompt_index(key).unwrap_or(0),
            PromptOrder::Random => 0,
        }
    }
}

/// One left/right pair of the matching game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordPair {
    pub left: String,
    pub right: String,
}

impl WordPair {
    pub fn new(left: &str, right: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// Content of a pairs-matching screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairsContent {
    pub screen: ScreenId,
    pub pairs: Vec<WordPair>,
    pub next: ScreenId,
}

impl PairsContent {
    pub fn validate(&self) -> Result<()> {
        let screen = self.screen.to_string();
        if self.pairs.is_empty() {
            return Err(ContentError::EmptyTable { screen });
        }

        let mut lefts = HashSet::new();
        let mut rights = HashSet::new();
        for pair in &self.pairs {
            if !lefts.insert(pair.left.as_str()) {
                return Err(ContentError::DuplicatePairToken {
                    screen,
                    side: "left",
                    token: pair.left.clone(),
                });
            }
            if !rights.insert(pair.right.as_str()) {
                return Err(ContentError::DuplicatePairToken {
                    screen,
                    side: "right",
                    token: pair.right.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Built-in tables for the app's screens.
pub mod builtin {
    use super::*;

    /// Listen and pick the picture; the prompt is drawn at random.
    pub fn voicelearn() -> SingleSelectContent {
        SingleSelectContent {
            screen: ScreenId::new("voicelearn"),
            prompts: vec![
                Prompt::new("apt", "Dog").with_image("apt"),
                Prompt::new("bag", "Bag").with_image("bag"),
                Prompt::new("money", "Money").with_image("money"),
                Prompt::new("sujan", "Sujan").with_image("person"),
            ],
            order: PromptOrder::Random,
            selection_lock: false,
            retry_label: ButtonLabel::TryAgain,
            next: ScreenId::new("letter"),
        }
    }

    /// Letter recognition; choices are locked after checking.
    pub fn letter() -> SingleSelectContent {
        SingleSelectContent {
            screen: ScreenId::new("letter"),
            prompts: vec![
                Prompt::new("la", "लः").with_image("la"),
                Prompt::new("bag", "क").with_image("bag"),
                Prompt::new("money", "ख").with_image("money"),
                Prompt::new("sujan", "घ").with_image("person"),
            ],
            order: PromptOrder::Fixed("la".to_string()),
            selection_lock: true,
            retry_label: ButtonLabel::Retry,
            next: ScreenId::new("wordmatch"),
        }
    }

    pub fn mala() -> SingleSelectContent {
        SingleSelectContent {
            screen: ScreenId::new("mala"),
            prompts: vec![
                Prompt::new("mala", "माल"),
                Prompt::new("bag", "क"),
                Prompt::new("money", "ख"),
                Prompt::new("sujan", "घ"),
            ],
            order: PromptOrder::Fixed("mala".to_string()),
            selection_lock: false,
            retry_label: ButtonLabel::Retry,
            next: ScreenId::new("index"),
        }
    }

    /// English to Newari word matching.
    pub fn wordmatch() -> PairsContent {
        PairsContent {
            screen: ScreenId::new("wordmatch"),
            pairs: vec![
                WordPair::new("Dog", "खिचा [khicā]"),
                WordPair::new("cloth", "काप [kāpa]"),
                WordPair::new("money", "𑐥𑐿𑐳𑐵"),
                WordPair::new("person", " मनू [manū]"),
            ],
            next: ScreenId::new("index"),
        }
    }

    pub fn single_select_screens() -> Vec<SingleSelectContent> {
        vec![voicelearn(), letter(), mala()]
    }

    pub fn pairs_screens() -> Vec<PairsContent> {
        vec![wordmatch()]
    }
}
