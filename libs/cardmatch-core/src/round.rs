//! Single-select engine: hear a cue, pick one card, check it.

use crate::content::{Prompt, PromptOrder, SingleSelectContent};
use crate::error::Result;
use crate::types::{ButtonLabel, CueRef, Effect, Highlight, ScreenId, Verdict};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

/// Mutable state of one play-check-advance cycle.
#[derive(Debug, Clone)]
struct Round {
    id: Uuid,
    prompt: usize,
    highlights: Vec<Highlight>,
    selected: Option<usize>,
    verdict: Verdict,
    button: ButtonLabel,
}

impl Round {
    fn new(prompt: usize, choices: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt,
            highlights: vec![Highlight::Neutral; choices],
            selected: None,
            verdict: Verdict::Unknown,
            button: ButtonLabel::Check,
        }
    }

    /// Clear selection and verdict but keep the prompt.
    fn soft_reset(&mut self) {
        self.highlights.fill(Highlight::Neutral);
        self.selected = None;
        self.verdict = Verdict::Unknown;
        self.button = ButtonLabel::Check;
    }
}

/// Render state of a single card.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceView {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub highlight: Highlight,
    pub selected: bool,
}

/// Read-only snapshot the shell renders.
#[derive(Debug, Clone, Serialize)]
pub struct RoundView {
    pub screen: ScreenId,
    pub round_id: Uuid,
    pub prompt: String,
    pub cue: CueRef,
    pub choices: Vec<ChoiceView>,
    pub selected: Option<String>,
    pub verdict: Verdict,
    pub message: String,
    pub button: ButtonLabel,
    pub locked: bool,
}

/// Engine behind the voicelearn, letter and mala screens.
#[derive(Debug, Clone)]
pub struct SelectEngine {
    content: SingleSelectContent,
    round: Round,
}

impl SelectEngine {
    /// Build an engine over a validated table.
    ///
    /// The first round points at the fixed prompt, or at the first prompt for
    /// randomized screens; call [`SelectEngine::next_round`] on mount to draw
    /// and play.
    pub fn new(content: SingleSelectContent) -> Result<Self> {
        content.validate()?;

        let round = Round::new(content.default_index(), content.prompts.len());

        Ok(Self { content, round })
    }

    pub fn screen(&self) -> &ScreenId {
        &self.content.screen
    }

    pub fn content(&self) -> &SingleSelectContent {
        &self.content
    }

    pub fn prompt(&self) -> &Prompt {
        &self.content.prompts[self.round.prompt]
    }

    pub fn verdict(&self) -> Verdict {
        self.round.verdict
    }

    pub fn button(&self) -> ButtonLabel {
        self.round.button
    }

    pub fn round_id(&self) -> Uuid {
        self.round.id
    }

    pub fn selected(&self) -> Option<&str> {
        self.round
            .selected
            .map(|idx| self.content.prompts[idx].answer.as_str())
    }

    pub fn highlight(&self, token: &str) -> Option<Highlight> {
        self.choice_index(token).map(|idx| self.round.highlights[idx])
    }

    /// Start a fresh round on the given prompt.
    ///
    /// Unknown keys are ignored.
    pub fn start_round(&mut self, key: &str) -> Option<Effect> {
        let idx = self.content.prompt_index(key)?;
        Some(self.start_round_at(idx))
    }

    /// Start a fresh round on the prompt this screen's order selects.
    ///
    /// Fixed screens always return to their configured prompt.
    pub fn next_round<R: Rng>(&mut self, rng: &mut R) -> Effect {
        let idx = match &self.content.order {
            PromptOrder::Fixed(_) => self.content.default_index(),
            PromptOrder::Random => rng.gen_range(0..self.content.prompts.len()),
        };
        self.start_round_at(idx)
    }

    fn start_round_at(&mut self, idx: usize) -> Effect {
        self.round = Round::new(idx, self.content.prompts.len());
        let prompt = self.prompt();
        tracing::debug!(
            screen = %self.content.screen,
            prompt = %prompt.key,
            round = %self.round.id,
            "round started"
        );
        Effect::PlayCue(prompt.cue.clone())
    }

    /// Record the user's pick.
    ///
    /// Returns false when the token is not on the board or the screen locks
    /// choices after checking.
    pub fn select_choice(&mut self, token: &str) -> bool {
        let Some(idx) = self.choice_index(token) else {
            tracing::debug!(screen = %self.content.screen, token, "ignoring unknown choice");
            return false;
        };
        if self.is_locked() {
            return false;
        }

        if !self.round.verdict.is_decided() {
            if let Some(prev) = self.round.selected {
                self.round.highlights[prev] = Highlight::Neutral;
            }
            self.round.highlights[idx] = Highlight::Pending;
        }
        self.round.selected = Some(idx);
        true
    }

    /// Judge the current selection.
    ///
    /// No-op without a selection or once the round has a verdict.
    pub fn check(&mut self) -> Option<Verdict> {
        if self.round.verdict.is_decided() {
            return None;
        }
        let selected = self.round.selected?;

        let correct = selected == self.round.prompt;
        let verdict = Verdict::from_match(correct);
        self.round.verdict = verdict;
        self.round.highlights[selected] = verdict.highlight();
        self.round.button = if correct {
            ButtonLabel::Continue
        } else {
            self.content.retry_label
        };

        tracing::debug!(
            screen = %self.content.screen,
            round = %self.round.id,
            ?verdict,
            "round checked"
        );
        Some(verdict)
    }

    /// Move on after a verdict.
    ///
    /// Correct: navigate to the next screen and start a fresh round.
    /// Incorrect: soft reset on the same prompt. Undecided: nothing.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> Vec<Effect> {
        match self.round.verdict {
            Verdict::Unknown => Vec::new(),
            Verdict::Incorrect => {
                self.retry();
                Vec::new()
            }
            Verdict::Correct => {
                let navigate = Effect::Navigate(self.content.next.clone());
                let cue = self.next_round(rng);
                vec![navigate, cue]
            }
        }
    }

    /// Clear the verdict and selection without drawing a new prompt.
    pub fn retry(&mut self) {
        self.round.soft_reset();
        tracing::debug!(screen = %self.content.screen, round = %self.round.id, "round retried");
    }

    /// Play the current prompt's cue again.
    pub fn replay_cue(&self) -> Effect {
        Effect::PlayCue(self.prompt().cue.clone())
    }

    pub fn snapshot(&self) -> RoundView {
        let choices = self
            .content
            .prompts
            .iter()
            .zip(&self.round.highlights)
            .enumerate()
            .map(|(idx, (prompt, highlight))| ChoiceView {
                token: prompt.answer.clone(),
                image: prompt.image.clone(),
                highlight: *highlight,
                selected: self.round.selected == Some(idx),
            })
            .collect();

        RoundView {
            screen: self.content.screen.clone(),
            round_id: self.round.id,
            prompt: self.prompt().key.clone(),
            cue: self.prompt().cue.clone(),
            choices,
            selected: self.selected().map(str::to_string),
            verdict: self.round.verdict,
            message: self.round.verdict.message().to_string(),
            button: self.round.button,
            locked: self.is_locked(),
        }
    }

    fn is_locked(&self) -> bool {
        self.content.selection_lock && self.round.verdict.is_decided()
    }

    fn choice_index(&self, token: &str) -> Option<usize> {
        self.content.prompts.iter().position(|p| p.answer == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn letter() -> SelectEngine {
        let mut engine = SelectEngine::new(builtin::letter()).unwrap();
        engine.next_round(&mut rng());
        engine
    }

    #[test]
    fn test_start_round_plays_cue() {
        let mut engine = SelectEngine::new(builtin::letter()).unwrap();
        let effect = engine.next_round(&mut rng());
        assert_eq!(effect, Effect::PlayCue(CueRef::new("sounds/la.mp3")));
        assert_eq!(engine.prompt().key, "la");
        assert_eq!(engine.button(), ButtonLabel::Check);
        assert_eq!(engine.verdict(), Verdict::Unknown);
    }

    #[test]
    fn test_start_round_unknown_key_ignored() {
        let mut engine = letter();
        let before = engine.round_id();
        assert!(engine.start_round("nope").is_none());
        assert_eq!(engine.round_id(), before);
    }

    #[test]
    fn test_check_without_selection_is_noop() {
        for prompt in builtin::voicelearn().prompts {
            let mut engine = SelectEngine::new(builtin::voicelearn()).unwrap();
            engine.start_round(&prompt.key).unwrap();
            assert_eq!(engine.check(), None);
            assert_eq!(engine.verdict(), Verdict::Unknown);
            assert_eq!(engine.button(), ButtonLabel::Check);
        }
    }

    #[test]
    fn test_correct_answer() {
        for prompt in builtin::voicelearn().prompts {
            let mut engine = SelectEngine::new(builtin::voicelearn()).unwrap();
            engine.start_round(&prompt.key).unwrap();
            assert!(engine.select_choice(&prompt.answer));
            assert_eq!(engine.check(), Some(Verdict::Correct));
            assert_eq!(engine.button(), ButtonLabel::Continue);
            assert_eq!(engine.highlight(&prompt.answer), Some(Highlight::Correct));
            assert_eq!(engine.snapshot().message, "Well Done!");
        }
    }

    #[test]
    fn test_incorrect_answer_keeps_prompt() {
        let mut engine = letter();
        let round = engine.round_id();
        assert!(engine.select_choice("क"));
        assert_eq!(engine.check(), Some(Verdict::Incorrect));
        assert_eq!(engine.button(), ButtonLabel::Retry);
        assert_eq!(engine.highlight("क"), Some(Highlight::Incorrect));
        assert_eq!(engine.prompt().key, "la");
        assert_eq!(engine.round_id(), round);
    }

    #[test]
    fn test_incorrect_label_per_screen() {
        let mut engine = SelectEngine::new(builtin::voicelearn()).unwrap();
        engine.start_round("apt").unwrap();
        engine.select_choice("Bag");
        engine.check();
        assert_eq!(engine.button(), ButtonLabel::TryAgain);
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut engine = letter();
        engine.select_choice("ख");
        engine.check();
        let before = engine.snapshot();

        assert_eq!(engine.check(), None);
        let after = engine.snapshot();
        assert_eq!(after.button, before.button);
        assert_eq!(after.verdict, before.verdict);
        let highlights = |v: &RoundView| v.choices.iter().map(|c| c.highlight).collect::<Vec<_>>();
        assert_eq!(highlights(&after), highlights(&before));
    }

    #[test]
    fn test_unknown_token_ignored() {
        let mut engine = letter();
        assert!(!engine.select_choice("not a card"));
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.check(), None);
    }

    #[test]
    fn test_selection_marks_pending() {
        let mut engine = letter();
        engine.select_choice("क");
        engine.select_choice("ख");
        assert_eq!(engine.highlight("क"), Some(Highlight::Neutral));
        assert_eq!(engine.highlight("ख"), Some(Highlight::Pending));
        assert_eq!(engine.selected(), Some("ख"));
    }

    #[test]
    fn test_letter_locks_after_check() {
        let mut engine = letter();
        engine.select_choice("क");
        engine.check();
        assert!(!engine.select_choice("लः"));
        assert_eq!(engine.selected(), Some("क"));
        assert!(engine.snapshot().locked);
    }

    #[test]
    fn test_unlocked_screen_accepts_selection_after_check() {
        let mut engine = SelectEngine::new(builtin::mala()).unwrap();
        engine.next_round(&mut rng());
        engine.select_choice("क");
        engine.check();
        assert!(engine.select_choice("ख"));
        assert_eq!(engine.verdict(), Verdict::Incorrect);
        assert_eq!(engine.highlight("क"), Some(Highlight::Incorrect));
        assert_eq!(engine.highlight("ख"), Some(Highlight::Neutral));
    }

    #[test]
    fn test_advance_before_check_is_noop() {
        let mut engine = letter();
        engine.select_choice("लः");
        assert!(engine.advance(&mut rng()).is_empty());
        assert_eq!(engine.selected(), Some("लः"));
    }

    #[test]
    fn test_advance_after_incorrect_soft_resets() {
        let mut engine = SelectEngine::new(builtin::voicelearn()).unwrap();
        engine.start_round("money").unwrap();
        let round = engine.round_id();
        engine.select_choice("Dog");
        engine.check();

        assert!(engine.advance(&mut rng()).is_empty());
        assert_eq!(engine.prompt().key, "money");
        assert_eq!(engine.round_id(), round);
        assert_eq!(engine.verdict(), Verdict::Unknown);
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.button(), ButtonLabel::Check);
        assert_eq!(engine.highlight("Dog"), Some(Highlight::Neutral));
    }

    #[test]
    fn test_fixed_screen_returns_to_its_prompt() {
        let mut engine = letter();
        engine.start_round("bag");
        engine.select_choice("क");
        assert_eq!(engine.check(), Some(Verdict::Correct));

        let effects = engine.advance(&mut rng());
        assert_eq!(
            effects,
            vec![
                Effect::Navigate(ScreenId::new("wordmatch")),
                Effect::PlayCue(CueRef::new("sounds/la.mp3")),
            ]
        );
        assert_eq!(engine.prompt().key, "la");

        engine.start_round("money");
        engine.next_round(&mut rng());
        assert_eq!(engine.prompt().key, "la");
    }

    #[test]
    fn test_advance_after_correct_starts_fresh_round() {
        let mut engine = letter();
        engine.select_choice("क");
        engine.check();
        engine.retry();
        engine.select_choice("लः");
        engine.check();
        let round = engine.round_id();

        let effects = engine.advance(&mut rng());
        assert_eq!(
            effects,
            vec![
                Effect::Navigate(ScreenId::new("wordmatch")),
                Effect::PlayCue(CueRef::new("sounds/la.mp3")),
            ]
        );
        assert_ne!(engine.round_id(), round);
        assert_eq!(engine.verdict(), Verdict::Unknown);
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.button(), ButtonLabel::Check);
        assert!(engine
            .snapshot()
            .choices
            .iter()
            .all(|c| c.highlight == Highlight::Neutral && !c.selected));
    }

    #[test]
    fn test_random_screen_draws_from_table() {
        let mut engine = SelectEngine::new(builtin::voicelearn()).unwrap();
        let keys: Vec<String> = builtin::voicelearn()
            .prompts
            .into_iter()
            .map(|p| p.key)
            .collect();
        let mut rng = rng();
        for _ in 0..20 {
            engine.next_round(&mut rng);
            assert!(keys.contains(&engine.prompt().key));
        }
    }

    #[test]
    fn test_replay_cue_keeps_round() {
        let mut engine = letter();
        engine.select_choice("क");
        let round = engine.round_id();
        assert_eq!(
            engine.replay_cue(),
            Effect::PlayCue(CueRef::new("sounds/la.mp3"))
        );
        assert_eq!(engine.round_id(), round);
        assert_eq!(engine.selected(), Some("क"));
    }
}
