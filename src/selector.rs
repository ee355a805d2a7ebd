//! Letter-to-prompt selection
//!
//! Picks one distinct short prompt per letter of a puzzle answer. Rounds run
//! strictly one after another: each lookup excludes every prompt chosen by the
//! rounds before it, so no prompt is ever handed out twice in one run.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{Result, RiddleError};
use crate::lookup::{LetterPattern, PromptLookup};
use crate::types::{PromptId, PromptView, SelectionResult, SelectorConfig, ShortPrompt};

/// Uniform random permutation of `letters` (Fisher-Yates)
pub fn shuffle<R: Rng + ?Sized>(letters: &[char], rng: &mut R) -> Vec<char> {
    let mut shuffled = letters.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Selects short prompts for a letter sequence from a lookup
pub struct PromptSelector<L: ?Sized> {
    lookup: Arc<L>,
    config: SelectorConfig,
}

impl<L: ?Sized> Clone for PromptSelector<L> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            config: self.config.clone(),
        }
    }
}

impl<L: PromptLookup + ?Sized> PromptSelector<L> {
    pub fn new(lookup: Arc<L>, config: SelectorConfig) -> Self {
        Self { lookup, config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Draw one prompt containing `letter` whose id is not in `excluded`
    pub async fn select_for_letter(
        &self,
        letter: char,
        excluded: &HashSet<PromptId>,
    ) -> Result<Option<ShortPrompt>> {
        let pattern = LetterPattern::new(letter, self.config.match_policy)?;
        self.lookup
            .find_one_random_matching(&pattern, excluded)
            .await
    }

    /// Resolve every letter, in order, to a distinct prompt.
    ///
    /// Fails on the first letter with no unused match; nothing partial is returned.
    pub async fn select_all(&self, letters: &[char]) -> Result<SelectionResult> {
        if letters.len() > self.config.max_letters {
            return Err(RiddleError::InvalidInput(format!(
                "{} letters given, at most {} allowed",
                letters.len(),
                self.config.max_letters
            )));
        }

        let mut excluded: HashSet<PromptId> = HashSet::with_capacity(letters.len());
        let mut result = SelectionResult::new();

        for (position, &letter) in letters.iter().enumerate() {
            let Some(prompt) = self.select_for_letter(letter, &excluded).await? else {
                warn!(
                    "No unused short prompt for '{}' at position {} ({} already chosen)",
                    letter,
                    position,
                    excluded.len()
                );
                return Err(RiddleError::ExhaustedPool { letter, position });
            };

            let pattern = LetterPattern::new(letter, self.config.match_policy)?;
            let Some(index) = pattern.position_in(&prompt.answer) else {
                return Err(RiddleError::LookupUnavailable(format!(
                    "lookup returned prompt {} whose answer does not contain '{}'",
                    prompt.id, letter
                )));
            };
            if !excluded.insert(prompt.id) {
                return Err(RiddleError::LookupUnavailable(format!(
                    "lookup returned already selected prompt {}",
                    prompt.id
                )));
            }

            debug!(
                "Round {}: '{}' -> {} ({:?}, index {})",
                position + 1,
                letter,
                prompt.id,
                prompt.answer,
                index
            );
            result.insert(letter, prompt.id, PromptView::new(&prompt, index));
        }

        if result.len() != letters.len() {
            return Err(RiddleError::LookupUnavailable(format!(
                "resolved {} of {} letters",
                result.len(),
                letters.len()
            )));
        }
        Ok(result)
    }

    /// Shuffle `letters`, then select a prompt for each
    pub async fn select_shuffled(&self, letters: &[char]) -> Result<SelectionResult> {
        let shuffled = {
            let mut rng = rand::thread_rng();
            shuffle(letters, &mut rng)
        };
        self.select_all(&shuffled).await
    }
}
