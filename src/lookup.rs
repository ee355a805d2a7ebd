//! Lookup capability the selector draws short prompts from

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

use crate::error::{Result, RiddleError};
use crate::types::{
    Insert, LongPrompt, MatchPolicy, NewLongPrompt, NewShortPrompt, PromptId, ShortPrompt,
};

/// Predicate "field `answer` contains `letter`"
#[derive(Debug, Clone)]
pub struct LetterPattern {
    letter: char,
    policy: MatchPolicy,
    regex: Regex,
}

impl LetterPattern {
    pub fn new(letter: char, policy: MatchPolicy) -> Result<Self> {
        let regex = RegexBuilder::new(&regex::escape(&letter.to_string()))
            .case_insensitive(policy == MatchPolicy::CaseInsensitive)
            .build()
            .map_err(|e| RiddleError::InvalidInput(format!("letter '{}': {}", letter, e)))?;
        Ok(Self {
            letter,
            policy,
            regex,
        })
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Regex source, suitable for a document-store `$regex` filter
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    pub fn matches(&self, answer: &str) -> bool {
        self.regex.is_match(answer)
    }

    /// Character index of the first occurrence of the letter in `answer`
    pub fn position_in(&self, answer: &str) -> Option<usize> {
        let m = self.regex.find(answer)?;
        Some(answer[..m.start()].chars().count())
    }
}

/// Source of short prompts for selection
#[async_trait]
pub trait PromptLookup: Send + Sync {
    /// Pick one short prompt uniformly at random among those matching `pattern`
    /// whose id is not in `excluded`. `Ok(None)` when no such prompt exists.
    async fn find_one_random_matching(
        &self,
        pattern: &LetterPattern,
        excluded: &HashSet<PromptId>,
    ) -> Result<Option<ShortPrompt>>;
}

/// Full prompt store: lookup plus creation and daily puzzle access
#[async_trait]
pub trait PromptStore: PromptLookup {
    /// Insert unless a long prompt with the same text exists
    async fn insert_long_prompt(&self, prompt: NewLongPrompt) -> Result<Insert<LongPrompt>>;

    /// Insert unless a short prompt with the same text exists
    async fn insert_short_prompt(&self, prompt: NewShortPrompt) -> Result<Insert<ShortPrompt>>;

    /// Long prompt scheduled for `date`
    async fn long_prompt_for_date(&self, date: NaiveDate) -> Result<Option<LongPrompt>>;
}
