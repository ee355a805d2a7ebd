use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a stored prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(Uuid);

impl PromptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PromptId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PromptId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Daily riddle. Its `answer` is the word whose letters drive selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongPrompt {
    pub id: PromptId,
    pub text: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Per-letter clue. Its `answer` contains the letter(s) it clues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortPrompt {
    pub id: PromptId,
    pub text: String,
    pub answer: String,
}

/// Creation payload for a long prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLongPrompt {
    pub text: String,
    pub answer: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl NewLongPrompt {
    pub fn new(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            answer: answer.into(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Assign a fresh identifier
    pub fn into_record(self) -> LongPrompt {
        LongPrompt {
            id: PromptId::new(),
            text: self.text,
            answer: self.answer,
            date: self.date,
        }
    }
}

/// Creation payload for a short prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShortPrompt {
    pub text: String,
    pub answer: String,
}

impl NewShortPrompt {
    pub fn new(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            answer: answer.into(),
        }
    }

    /// Assign a fresh identifier
    pub fn into_record(self) -> ShortPrompt {
        ShortPrompt {
            id: PromptId::new(),
            text: self.text,
            answer: self.answer,
        }
    }
}

/// Outcome of an insert-if-absent call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert<T> {
    Created(T),
    AlreadyExists,
}

/// Client-facing state of one clue in a puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptView {
    pub short_prompt_text: String,
    pub answer: String,
    pub active_letter_index: usize,
    pub active_guess: String,
    pub guesses_submitted: u32,
    pub max_length: usize,
    pub locked: bool,
}

impl PromptView {
    /// Fresh, unplayed view of `prompt` with the given letter highlighted
    pub fn new(prompt: &ShortPrompt, active_letter_index: usize) -> Self {
        Self {
            short_prompt_text: prompt.text.clone(),
            answer: prompt.answer.clone(),
            active_letter_index,
            active_guess: String::new(),
            guesses_submitted: 0,
            max_length: prompt.answer.chars().count(),
            locked: false,
        }
    }
}

/// One resolved letter of a selection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub letter: char,
    pub prompt_id: PromptId,
    pub view: PromptView,
}

/// Prompts chosen for a letter sequence, in selection order.
///
/// Serializes as a JSON object keyed by prompt id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    selections: Vec<Selection>,
    ids: HashSet<PromptId>,
}

impl SelectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection. Returns false, leaving the result unchanged, if the id is already present.
    pub fn insert(&mut self, letter: char, prompt_id: PromptId, view: PromptView) -> bool {
        if !self.ids.insert(prompt_id) {
            return false;
        }
        self.selections.push(Selection {
            letter,
            prompt_id,
            view,
        });
        true
    }

    pub fn contains(&self, prompt_id: &PromptId) -> bool {
        self.ids.contains(prompt_id)
    }

    pub fn get(&self, prompt_id: &PromptId) -> Option<&PromptView> {
        self.selections
            .iter()
            .find(|s| &s.prompt_id == prompt_id)
            .map(|s| &s.view)
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.selections.iter()
    }

    /// Letters in the order they were resolved
    pub fn letters(&self) -> Vec<char> {
        self.selections.iter().map(|s| s.letter).collect()
    }
}

impl Serialize for SelectionResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.selections.len()))?;
        for selection in &self.selections {
            map.serialize_entry(&selection.prompt_id, &selection.view)?;
        }
        map.end()
    }
}

/// How a letter is compared against a short prompt's answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    CaseSensitive,
    #[default]
    CaseInsensitive,
}

/// Configuration for the prompt selector
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub match_policy: MatchPolicy,
    /// Longest letter sequence accepted for one run
    pub max_letters: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicy::default(),
            max_letters: 64,
        }
    }
}

impl SelectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    pub fn with_max_letters(mut self, n: usize) -> Self {
        self.max_letters = n;
        self
    }
}
