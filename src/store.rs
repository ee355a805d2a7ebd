//! In-process prompt store

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use crate::error::{Result, RiddleError};
use crate::lookup::{LetterPattern, PromptLookup, PromptStore};
use crate::types::{Insert, LongPrompt, NewLongPrompt, NewShortPrompt, PromptId, ShortPrompt};

/// Seed file contents
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub long_prompts: Vec<NewLongPrompt>,
    #[serde(default)]
    pub short_prompts: Vec<NewShortPrompt>,
}

#[derive(Default)]
struct Records {
    long_prompts: Vec<LongPrompt>,
    short_prompts: Vec<ShortPrompt>,
}

/// Prompt store held in memory, safe to share across requests
pub struct MemoryStore {
    records: RwLock<Records>,
    rng: Mutex<StdRng>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Store with reproducible sampling
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            records: RwLock::new(Records::default()),
            rng: Mutex::new(rng),
        }
    }

    /// Load prompts from a JSON seed file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let seed: SeedData = serde_json::from_str(&raw)?;
        let store = Self::new();
        store.seed(seed)?;
        Ok(store)
    }

    /// Insert seed data, skipping entries whose text already exists
    pub fn seed(&self, seed: SeedData) -> Result<usize> {
        let mut inserted = 0;
        for prompt in seed.long_prompts {
            if let Insert::Created(_) = self.insert_long(prompt)? {
                inserted += 1;
            }
        }
        for prompt in seed.short_prompts {
            if let Insert::Created(_) = self.insert_short(prompt)? {
                inserted += 1;
            }
        }
        tracing::debug!("Seeded {} prompts", inserted);
        Ok(inserted)
    }

    pub fn short_prompt_count(&self) -> Result<usize> {
        Ok(self.read()?.short_prompts.len())
    }

    pub fn long_prompt_count(&self) -> Result<usize> {
        Ok(self.read()?.long_prompts.len())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Records>> {
        self.records
            .read()
            .map_err(|_| RiddleError::LookupUnavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Records>> {
        self.records
            .write()
            .map_err(|_| RiddleError::LookupUnavailable("store lock poisoned".to_string()))
    }

    fn find_long_by_date(&self, date: NaiveDate) -> Result<Option<LongPrompt>> {
        Ok(self
            .read()?
            .long_prompts
            .iter()
            .find(|p| p.date == Some(date))
            .cloned())
    }

    fn insert_long(&self, prompt: NewLongPrompt) -> Result<Insert<LongPrompt>> {
        validate(&prompt.text, &prompt.answer)?;
        let mut records = self.write()?;
        if records.long_prompts.iter().any(|p| p.text == prompt.text) {
            return Ok(Insert::AlreadyExists);
        }
        let record = prompt.into_record();
        records.long_prompts.push(record.clone());
        Ok(Insert::Created(record))
    }

    fn insert_short(&self, prompt: NewShortPrompt) -> Result<Insert<ShortPrompt>> {
        validate(&prompt.text, &prompt.answer)?;
        let mut records = self.write()?;
        if records.short_prompts.iter().any(|p| p.text == prompt.text) {
            return Ok(Insert::AlreadyExists);
        }
        let record = prompt.into_record();
        records.short_prompts.push(record.clone());
        Ok(Insert::Created(record))
    }

    fn pick_matching(
        &self,
        pattern: &LetterPattern,
        excluded: &HashSet<PromptId>,
    ) -> Result<Option<ShortPrompt>> {
        let records = self.read()?;
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| RiddleError::LookupUnavailable("rng lock poisoned".to_string()))?;

        Ok(records
            .short_prompts
            .iter()
            .filter(|p| !excluded.contains(&p.id) && pattern.matches(&p.answer))
            .choose(&mut *rng)
            .cloned())
    }
}

fn validate(text: &str, answer: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(RiddleError::InvalidInput("text is required".to_string()));
    }
    if answer.trim().is_empty() {
        return Err(RiddleError::InvalidInput("answer is required".to_string()));
    }
    Ok(())
}

#[async_trait]
impl PromptLookup for MemoryStore {
    async fn find_one_random_matching(
        &self,
        pattern: &LetterPattern,
        excluded: &HashSet<PromptId>,
    ) -> Result<Option<ShortPrompt>> {
        self.pick_matching(pattern, excluded)
    }
}

#[async_trait]
impl PromptStore for MemoryStore {
    async fn insert_long_prompt(&self, prompt: NewLongPrompt) -> Result<Insert<LongPrompt>> {
        self.insert_long(prompt)
    }

    async fn insert_short_prompt(&self, prompt: NewShortPrompt) -> Result<Insert<ShortPrompt>> {
        self.insert_short(prompt)
    }

    async fn long_prompt_for_date(&self, date: NaiveDate) -> Result<Option<LongPrompt>> {
        self.find_long_by_date(date)
    }
}
