//! # Riddle - clue selection for a word puzzle game
//!
//! Each daily riddle has an answer word. For every letter of that word the
//! game shows a short clue whose own answer contains the letter. This crate
//! picks those clues: one distinct, randomly sampled short prompt per letter.

pub mod error;
pub mod lookup;
pub mod selector;
pub mod store;
pub mod types;

// Re-exports
pub use error::{Result, RiddleError};
pub use lookup::{LetterPattern, PromptLookup, PromptStore};
pub use selector::{shuffle, PromptSelector};
pub use store::{MemoryStore, SeedData};
pub use types::{
    Insert, LongPrompt, MatchPolicy, NewLongPrompt, NewShortPrompt, PromptId, PromptView,
    Selection, SelectionResult, SelectorConfig, ShortPrompt,
};
