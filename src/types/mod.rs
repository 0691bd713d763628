// src/types/mod.rs - Shared types for the homoglyph filter

use std::collections::BTreeSet;
use thiserror::Error;

/// One unit of confusables analysis: a character from the analyzed text
/// together with every character that looks like it (itself included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusableGroup {
    pub character: char,
    pub equivalents: BTreeSet<char>,
}

impl ConfusableGroup {
    pub fn new(character: char, equivalents: impl IntoIterator<Item = char>) -> Self {
        let mut equivalents: BTreeSet<char> = equivalents.into_iter().collect();
        equivalents.insert(character);
        Self { character, equivalents }
    }

    /// Look-alikes other than the character itself
    pub fn homoglyphs(&self) -> impl Iterator<Item = char> + '_ {
        self.equivalents.iter().copied().filter(move |&c| c != self.character)
    }

    /// A group is only meaningful when it names at least one look-alike
    pub fn has_homoglyphs(&self) -> bool {
        self.equivalents.len() > 1
    }
}

/// Errors raised while building or registering filters
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter phrase is empty")]
    EmptyPhrase,

    #[error("filter phrase is {length} characters long, the limit is {max}")]
    PhraseTooLong { length: usize, max: usize },

    /// The generated pattern was rejected by the regex engine. Escaping is
    /// supposed to make this impossible, so it always indicates a bug.
    #[error("generated pattern for {phrase:?} failed to compile: {source}")]
    Compile {
        phrase: String,
        #[source]
        source: regex::Error,
    },
}
