// src/filter/registry.rs - In-memory set of filters keyed by phrase

use log::{debug, warn};
use std::collections::HashSet;

use super::Filter;
use crate::types::FilterError;

/// Reject phrases a filter should never be built from
pub fn validate_phrase(text: &str, max_length: usize) -> Result<(), FilterError> {
    let length = text.chars().count();
    if length == 0 {
        return Err(FilterError::EmptyPhrase);
    }
    if length > max_length {
        return Err(FilterError::PhraseTooLong { length, max: max_length });
    }
    Ok(())
}

/// Deduplicating collection of filters.
///
/// Relies on `Filter`'s identity being its phrase: inserting a filter built
/// from a phrase that is already present is a no-op.
#[derive(Debug, Default)]
pub struct FilterSet {
    filters: HashSet<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when a filter for the same phrase already exists
    pub fn insert(&mut self, filter: Filter) -> bool {
        let phrase = filter.text().to_string();
        let inserted = self.filters.insert(filter);
        if !inserted {
            warn!("Filter for {:?} is already registered", phrase);
        }
        inserted
    }

    pub fn remove(&mut self, filter: &Filter) -> bool {
        self.filters.remove(filter)
    }

    pub fn contains(&self, filter: &Filter) -> bool {
        self.filters.contains(filter)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    /// Every filter that matches `content`, ordered by phrase
    pub fn matching(&self, content: &str) -> Vec<&Filter> {
        let mut matched: Vec<&Filter> = self.filters.iter().filter(|f| f.matches(content)).collect();
        matched.sort_by(|a, b| a.text().cmp(b.text()));
        if !matched.is_empty() {
            debug!("{} filter(s) matched message", matched.len());
        }
        matched
    }
}
