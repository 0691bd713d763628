// src/config/mod.rs - Filter configuration loading

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::filter::confusables::ConfusablesTable;
use crate::filter::registry::{validate_phrase, FilterSet};
use crate::filter::Filter;

fn default_max_phrase_length() -> usize {
    100
}

fn default_true() -> bool {
    true
}

/// Filter configuration as stored on disk (YAML, JSON or TOML)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Phrases to filter
    #[serde(default)]
    pub phrases: Vec<String>,

    /// Longest phrase accepted, in characters
    #[serde(default = "default_max_phrase_length")]
    pub max_phrase_length: usize,

    /// Start from the built-in confusables table
    #[serde(default = "default_true")]
    pub use_builtin_confusables: bool,

    /// Extra look-alike sets; each string lists mutually confusable characters
    #[serde(default)]
    pub extra_confusables: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            phrases: Vec::new(),
            max_phrase_length: default_max_phrase_length(),
            use_builtin_confusables: true,
            extra_confusables: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Load a configuration file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let config: FilterConfig = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?,
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?,
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Invalid TOML in {}", path.display()))?,
            other => bail!("Unsupported config format '{}' for {}", other, path.display()),
        };

        info!(
            "Loaded {} phrase(s) and {} extra confusable set(s) from {}",
            config.phrases.len(),
            config.extra_confusables.len(),
            path.display()
        );
        Ok(config)
    }

    /// Collect every problem with this configuration
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.max_phrase_length == 0 {
            problems.push("max_phrase_length must be at least 1".to_string());
        }

        for phrase in &self.phrases {
            if let Err(e) = validate_phrase(phrase, self.max_phrase_length) {
                problems.push(format!("phrase {:?}: {}", phrase, e));
            }
        }

        for set in &self.extra_confusables {
            let distinct: std::collections::BTreeSet<char> = set.chars().collect();
            if distinct.len() < 2 {
                problems.push(format!(
                    "confusable set {:?} needs at least two distinct characters",
                    set
                ));
            }
        }

        problems
    }

    /// Confusables table described by this configuration
    pub fn confusables(&self) -> ConfusablesTable {
        let mut table = if self.use_builtin_confusables {
            ConfusablesTable::builtin().clone()
        } else {
            ConfusablesTable::empty()
        };

        for set in &self.extra_confusables {
            if !table.add_set(set.chars()) {
                warn!("Ignoring confusable set {:?} with fewer than two characters", set);
            }
        }
        table
    }

    /// Build the filter set for every configured phrase.
    ///
    /// Invalid phrases are skipped with a warning; a pattern that fails to
    /// compile aborts the whole build.
    pub fn build_filters(&self) -> Result<FilterSet> {
        let table = self.confusables();
        let mut filters = FilterSet::new();

        for phrase in &self.phrases {
            if let Err(e) = validate_phrase(phrase, self.max_phrase_length) {
                warn!("Skipping phrase {:?}: {}", phrase, e);
                continue;
            }
            let filter = Filter::new(phrase.as_str(), &table)
                .with_context(|| format!("Failed to build filter for {:?}", phrase))?;
            filters.insert(filter);
        }

        info!("Built {} filter(s)", filters.len());
        Ok(filters)
    }
}
