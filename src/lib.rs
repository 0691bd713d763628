//! # Homoglyph Phrase Filter
//!
//! Detects banned phrases in chat messages even when the author swaps in
//! visually similar Unicode characters or hides exotic whitespace inside
//! a word.
//!
//! ## Features
//!
//! - **Confusable-aware patterns**: each character with known look-alikes
//!   becomes a character class, everything else is matched literally
//! - **Whitespace evasion**: content is searched again with whitespace
//!   homoglyphs stripped out
//! - **Pluggable oracle**: the confusables analysis is a trait, with a
//!   built-in table covering Cyrillic, Greek and compatibility forms
//! - **Phrase identity**: filters compare and hash by phrase only
//!
//! ## Quick Start
//!
//! ```rust
//! use glyphguard::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let filter = Filter::with_builtin_confusables("apple")?;
//!
//!     assert!(filter.matches("an аpple a day")); // Cyrillic 'а'
//!     assert!(filter.matches("ap\u{00A0}ple"));  // no-break space
//!     assert!(!filter.matches("ample"));
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod filter;
pub mod types;

// Re-export commonly used items
pub mod prelude {
    pub use crate::config::FilterConfig;
    pub use crate::filter::confusables::{ConfusablesOracle, ConfusablesTable, NoConfusables};
    pub use crate::filter::registry::{validate_phrase, FilterSet};
    pub use crate::filter::Filter;
    pub use crate::types::{ConfusableGroup, FilterError};
    pub use anyhow::Result;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
