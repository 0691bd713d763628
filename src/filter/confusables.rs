// src/filter/confusables.rs - Confusable character analysis (the "oracle")

use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::types::ConfusableGroup;

/// Anything that can tell which characters of a string have look-alikes.
///
/// Implementations are pure: the same text always yields the same groups,
/// in order of first occurrence, one group per distinct character. Characters
/// without look-alikes are left out, so a group never has an empty set.
pub trait ConfusablesOracle: Send + Sync {
    fn analyze(&self, text: &str) -> Vec<ConfusableGroup>;
}

/// Oracle that never reports anything; filters built with it are plain
/// case-insensitive substring matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfusables;

impl ConfusablesOracle for NoConfusables {
    fn analyze(&self, _text: &str) -> Vec<ConfusableGroup> {
        Vec::new()
    }
}

/// Cross-script look-alikes. Each string is one set of mutually confusable
/// characters.
const LOOKALIKE_SETS: &[&str] = &[
    // Latin / Cyrillic / Greek lowercase
    "aаɑα",
    "bЬƅ",
    "cсϲⅽ",
    "dԁⅾ",
    "eеҽ",
    "gɡ",
    "hһ",
    "iіⅰ",
    "jјϳ",
    "kкκ",
    "oоο0",
    "pрρ",
    "qԛ",
    "sѕ",
    "uυ",
    "vν",
    "wԝ",
    "xхⅹ",
    "yу",
    // Latin / Cyrillic / Greek uppercase
    "AАΑᎪ",
    "BВΒᏴ",
    "CСϹⅭ",
    "DⅮ",
    "EЕΕ",
    "HНΗ",
    "IІΙӀⅠl1|",
    "JЈ",
    "KКΚ",
    "MМΜ",
    "NΝ",
    "OОΟ0",
    "PРΡ",
    "SЅ",
    "TТΤ",
    "XХΧⅩ",
    "YҮΥ",
    "ZΖ",
    // Punctuation
    "-‐‑‒–—―−",
    "'‘’ʼ",
    "\"“”",
    ".․",
];

/// Blocks whose members fold onto a single ASCII-ish character under NFKC:
/// letterlike symbols, roman numerals, superscripts, enclosed and squared
/// letters, fullwidth forms and the mathematical alphanumerics.
const COMPATIBILITY_BLOCKS: &[(u32, u32)] = &[
    (0x2070, 0x209F),
    (0x2100, 0x214F),
    (0x2160, 0x217F),
    (0x24B6, 0x24E9),
    (0xFF01, 0xFF5E),
    (0x1D400, 0x1D7FF),
    (0x1F130, 0x1F149),
];

/// Greedy confusables table.
///
/// Every character of a registered set is reported as confusable with every
/// other member. A character that belongs to several sets sees the union of
/// those sets. Analysis also pulls in the sets of the character's single-char
/// lowercase and uppercase forms, since patterns are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ConfusablesTable {
    lookalikes: HashMap<char, BTreeSet<char>>,
}

impl ConfusablesTable {
    /// Table with no entries at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Curated cross-script sets plus the NFKC compatibility forms
    pub fn with_defaults() -> Self {
        let mut table = Self::empty();
        for set in LOOKALIKE_SETS {
            table.add_set(set.chars());
        }
        table.add_compatibility_forms();
        debug!("Built confusables table covering {} characters", table.len());
        table
    }

    /// Shared default table, built on first use
    pub fn builtin() -> &'static ConfusablesTable {
        static BUILTIN: OnceLock<ConfusablesTable> = OnceLock::new();
        BUILTIN.get_or_init(Self::with_defaults)
    }

    /// Register a set of mutually confusable characters.
    ///
    /// Returns false (and changes nothing) when the set has fewer than two
    /// distinct characters.
    pub fn add_set<I>(&mut self, chars: I) -> bool
    where
        I: IntoIterator<Item = char>,
    {
        let set: BTreeSet<char> = chars.into_iter().collect();
        if set.len() < 2 {
            return false;
        }

        for &member in &set {
            self.lookalikes
                .entry(member)
                .or_default()
                .extend(set.iter().copied());
        }
        true
    }

    fn add_compatibility_forms(&mut self) {
        let mut by_base: BTreeMap<char, BTreeSet<char>> = BTreeMap::new();

        for &(start, end) in COMPATIBILITY_BLOCKS {
            for c in (start..=end).filter_map(char::from_u32) {
                if let Some(base) = single_char_nfkc(c) {
                    by_base.entry(base).or_default().insert(c);
                }
            }
        }

        for (base, forms) in by_base {
            self.add_set(std::iter::once(base).chain(forms));
        }
    }

    /// All characters confusable with `c`, itself included
    pub fn lookalikes(&self, c: char) -> Option<&BTreeSet<char>> {
        self.lookalikes.get(&c)
    }

    /// Number of characters that have at least one look-alike
    pub fn len(&self) -> usize {
        self.lookalikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookalikes.is_empty()
    }
}

impl ConfusablesOracle for ConfusablesTable {
    fn analyze(&self, text: &str) -> Vec<ConfusableGroup> {
        let mut seen = HashSet::new();
        text.chars()
            .filter(|&c| seen.insert(c))
            .filter_map(|c| {
                let equivalents: BTreeSet<char> = case_variants(c)
                    .filter_map(|variant| self.lookalikes(variant))
                    .flatten()
                    .copied()
                    .collect();
                if equivalents.is_empty() {
                    None
                } else {
                    Some(ConfusableGroup::new(c, equivalents))
                }
            })
            .filter(ConfusableGroup::has_homoglyphs)
            .collect()
    }
}

/// `c` followed by its lowercase and uppercase forms, where each is one char
fn case_variants(c: char) -> impl Iterator<Item = char> {
    std::iter::once(c)
        .chain(single_char(c.to_lowercase()))
        .chain(single_char(c.to_uppercase()))
}

fn single_char(mut chars: impl Iterator<Item = char>) -> Option<char> {
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// The NFKC form of `c` when it is a different, single character
fn single_char_nfkc(c: char) -> Option<char> {
    let mut normalized = std::iter::once(c).nfkc();
    match (normalized.next(), normalized.next()) {
        (Some(base), None) if base != c => Some(base),
        _ => None,
    }
}
