// src/filter/mod.rs - Homoglyph-aware phrase filter

pub mod confusables;
pub mod registry;
pub mod whitespace;

use log::{debug, error, info};
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::{ConfusableGroup, FilterError};
use confusables::{ConfusablesOracle, ConfusablesTable};
use whitespace::strip_unicode_spaces;

/// Mixed into every filter hash so a filter never hashes like its bare phrase.
const HASH_SALT: u64 = 0x2C6F_024E_D28;

/// A banned phrase compiled into a pattern that also accepts look-alike
/// characters.
///
/// The compiled pattern is derived entirely from the phrase, so identity
/// (`Eq`, `Hash`) is the phrase alone.
#[derive(Clone)]
pub struct Filter {
    text: String,
    regex: Regex,
}

impl Filter {
    /// Build a filter for `text`, asking `oracle` which characters have
    /// look-alikes.
    pub fn new(text: impl Into<String>, oracle: &dyn ConfusablesOracle) -> Result<Self, FilterError> {
        let text = text.into();
        info!("Creating filter regular expression from {:?}", text);

        let groups = oracle.analyze(&text);
        let pattern = if groups.is_empty() {
            regex::escape(&text)
        } else {
            build_pattern(&text, &groups)
        };
        debug!("Generated pattern: {:?}", pattern);

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| {
                error!("Pattern for filter {:?} failed to compile: {}", text, source);
                FilterError::Compile {
                    phrase: text.clone(),
                    source,
                }
            })?;

        Ok(Self { text, regex })
    }

    /// Build a filter against the shared built-in confusables table
    pub fn with_builtin_confusables(text: impl Into<String>) -> Result<Self, FilterError> {
        Self::new(text, ConfusablesTable::builtin())
    }

    /// The phrase this filter was built from; also its identity key
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check whether `content` contains the phrase or a look-alike of it.
    ///
    /// The content is searched as-is and again with every whitespace
    /// homoglyph removed, so spacing tricks inside a word are caught.
    pub fn matches(&self, content: &str) -> bool {
        if self.regex.is_match(content) {
            return true;
        }

        match strip_unicode_spaces(content) {
            Cow::Owned(stripped) => {
                let found = self.regex.is_match(&stripped);
                if found {
                    debug!("Filter {:?} matched after stripping whitespace", self.text);
                }
                found
            }
            // Nothing was stripped, the first search already covered it
            Cow::Borrowed(_) => false,
        }
    }
}

/// Assemble the pattern for `text` from the oracle's groups.
///
/// Each character with look-alikes becomes a class holding the character
/// followed by its homoglyphs; everything else is an escaped literal.
pub(crate) fn build_pattern(text: &str, groups: &[ConfusableGroup]) -> String {
    let mut classes: HashMap<char, String> = HashMap::with_capacity(groups.len());
    for group in groups {
        classes.entry(group.character).or_insert_with(|| {
            let mut class = String::from("[");
            push_escaped(&mut class, group.character);
            for homoglyph in group.homoglyphs() {
                push_escaped(&mut class, homoglyph);
            }
            class.push(']');
            class
        });
    }

    let mut pattern = String::with_capacity(text.len());
    for c in text.chars() {
        match classes.get(&c) {
            Some(class) => pattern.push_str(class),
            None => push_escaped(&mut pattern, c),
        }
    }
    pattern
}

fn push_escaped(out: &mut String, c: char) {
    if regex_syntax_meta(c) {
        out.push('\\');
    }
    out.push(c);
}

/// Same set `regex::escape` escapes; kept per character so class bodies and
/// literals share one path.
fn regex_syntax_meta(c: char) -> bool {
    matches!(
        c,
        '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '#'
            | '&' | '-' | '~'
    )
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text()
    }
}

impl Eq for Filter {}

impl Hash for Filter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text().hash(state);
        HASH_SALT.hash(state);
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").field("text", &self.text).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::confusables::NoConfusables;
    use std::collections::hash_map::DefaultHasher;

    /// Oracle with a fixed, hand-picked answer for every character
    struct FakeOracle(Vec<(char, &'static str)>);

    impl ConfusablesOracle for FakeOracle {
        fn analyze(&self, text: &str) -> Vec<ConfusableGroup> {
            let mut groups = Vec::new();
            for c in text.chars() {
                if groups.iter().any(|g: &ConfusableGroup| g.character == c) {
                    continue;
                }
                if let Some((_, lookalikes)) = self.0.iter().find(|(k, _)| *k == c) {
                    groups.push(ConfusableGroup::new(c, lookalikes.chars()));
                }
            }
            groups
        }
    }

    fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_matches_own_phrase() {
        for phrase in ["apple", "Hello", "a.b*c", "[x]", "ünïcödé", "日本語", "bad word"] {
            let filter = Filter::with_builtin_confusables(phrase).unwrap();
            assert!(filter.matches(phrase), "{phrase:?} should match itself");
        }
    }

    #[test]
    fn test_literal_fallback_is_substring_search() {
        let filter = Filter::new("a.b*c", &NoConfusables).unwrap();
        assert!(filter.matches("a.b*c"));
        assert!(filter.matches("xx A.B*C yy"));
        assert!(!filter.matches("axbyyc"));
        assert!(!filter.matches("abc"));
    }

    #[test]
    fn test_metacharacters_with_builtin_table() {
        let filter = Filter::with_builtin_confusables("a.b*c").unwrap();
        assert!(filter.matches("a.b*c"));
        assert!(!filter.matches("axbyyc"));
    }

    #[test]
    fn test_case_insensitive() {
        let filter = Filter::with_builtin_confusables("Hello").unwrap();
        assert!(filter.matches("HELLO"));
        assert!(filter.matches("say hello there"));
    }

    #[test]
    fn test_homoglyph_substitution() {
        let filter = Filter::with_builtin_confusables("apple").unwrap();
        assert!(filter.matches("аpple")); // Cyrillic a
        assert!(filter.matches("аррlе")); // Cyrillic a, p, p, e
        assert!(filter.matches("ａｐｐｌｅ")); // fullwidth
        assert!(!filter.matches("ample"));
    }

    #[test]
    fn test_phrase_case_does_not_change_homoglyph_coverage() {
        for content in ["кill", "κill", "KILL"] {
            let lower = Filter::with_builtin_confusables("kill").unwrap();
            let upper = Filter::with_builtin_confusables("Kill").unwrap();
            assert!(lower.matches(content), "kill vs {content:?}");
            assert_eq!(lower.matches(content), upper.matches(content));
        }

        let lower = Filter::with_builtin_confusables("quiz").unwrap();
        let upper = Filter::with_builtin_confusables("QUIZ").unwrap();
        assert!(lower.matches("qυiz"));
        assert!(upper.matches("qυiz"));
    }

    #[test]
    fn test_filter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Filter>();

        let filter = std::sync::Arc::new(Filter::with_builtin_confusables("spam").unwrap());
        let handles: Vec<_> = ["ѕpam", "s\u{00A0}pam", "eggs"]
            .into_iter()
            .map(|content| {
                let filter = std::sync::Arc::clone(&filter);
                std::thread::spawn(move || filter.matches(content))
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![true, true, false]);
    }

    #[test]
    fn test_whitespace_homoglyph_inside_word() {
        let filter = Filter::with_builtin_confusables("badword").unwrap();
        assert!(filter.matches("bad\u{00A0}word"));
        assert!(filter.matches("b\u{200B}a\u{3000}dword"));
        assert!(filter.matches("bad word"));
        assert!(!filter.matches("bad\tword"));
    }

    #[test]
    fn test_stripping_can_join_separate_words() {
        // Known quirk: removing spaces lets a phrase span a word boundary
        let filter = Filter::new("cart", &NoConfusables).unwrap();
        assert!(filter.matches("car trip"));
    }

    #[test]
    fn test_fake_oracle_classes() {
        let oracle = FakeOracle(vec![('o', "0ø"), ('.', "․")]);
        let filter = Filter::new("go.od", &oracle).unwrap();
        assert!(filter.matches("g0․ød"));
        assert!(filter.matches("GO.OD"));
        assert!(!filter.matches("gx.od"));
        assert!(!filter.matches("go-od"));
    }

    #[test]
    fn test_homoglyph_metacharacters_are_escaped() {
        let oracle = FakeOracle(vec![('l', "|]^-\\")]);
        let filter = Filter::new("lol", &oracle).unwrap();
        assert!(filter.matches("|o]"));
        assert!(filter.matches("^o-"));
        assert!(filter.matches("\\ol"));
        assert!(!filter.matches("xol"));
    }

    #[test]
    fn test_build_pattern_memoizes_classes() {
        let groups = vec![ConfusableGroup::new('a', ['а'])];
        assert_eq!(build_pattern("a.a", &groups), "[aа]\\.[aа]");
    }

    #[test]
    fn test_build_pattern_uses_first_group_per_character() {
        let groups = vec![
            ConfusableGroup::new('a', ['а']),
            ConfusableGroup::new('a', ['α']),
        ];
        assert_eq!(build_pattern("a", &groups), "[aа]");
    }

    #[test]
    fn test_escape_matches_regex_crate() {
        let specials = "\\.+*?()|[]{}^$#&-~";
        let mut ours = String::new();
        for c in specials.chars() {
            push_escaped(&mut ours, c);
        }
        assert_eq!(ours, regex::escape(specials));
    }

    #[test]
    fn test_fallback_equals_substring_search() {
        let filter = Filter::new("Needle", &NoConfusables).unwrap();
        for content in ["needle", "haystack NEEDLE haystack", "need le", "nedle", "", "needl"] {
            let expected = content.to_lowercase().contains("needle")
                || strip_unicode_spaces(content).to_lowercase().contains("needle");
            assert_eq!(filter.matches(content), expected, "content {content:?}");
        }
    }

    #[test]
    fn test_empty_phrase_matches_everything() {
        let filter = Filter::new("", &NoConfusables).unwrap();
        assert!(filter.matches(""));
        assert!(filter.matches("anything"));
    }

    #[test]
    fn test_equality_and_hash_follow_text() {
        let first = Filter::with_builtin_confusables("spam").unwrap();
        let second = Filter::new("spam", &NoConfusables).unwrap();
        let other = Filter::with_builtin_confusables("eggs").unwrap();

        assert_eq!(first, second);
        assert_eq!(hash_of(&first), hash_of(&second));
        assert_ne!(first, other);
    }

    #[test]
    fn test_hash_differs_from_plain_text_hash() {
        let filter = Filter::new("spam", &NoConfusables).unwrap();
        assert_ne!(hash_of(&filter), hash_of("spam"));
    }

    #[test]
    fn test_debug_hides_pattern() {
        let filter = Filter::with_builtin_confusables("spam").unwrap();
        assert_eq!(format!("{:?}", filter), "Filter { text: \"spam\", .. }");
    }
}
