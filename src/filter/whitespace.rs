// src/filter/whitespace.rs - Whitespace homoglyphs stripped before the second search

use std::borrow::Cow;

/// Characters that render as (or hide inside) inter-word spacing.
///
/// This is a fixed literal set and not `char::is_whitespace`: tabs and
/// newlines are deliberately absent, while the zero-width characters
/// U+180E, U+200B and U+FEFF are present.
pub const UNICODE_SPACES: &[char] = &[
    '\u{0020}', // space
    '\u{00A0}', // no-break space
    '\u{1680}', // ogham space mark
    '\u{180E}', // mongolian vowel separator
    '\u{2000}', // en quad
    '\u{2001}', // em quad
    '\u{2002}', // en space
    '\u{2003}', // em space
    '\u{2004}', // three-per-em space
    '\u{2005}', // four-per-em space
    '\u{2006}', // six-per-em space
    '\u{2007}', // figure space
    '\u{2008}', // punctuation space
    '\u{2009}', // thin space
    '\u{200A}', // hair space
    '\u{200B}', // zero width space
    '\u{2028}', // line separator
    '\u{2029}', // paragraph separator
    '\u{202F}', // narrow no-break space
    '\u{205F}', // medium mathematical space
    '\u{3000}', // ideographic space
    '\u{FEFF}', // zero width no-break space
];

pub fn is_unicode_space(c: char) -> bool {
    UNICODE_SPACES.contains(&c)
}

/// Remove every whitespace homoglyph from `content`.
///
/// Characters are removed outright rather than collapsed to a single space,
/// so "bad\u{00A0}word" becomes "badword". Borrows when there is nothing
/// to strip.
pub fn strip_unicode_spaces(content: &str) -> Cow<'_, str> {
    if content.contains(is_unicode_space) {
        Cow::Owned(content.chars().filter(|&c| !is_unicode_space(c)).collect())
    } else {
        Cow::Borrowed(content)
    }
}
