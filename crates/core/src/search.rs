//! Search Tokenisation
//!
//! Turns product names and tags into normalized, deduplicated, order-preserving
//! search tokens. Name words are expanded into all of their prefixes so that an
//! indexed equality lookup answers prefix queries without per-query regex; tag
//! words only contribute their half-length fragment and the full word.

use rustc_hash::FxHashSet;

use crate::tags::TagSet;

/// Shortest token worth indexing; single characters match too broadly.
const MIN_TOKEN_LEN: usize = 2;

/// Lowercase, trimmed copy of a display string.
///
/// This is the normalization applied to stored names before tokenisation and to
/// incoming search queries, so both sides of an index lookup agree.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Tokenize free text into deduplicated prefix tokens.
///
/// The text is normalized, split on runs of non-word characters, and words
/// shorter than two characters are dropped. Each remaining word emits all of
/// its prefixes of at least two characters, deduplicated while preserving
/// first-seen order. Empty input yields an empty token set.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    let mut sink = TokenSink::default();

    for word in words(&normalized) {
        push_prefixes(word, &mut sink);
    }

    sink.into_tokens()
}

/// Tokenize tag labels.
///
/// Tags are split like names, but each word emits only its half-length prefix
/// (when that fragment is itself long enough to index) and the full word,
/// rather than every prefix.
#[must_use]
pub fn tokenize_tags(tags: &TagSet) -> Vec<String> {
    let mut sink = TokenSink::default();

    for tag in tags.iter() {
        let normalized = normalize(tag);

        for word in words(&normalized) {
            push_tag_fragments(word, &mut sink);
        }
    }

    sink.into_tokens()
}

/// Combined token set for a record: name tokens followed by tag tokens, merged
/// with order preserved and duplicates removed.
#[must_use]
pub fn search_tokens(name_normalized: &str, tags: &TagSet) -> Vec<String> {
    let mut sink = TokenSink::default();

    for token in tokenize(name_normalized) {
        sink.push(token);
    }

    for token in tokenize_tags(tags) {
        sink.push(token);
    }

    sink.into_tokens()
}

/// Split normalized text into indexable words.
fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().count() >= MIN_TOKEN_LEN)
}

fn push_prefixes(word: &str, sink: &mut TokenSink) {
    let mut prefix = String::with_capacity(word.len());

    for (index, ch) in word.chars().enumerate() {
        prefix.push(ch);

        if index + 1 >= MIN_TOKEN_LEN {
            sink.push(prefix.clone());
        }
    }
}

fn push_tag_fragments(word: &str, sink: &mut TokenSink) {
    let half = word.chars().count() / 2;

    if half >= MIN_TOKEN_LEN {
        sink.push(word.chars().take(half).collect());
    }

    sink.push(word.to_string());
}

/// Accumulates tokens, deduplicating while preserving first-seen order.
#[derive(Debug, Default)]
struct TokenSink {
    seen: FxHashSet<String>,
    tokens: Vec<String>,
}

impl TokenSink {
    fn push(&mut self, token: String) {
        if self.seen.insert(token.clone()) {
            self.tokens.push(token);
        }
    }

    fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}
