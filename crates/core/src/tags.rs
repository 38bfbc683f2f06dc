//! Tag Set
//!
//! An ordered-but-deduplicated collection of free-text product labels. Unlike a
//! plain set, insertion order is preserved so that derived search tokens stay
//! stable across recomputations.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Ordered, deduplicated product labels.
///
/// Labels are trimmed on insertion and blank labels are dropped. Duplicate
/// labels keep their first-seen position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet {
    tags: SmallVec<[String; 5]>,
}

impl TagSet {
    /// Create a tag set from any string iterator, trimming and deduplicating.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();

        for tag in tags {
            set.add(tag.as_ref());
        }

        set
    }

    /// Create a tag set from string slices.
    #[must_use]
    pub fn from_strs(tags: &[&str]) -> Self {
        Self::new(tags.iter().copied())
    }

    /// Iterate over the labels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Whether the set contains the given label (after trimming).
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        let tag = tag.trim();

        self.tags.iter().any(|existing| existing == tag)
    }

    /// Add a label, ignoring blanks and duplicates. Returns whether the set
    /// changed.
    pub fn add(&mut self, tag: &str) -> bool {
        let tag = tag.trim();

        if tag.is_empty() || self.contains(tag) {
            return false;
        }

        self.tags.push(tag.to_string());

        true
    }

    /// Remove a label. Returns whether the set changed.
    pub fn remove(&mut self, tag: &str) -> bool {
        let tag = tag.trim();

        match self.tags.iter().position(|existing| existing == tag) {
            Some(position) => {
                self.tags.remove(position);
                true
            }
            None => false,
        }
    }

    /// Number of labels in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the set holds no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Whether both sets share at least one label.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };

        let lookup: FxHashSet<&str> = large.iter().collect();

        small.iter().any(|tag| lookup.contains(tag))
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        Self::new(tags)
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.tags.into_vec()
    }
}
