//! Named image batch model.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Default cap on images analyzed per batch.
pub const DEFAULT_MAX_IMAGES: usize = 300;

/// An ordered mapping of caller-chosen names to image URLs.
///
/// Insertion order is preserved through serialization so that truncation
/// keeps the first entries the caller submitted. Multiple names may map to
/// the same URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageBatch(IndexMap<String, String>);

impl ImageBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Add a name → URL entry. A repeated name replaces its URL in place.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.0.insert(name.into(), url.into());
    }

    /// Number of named entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// URL for a given name, if present.
    pub fn url_for(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The first `max` entries in insertion order.
    ///
    /// Applied once, before any network call, by the dispatch layer.
    pub fn truncated(&self, max: usize) -> Self {
        Self(
            self.0
                .iter()
                .take(max)
                .map(|(name, url)| (name.clone(), url.clone()))
                .collect(),
        )
    }

    /// Distinct URLs in first-occurrence order.
    ///
    /// Names aliasing the same URL collapse to a single entry so the
    /// fetcher issues one request per URL.
    pub fn distinct_urls(&self) -> Vec<String> {
        self.0
            .values()
            .cloned()
            .collect::<IndexSet<String>>()
            .into_iter()
            .collect()
    }
}

impl FromIterator<(String, String)> for ImageBatch {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
