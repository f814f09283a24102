//! Rank-tracking data model shared by the submit and collect phases.
//!
//! A [`Target`] comes from one spreadsheet row; a [`SerpEntry`] is one ranked
//! search result from the SERP provider; a [`ResultIndex`] maps each keyword
//! whose provider job has completed to its ordered entry list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A tracked `(keyword, expected URL)` pair read from one spreadsheet row.
///
/// Duplicates are allowed and tracked independently. A blank `keyword` marks
/// a placeholder row that keeps later results aligned with their sheet rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub keyword: String,
    pub url: String,
}

impl Target {
    #[must_use]
    pub fn new(keyword: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            url: url.into(),
        }
    }

    /// `true` when the row carries a keyword worth submitting.
    #[must_use]
    pub fn is_trackable(&self) -> bool {
        !self.keyword.trim().is_empty()
    }
}

/// One ranked search result for a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpEntry {
    /// 1-based position within the provider's full result list.
    pub rank_absolute: u32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub domain: String,
}

impl SerpEntry {
    #[must_use]
    pub fn new(rank_absolute: u32, url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            rank_absolute,
            url: url.into(),
            domain: domain.into(),
        }
    }
}

/// Keyword → ordered SERP entries, built once per collection run.
///
/// Entries are kept in provider order, which is assumed to be rank-ascending.
#[derive(Debug, Clone, Default)]
pub struct ResultIndex {
    entries: HashMap<String, Vec<SerpEntry>>,
}

impl ResultIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the entry list for `keyword`, replacing any earlier list.
    ///
    /// Returns `true` when an earlier list was replaced. The ready-task listing
    /// may hand out the same keyword more than once, so the last list wins.
    pub fn insert(&mut self, keyword: impl Into<String>, entries: Vec<SerpEntry>) -> bool {
        self.entries.insert(keyword.into(), entries).is_some()
    }

    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&[SerpEntry]> {
        self.entries.get(keyword).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.contains_key(keyword)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<SerpEntry>)> for ResultIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<SerpEntry>)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (keyword, entries) in iter {
            index.insert(keyword, entries);
        }
        index
    }
}

/// Rank of a target URL, or the "not ranked" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Ranked(u32),
    NotFound,
}

impl Rank {
    /// Numeric form written to the sheet: the position, or `-1` when not ranked.
    #[must_use]
    pub fn as_cell_value(self) -> i64 {
        match self {
            Rank::Ranked(position) => i64::from(position),
            Rank::NotFound => -1,
        }
    }
}

/// Outcome of matching one [`Target`] against the [`ResultIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankResult {
    pub rank: Rank,
    /// The URL that ranked, or empty when not found.
    pub url: String,
}

impl RankResult {
    #[must_use]
    pub fn ranked(rank: u32, url: impl Into<String>) -> Self {
        Self {
            rank: Rank::Ranked(rank),
            url: url.into(),
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            rank: Rank::NotFound,
            url: String::new(),
        }
    }
}
