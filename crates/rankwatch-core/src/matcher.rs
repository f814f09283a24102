//! Matches tracked targets against SERP results.
//!
//! Per target: the first entry whose URL equals the expected URL exactly wins;
//! otherwise the first entry on the same domain wins and its own URL is
//! reported; otherwise the target is not ranked. "First" is provider order,
//! which is not re-sorted.

use thiserror::Error;

use crate::model::{RankResult, ResultIndex, SerpEntry, Target};

#[derive(Debug, Error)]
pub enum MatchError {
    /// The keyword's provider job was never collected. Collection must only
    /// run once every submitted job is ready.
    #[error("keyword \"{keyword}\" has no collected SERP results")]
    KeywordNotIndexed { keyword: String },
}

/// Matches every target in order, producing one [`RankResult`] per target.
///
/// # Errors
///
/// Returns [`MatchError::KeywordNotIndexed`] for the first trackable target
/// whose keyword is absent from `index`.
pub fn match_targets(
    targets: &[Target],
    index: &ResultIndex,
) -> Result<Vec<RankResult>, MatchError> {
    targets
        .iter()
        .map(|target| match_target(target, index))
        .collect()
}

/// Matches a single target.
///
/// Placeholder rows with a blank keyword are never looked up and match as
/// not found.
///
/// # Errors
///
/// Returns [`MatchError::KeywordNotIndexed`] if the keyword is absent from
/// `index`.
pub fn match_target(target: &Target, index: &ResultIndex) -> Result<RankResult, MatchError> {
    if !target.is_trackable() {
        return Ok(RankResult::not_found());
    }

    let entries = index
        .get(&target.keyword)
        .ok_or_else(|| MatchError::KeywordNotIndexed {
            keyword: target.keyword.clone(),
        })?;

    Ok(rank_in(entries, &target.url))
}

fn rank_in(entries: &[SerpEntry], expected_url: &str) -> RankResult {
    if expected_url.is_empty() {
        return RankResult::not_found();
    }

    if let Some(entry) = entries.iter().find(|e| e.url == expected_url) {
        return RankResult::ranked(entry.rank_absolute, expected_url);
    }

    let Some(domain) = domain_of(expected_url) else {
        return RankResult::not_found();
    };

    entries
        .iter()
        .find(|e| e.domain == domain)
        .map_or_else(RankResult::not_found, |e| {
            RankResult::ranked(e.rank_absolute, e.url.clone())
        })
}

/// Network location of `url`: host plus an explicit port, without scheme or
/// path. Returns `None` when `url` is not absolute or has no host.
///
/// The host comes back in parsed form: lowercased, IDNA hosts as punycode,
/// and a port equal to the scheme default dropped. The provider's `domain`
/// field is compared as sent, so `https://Example.com:443/` matches
/// `example.com`.
#[must_use]
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}
