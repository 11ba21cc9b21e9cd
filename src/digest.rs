//! Per-email digests and category grouping

use crate::types::{ActionItem, ActionType, ExtractionResult, Priority};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-time estimate used when email metadata carries none
pub const DEFAULT_READ_TIME_MINUTES: u32 = 2;

/// Cap on figures pulled into a newsletter digest
const MAX_NUMBERS: usize = 10;

static NUMBER_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"[$€£]?\d+(?:,\d{3})*(?:\.\d+)?%?").unwrap()
});

/// Importance shown on a digest card, derived from its actions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// Email metadata supplied by the fetching collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailMeta {
    pub category: Option<String>,
    pub read_time_minutes: Option<u32>,
}

/// Condensed representation of one processed email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestItem {
    pub email_id: String,

    pub title: String,

    /// Taken verbatim from the extraction summary; expected but not
    /// enforced to be at most three sentences
    pub summary: String,

    pub actions: Vec<ActionItem>,

    pub importance: Importance,

    pub category: Option<String>,

    pub read_time_minutes: u32,
}

/// Build the digest card for one email
#[must_use]
pub fn build_digest_item(
    email_id: &str,
    title: &str,
    result: &ExtractionResult,
    meta: &EmailMeta,
) -> DigestItem {
    DigestItem {
        email_id: email_id.to_string(),
        title: title.to_string(),
        summary: result.summary.clone(),
        actions: result.action_items.clone(),
        importance: derive_importance(&result.action_items),
        category: meta.category.clone(),
        read_time_minutes: meta.read_time_minutes.unwrap_or(DEFAULT_READ_TIME_MINUTES),
    }
}

/// Highest action priority wins; an email with no actions is low
#[must_use]
pub fn derive_importance(actions: &[ActionItem]) -> Importance {
    if actions.iter().any(|a| a.priority == Priority::High) {
        Importance::High
    } else if actions.iter().any(|a| a.priority == Priority::Medium) {
        Importance::Medium
    } else {
        Importance::Low
    }
}

/// Session-scoped set of digest items, at most one per email.
///
/// Rebuilding an email's digest replaces the previous one rather than
/// appending.
#[derive(Debug, Default)]
pub struct DigestCollection {
    items: HashMap<String, DigestItem>,
}

impl DigestCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the digest for its email, returning the replaced
    /// item if one existed
    pub fn upsert(&mut self, item: DigestItem) -> Option<DigestItem> {
        self.items.insert(item.email_id.clone(), item)
    }

    #[must_use]
    pub fn get(&self, email_id: &str) -> Option<&DigestItem> {
        self.items.get(email_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DigestItem> {
        self.items.values()
    }
}

/// Richer per-email digest used by the grouped dashboard view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterDigest {
    pub email_id: String,
    pub title: String,
    pub category: String,
    pub key_points: Vec<String>,
    pub links: Vec<String>,
    pub dates: Vec<String>,
    pub numbers: Vec<String>,
    pub quotes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Derive the rich digest for one email from its extraction result
#[must_use]
pub fn build_newsletter_digest(
    email_id: &str,
    title: &str,
    category: &str,
    result: &ExtractionResult,
    created_at: DateTime<Utc>,
) -> NewsletterDigest {
    let key_points: Vec<String> = result
        .action_items
        .iter()
        .filter(|a| a.action_type != ActionType::Link)
        .map(|a| a.text.clone())
        .take(5)
        .collect();

    let links: Vec<String> = result
        .action_items
        .iter()
        .filter_map(|a| a.url.clone())
        .collect();

    let mut dates: Vec<String> = Vec::new();
    for date in result
        .action_items
        .iter()
        .filter_map(|a| a.due_date.map(|d| d.to_string()))
        .chain(result.events.iter().map(|e| e.start_time.date_naive().to_string()))
    {
        if !dates.contains(&date) {
            dates.push(date);
        }
    }

    let mut numbers: Vec<String> = Vec::new();
    'sources: for source in std::iter::once(result.summary.as_str())
        .chain(result.key_quotes.iter().map(String::as_str))
    {
        for m in NUMBER_REGEX.find_iter(source) {
            if numbers.len() >= MAX_NUMBERS {
                break 'sources;
            }
            let figure = m.as_str().to_string();
            if !numbers.contains(&figure) {
                numbers.push(figure);
            }
        }
    }

    NewsletterDigest {
        email_id: email_id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        key_points,
        links,
        dates,
        numbers,
        quotes: result.key_quotes.clone(),
        created_at,
    }
}

/// Category bucket of digests for the grouped dashboard view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestGroup {
    pub id: String,
    pub category: String,
    pub title: String,
    pub items: Vec<NewsletterDigest>,
    pub created_at: DateTime<Utc>,
}

/// Partition digests by exact, case-sensitive category and order everything
/// by recency.
///
/// Items within a group sort most-recent first; each group's `created_at`
/// is its newest item's timestamp; groups sort most-recent first by that
/// timestamp. Sorting is stable, so the ordering is deterministic and
/// regrouping the flattened output reproduces the same groups.
#[must_use]
pub fn group_digests(items: &[NewsletterDigest]) -> Vec<DigestGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<NewsletterDigest>> = HashMap::new();
    for item in items {
        if !buckets.contains_key(&item.category) {
            order.push(item.category.clone());
        }
        buckets
            .entry(item.category.clone())
            .or_default()
            .push(item.clone());
    }

    let mut groups: Vec<DigestGroup> = order
        .into_iter()
        .map(|category| {
            let mut bucket = buckets.remove(&category).unwrap_or_default();
            bucket.sort_by_key(|d| std::cmp::Reverse(d.created_at));
            let created_at = bucket.first().map_or_else(Utc::now, |d| d.created_at);
            DigestGroup {
                id: format!("group-{category}"),
                title: category.clone(),
                category,
                items: bucket,
                created_at,
            }
        })
        .collect();

    groups.sort_by_key(|g| std::cmp::Reverse(g.created_at));
    groups
}
