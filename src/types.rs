//! Core types produced by the extraction engine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of actionable information found in an email
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Deadline,
    Event,
    Rsvp,
    Location,
    Link,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Deadline => "deadline",
            Self::Event => "event",
            Self::Rsvp => "rsvp",
            Self::Location => "location",
            Self::Link => "link",
        };
        write!(f, "{s}")
    }
}

/// Priority assigned to an action item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A structured, user-actionable unit extracted from one email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    /// Identifier assigned by the caller or service, if any
    pub id: Option<String>,

    /// What kind of action this is
    #[serde(rename = "type")]
    pub action_type: ActionType,

    /// The matched text span
    pub text: String,

    /// Certainty in [0, 1]; fixed per rule on the pattern path
    pub confidence: f32,

    /// Target URL; always set for `Link` items
    pub url: Option<String>,

    /// Resolved due date; set for `Deadline` items when derivable
    pub due_date: Option<NaiveDate>,

    /// Place associated with the action
    pub location: Option<String>,

    pub priority: Priority,

    /// Mutated by the UI layer only; items are never deleted
    pub completed: bool,
}

impl ActionItem {
    #[must_use]
    pub const fn new(
        action_type: ActionType,
        text: String,
        confidence: f32,
        priority: Priority,
    ) -> Self {
        Self {
            id: None,
            action_type,
            text,
            confidence,
            url: None,
            due_date: None,
            location: None,
            priority,
            completed: false,
        }
    }
}

/// A calendar-ready event extracted from one email.
///
/// `start_time` is always an absolute instant; when the source text only
/// gives a date, the start defaults to 09:00 UTC on that date. `end_time`
/// is left unset when the text gives none (defaulting it is a calendar
/// collaborator concern).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEvent {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub confidence: Option<f32>,
}

/// How a match was produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Pattern,
    Service,
}

/// Diagnostic record of which rule fired; for tuning and debugging,
/// not shown to end users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReason {
    #[serde(rename = "type")]
    pub action_type: ActionType,

    pub method: ExtractionMethod,

    /// Source pattern of the rule that matched
    pub pattern: String,

    pub confidence: f32,
}

/// Everything extracted from a single email; immutable once produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub action_items: Vec<ActionItem>,
    pub events: Vec<ExtractedEvent>,
    pub summary: String,
    pub key_quotes: Vec<String>,
    pub extraction_reasons: Vec<ExtractionReason>,
}

impl ExtractionResult {
    /// Zero-value safe result for an email that could not be processed.
    ///
    /// Terminal safety net of the fallback chain; renders as a neutral
    /// "no actions found" state rather than an error.
    #[must_use]
    pub fn unprocessed() -> Self {
        Self {
            summary: "This email could not be processed.".to_string(),
            ..Self::default()
        }
    }

    /// Check if nothing actionable was extracted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.action_items.is_empty() && self.events.is_empty()
    }

    /// Count of extracted items across kinds
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.action_items.len() + self.events.len()
    }
}
