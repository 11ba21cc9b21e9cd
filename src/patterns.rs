//! Pattern library: fixed-confidence recognizers for actionable text
//!
//! Each action type carries one rule and one confidence constant. Rules run
//! independently and are not mutually exclusive, so overlapping spans may
//! yield more than one item; no deduplication happens at this layer.

use crate::types::{
    ActionItem, ActionType, ExtractedEvent, ExtractionMethod, ExtractionReason, ExtractionResult,
    Priority,
};
use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use regex::Regex;

/// Confidence carried by the deadline rule when it fires
pub const DEADLINE_CONFIDENCE: f32 = 0.8;

/// Confidence carried by the event rule
pub const EVENT_CONFIDENCE: f32 = 0.7;

/// Confidence carried by the link rule; highest since URL syntax is
/// unambiguous
pub const LINK_CONFIDENCE: f32 = 0.95;

/// Confidence carried by the RSVP rule
pub const RSVP_CONFIDENCE: f32 = 0.75;

/// Confidence carried by the location rule
pub const LOCATION_CONFIDENCE: f32 = 0.6;

/// Cap on sentences quoted back as supporting evidence
const MAX_KEY_QUOTES: usize = 5;

/// Date expression: `Month Day[, Year]`, abbreviated month names and
/// ordinal suffixes allowed
const DATE_EXPR: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?";

/// Clock time expression: `H:MM AM/PM`
const TIME_EXPR: &str = r"\d{1,2}:\d{2}\s*(?:AM|PM)";

static DEADLINE_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:by|before|due|deadline|expires?|ends)\b[^.!?\n]{{0,40}}?({DATE_EXPR})"
    ))
    .unwrap()
});

static EVENT_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:meeting|conference|webinar|event|scheduled|planned)\b[^.!?\n]{{0,40}}?({DATE_EXPR})(?:[^.!?\n]{{0,15}}?({TIME_EXPR}))?"
    ))
    .unwrap()
});

static RSVP_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\bRSVP\b(?:[^.!?\n]{{0,40}}?({DATE_EXPR}))?")).unwrap()
});

static LOCATION_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"\b(?i:location|venue|held at|takes place at|join us at)\b:?\s+([A-Z][A-Za-z0-9&',\- ]{2,60})").unwrap()
});

static URL_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>\[\]{}()"'|\\^]+"#).unwrap()
});

/// Options for a pattern pass.
///
/// `reference_date` anchors date expressions that carry no year: they
/// resolve to the next occurrence on or after it. Injectable so extraction
/// stays deterministic under test.
#[derive(Debug, Clone, Copy)]
pub struct PatternOptions {
    pub reference_date: NaiveDate,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            reference_date: Utc::now().date_naive(),
        }
    }
}

/// Default priority per action type on the pattern path
#[must_use]
pub const fn default_priority(action_type: ActionType) -> Priority {
    match action_type {
        ActionType::Deadline => Priority::High,
        ActionType::Event | ActionType::Rsvp => Priority::Medium,
        ActionType::Location | ActionType::Link => Priority::Low,
    }
}

/// Run every recognizer over `text` and collect all matches.
///
/// Pure and infallible: text with no cue words and no URLs simply yields an
/// empty result. `subject`, when present, titles extracted events.
#[must_use]
pub fn extract_with_patterns(
    text: &str,
    subject: Option<&str>,
    options: &PatternOptions,
) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let mut spans: Vec<(usize, usize)> = Vec::new();

    collect_deadlines(text, options, &mut result, &mut spans);
    collect_events(text, subject, options, &mut result, &mut spans);
    collect_rsvps(text, options, &mut result, &mut spans);
    collect_locations(text, &mut result, &mut spans);
    collect_links(text, &mut result, &mut spans);

    let sentences = sentence_ranges(text);
    result.summary = summarize(text, &sentences);
    result.key_quotes = key_quotes(text, &sentences, &spans);

    result
}

fn collect_deadlines(
    text: &str,
    options: &PatternOptions,
    out: &mut ExtractionResult,
    spans: &mut Vec<(usize, usize)>,
) {
    let mut fired = false;
    for caps in DEADLINE_REGEX.captures_iter(text) {
        let (Some(full), Some(date_expr)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        fired = true;
        spans.push((full.start(), full.end()));

        let mut item = ActionItem::new(
            ActionType::Deadline,
            full.as_str().trim().to_string(),
            DEADLINE_CONFIDENCE,
            default_priority(ActionType::Deadline),
        );
        item.due_date = resolve_date(date_expr.as_str(), options.reference_date);
        out.action_items.push(item);
    }
    if fired {
        out.extraction_reasons.push(reason(
            ActionType::Deadline,
            DEADLINE_REGEX.as_str(),
            DEADLINE_CONFIDENCE,
        ));
    }
}

fn collect_events(
    text: &str,
    subject: Option<&str>,
    options: &PatternOptions,
    out: &mut ExtractionResult,
    spans: &mut Vec<(usize, usize)>,
) {
    let mut fired = false;
    for caps in EVENT_REGEX.captures_iter(text) {
        let (Some(full), Some(date_expr)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        fired = true;
        spans.push((full.start(), full.end()));

        let matched = full.as_str().trim().to_string();
        out.action_items.push(ActionItem::new(
            ActionType::Event,
            matched.clone(),
            EVENT_CONFIDENCE,
            default_priority(ActionType::Event),
        ));

        // A calendar-ready event needs an absolute instant; matches whose
        // date cannot be resolved stay as plain action items.
        if let Some(date) = resolve_date(date_expr.as_str(), options.reference_date) {
            let time = caps
                .get(2)
                .and_then(|t| resolve_time(t.as_str()))
                .unwrap_or_else(default_event_time);
            out.events.push(ExtractedEvent {
                id: format!("event-{}", out.events.len() + 1),
                title: subject.map_or_else(|| matched.clone(), ToString::to_string),
                start_time: date.and_time(time).and_utc(),
                end_time: None,
                location: None,
                description: Some(matched),
                url: None,
                confidence: Some(EVENT_CONFIDENCE),
            });
        }
    }
    if fired {
        out.extraction_reasons.push(reason(
            ActionType::Event,
            EVENT_REGEX.as_str(),
            EVENT_CONFIDENCE,
        ));
    }
}

fn collect_rsvps(
    text: &str,
    options: &PatternOptions,
    out: &mut ExtractionResult,
    spans: &mut Vec<(usize, usize)>,
) {
    let mut fired = false;
    for caps in RSVP_REGEX.captures_iter(text) {
        let Some(full) = caps.get(0) else { continue };
        fired = true;
        spans.push((full.start(), full.end()));

        let mut item = ActionItem::new(
            ActionType::Rsvp,
            full.as_str().trim().to_string(),
            RSVP_CONFIDENCE,
            default_priority(ActionType::Rsvp),
        );
        item.due_date = caps
            .get(1)
            .and_then(|d| resolve_date(d.as_str(), options.reference_date));
        out.action_items.push(item);
    }
    if fired {
        out.extraction_reasons.push(reason(
            ActionType::Rsvp,
            RSVP_REGEX.as_str(),
            RSVP_CONFIDENCE,
        ));
    }
}

fn collect_locations(text: &str, out: &mut ExtractionResult, spans: &mut Vec<(usize, usize)>) {
    let mut fired = false;
    for caps in LOCATION_REGEX.captures_iter(text) {
        let (Some(full), Some(place)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        fired = true;
        spans.push((full.start(), full.end()));

        let mut item = ActionItem::new(
            ActionType::Location,
            full.as_str().trim().to_string(),
            LOCATION_CONFIDENCE,
            default_priority(ActionType::Location),
        );
        item.location = Some(place.as_str().trim_end_matches([' ', ',']).to_string());
        out.action_items.push(item);
    }
    if fired {
        out.extraction_reasons.push(reason(
            ActionType::Location,
            LOCATION_REGEX.as_str(),
            LOCATION_CONFIDENCE,
        ));
    }
}

fn collect_links(text: &str, out: &mut ExtractionResult, spans: &mut Vec<(usize, usize)>) {
    let mut fired = false;
    for m in URL_REGEX.find_iter(text) {
        fired = true;
        spans.push((m.start(), m.end()));

        let mut item = ActionItem::new(
            ActionType::Link,
            m.as_str().to_string(),
            LINK_CONFIDENCE,
            default_priority(ActionType::Link),
        );
        item.url = Some(m.as_str().to_string());
        out.action_items.push(item);
    }
    if fired {
        out.extraction_reasons.push(reason(
            ActionType::Link,
            URL_REGEX.as_str(),
            LINK_CONFIDENCE,
        ));
    }
}

fn reason(action_type: ActionType, pattern: &str, confidence: f32) -> ExtractionReason {
    ExtractionReason {
        action_type,
        method: ExtractionMethod::Pattern,
        pattern: pattern.to_string(),
        confidence,
    }
}

fn default_event_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Resolve a matched date expression to a calendar date.
///
/// An explicit year is taken verbatim; without one the date resolves to the
/// next occurrence of that month/day on or after `reference`.
fn resolve_date(expr: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let cleaned = expr.replace(',', " ");
    let mut parts = cleaned.split_whitespace();

    let month = month_number(parts.next()?)?;
    let day: u32 = parts
        .next()?
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .ok()?;
    let year: Option<i32> = parts.next().and_then(|t| t.parse().ok());

    match year {
        Some(y) => NaiveDate::from_ymd_opt(y, month, day),
        // The month/day may not exist in every year (Feb 29), so scan
        // forward for the first year where it does.
        None => (0..=8)
            .filter_map(|i| NaiveDate::from_ymd_opt(reference.year() + i, month, day))
            .find(|&d| d >= reference),
    }
}

fn month_number(token: &str) -> Option<u32> {
    let lower = token.trim_matches('.').to_lowercase();
    let key = lower.get(..3)?;
    Some(match key {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    })
}

/// Parse an `H:MM AM/PM` expression into a clock time
fn resolve_time(expr: &str) -> Option<NaiveTime> {
    let lower = expr.to_lowercase();
    let pm = lower.contains("pm");
    let clock = lower.trim_end_matches(|c: char| !c.is_ascii_digit());

    let (h, m) = clock.split_once(':')?;
    let mut hour: u32 = h.trim().parse().ok()?;
    let minute: u32 = m.trim().parse().ok()?;

    if pm && hour < 12 {
        hour += 12;
    }
    if !pm && hour == 12 {
        hour = 0;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Byte ranges of sentence-ish segments, split on terminators and newlines
fn sentence_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?' | '\n') {
            let end = idx + ch.len_utf8();
            if text[start..end].trim().len() > 1 {
                ranges.push((start, end));
            }
            start = end;
        }
    }
    if start < text.len() && !text[start..].trim().is_empty() {
        ranges.push((start, text.len()));
    }
    ranges
}

/// First three sentences of the body, joined into one summary line
fn summarize(text: &str, sentences: &[(usize, usize)]) -> String {
    sentences
        .iter()
        .take(3)
        .map(|&(s, e)| text[s..e].trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sentences that overlap at least one matched span, capped
fn key_quotes(text: &str, sentences: &[(usize, usize)], spans: &[(usize, usize)]) -> Vec<String> {
    sentences
        .iter()
        .filter(|&&(s, e)| spans.iter().any(|&(ms, me)| ms < e && me > s))
        .take(MAX_KEY_QUOTES)
        .map(|&(s, e)| text[s..e].trim().to_string())
        .collect()
}
