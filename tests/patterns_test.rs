use action_extract::*;
use chrono::{Datelike, NaiveDate, Timelike};

fn options(year: i32, month: u32, day: u32) -> PatternOptions {
    PatternOptions {
        reference_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
    }
}

#[test]
fn test_no_cues_no_matches() {
    let text = "The quick brown fox jumps over the lazy dog. Nothing actionable here at all.";
    let result = extract_with_patterns(text, None, &PatternOptions::default());

    assert!(result.action_items.is_empty());
    assert!(result.events.is_empty());
    assert!(result.extraction_reasons.is_empty());
}

#[test]
fn test_empty_text() {
    let result = extract_with_patterns("", None, &PatternOptions::default());
    assert!(result.is_empty());
    assert!(result.key_quotes.is_empty());
}

#[test]
fn test_link_extraction() {
    let text = "Read more at https://example.com/post and https://news.example.org";
    let result = extract_with_patterns(text, None, &PatternOptions::default());

    let links: Vec<_> = result
        .action_items
        .iter()
        .filter(|i| i.action_type == ActionType::Link)
        .collect();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].url.as_deref(), Some("https://example.com/post"));
    assert_eq!(links[0].confidence, LINK_CONFIDENCE);
    assert_eq!(links[1].url.as_deref(), Some("https://news.example.org"));
}

#[test]
fn test_link_url_matches_substring_exactly() {
    let text = "See (https://example.com/a) or \"https://example.com/b\" today";
    let result = extract_with_patterns(text, None, &PatternOptions::default());

    let urls: Vec<_> = result
        .action_items
        .iter()
        .filter_map(|i| i.url.as_deref())
        .collect();
    assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
}

#[test]
fn test_deadline_due_january() {
    let text = "Your assignment is due January 20th.";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    let deadline = result
        .action_items
        .iter()
        .find(|i| i.action_type == ActionType::Deadline)
        .expect("deadline item");
    assert_eq!(deadline.confidence, DEADLINE_CONFIDENCE);
    assert_eq!(deadline.priority, Priority::High);

    let due = deadline.due_date.expect("derivable due date");
    assert_eq!(due.month(), 1);
    assert_eq!(due.day(), 20);
    assert_eq!(due.year(), 2026);
}

#[test]
fn test_deadline_with_explicit_year() {
    let text = "Submissions close by March 3, 2027 at midnight.";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    let deadline = result
        .action_items
        .iter()
        .find(|i| i.action_type == ActionType::Deadline)
        .expect("deadline item");
    assert_eq!(
        deadline.due_date,
        NaiveDate::from_ymd_opt(2027, 3, 3)
    );
}

#[test]
fn test_yearless_date_rolls_to_next_occurrence() {
    // Reference date is past Jan 20, so the date lands in the next year
    let text = "Entries are due Jan 20.";
    let result = extract_with_patterns(text, None, &options(2026, 6, 1));

    let due = result.action_items[0].due_date.expect("due date");
    assert_eq!(due, NaiveDate::from_ymd_opt(2027, 1, 20).unwrap());
}

#[test]
fn test_leap_day_rolls_to_next_leap_year() {
    // Feb 29 does not exist in the reference year; the date still resolves
    // to its next occurrence rather than being dropped
    let text = "Offer expires Feb 29.";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    let deadline = result
        .action_items
        .iter()
        .find(|i| i.action_type == ActionType::Deadline)
        .expect("deadline item");
    assert_eq!(
        deadline.due_date,
        NaiveDate::from_ymd_opt(2028, 2, 29)
    );
}

#[test]
fn test_invalid_day_leaves_due_date_unset() {
    // February 30th exists in no year; the item is still emitted, just
    // without a derivable due date
    let text = "Report due February 30th.";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    let deadline = result
        .action_items
        .iter()
        .find(|i| i.action_type == ActionType::Deadline)
        .expect("deadline item");
    assert!(deadline.due_date.is_none());
}

#[test]
fn test_event_with_time() {
    let text = "Meeting scheduled for January 20th at 2:00 PM in the main hall.";
    let result = extract_with_patterns(text, Some("Planning sync"), &options(2026, 1, 1));

    let item = result
        .action_items
        .iter()
        .find(|i| i.action_type == ActionType::Event)
        .expect("event item");
    assert_eq!(item.confidence, EVENT_CONFIDENCE);

    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.title, "Planning sync");
    assert_eq!(event.start_time.date_naive().day(), 20);
    assert_eq!(event.start_time.hour(), 14);
    assert_eq!(event.start_time.minute(), 0);
    assert!(event.end_time.is_none());
}

#[test]
fn test_event_without_time_defaults_to_morning() {
    let text = "Our webinar on February 5 covers the roadmap.";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events[0].start_time.hour(), 9);
}

#[test]
fn test_event_title_falls_back_to_match() {
    let text = "Conference planned for April 2.";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    assert_eq!(result.events[0].title, "Conference planned for April 2");
}

#[test]
fn test_rsvp_without_date() {
    let text = "Please RSVP at your earliest convenience.";
    let result = extract_with_patterns(text, None, &PatternOptions::default());

    let rsvp = result
        .action_items
        .iter()
        .find(|i| i.action_type == ActionType::Rsvp)
        .expect("rsvp item");
    assert_eq!(rsvp.confidence, RSVP_CONFIDENCE);
    assert!(rsvp.due_date.is_none());
}

#[test]
fn test_location_extraction() {
    let text = "Venue: Grand Hall, Portland. Doors open early.";
    let result = extract_with_patterns(text, None, &PatternOptions::default());

    let location = result
        .action_items
        .iter()
        .find(|i| i.action_type == ActionType::Location)
        .expect("location item");
    assert_eq!(location.confidence, LOCATION_CONFIDENCE);
    assert_eq!(location.location.as_deref(), Some("Grand Hall, Portland"));
}

#[test]
fn test_overlapping_rules_yield_multiple_items() {
    // "RSVP by Jan 18th" satisfies both the rsvp and deadline rules; no
    // dedup is performed at this layer.
    let text = "Please RSVP by Jan 18th.";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    assert!(
        result
            .action_items
            .iter()
            .any(|i| i.action_type == ActionType::Rsvp)
    );
    assert!(
        result
            .action_items
            .iter()
            .any(|i| i.action_type == ActionType::Deadline)
    );
}

#[test]
fn test_one_reason_per_firing_rule() {
    let text = "Report due June 1st. See https://a.example.com and https://b.example.com";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    // Two links but only one link reason; one deadline reason
    assert_eq!(result.extraction_reasons.len(), 2);
    let link_reason = result
        .extraction_reasons
        .iter()
        .find(|r| r.action_type == ActionType::Link)
        .expect("link reason");
    assert_eq!(link_reason.confidence, LINK_CONFIDENCE);
    assert_eq!(link_reason.method, ExtractionMethod::Pattern);
    assert!(!link_reason.pattern.is_empty());
}

#[test]
fn test_summary_takes_first_three_sentences() {
    let text = "Alpha one. Beta two. Gamma three. Report due January 20th.";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    assert_eq!(result.summary, "Alpha one. Beta two. Gamma three.");
}

#[test]
fn test_key_quotes_cover_matched_sentences() {
    let text = "Alpha one. Beta two. Gamma three. Report due January 20th.";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    assert_eq!(result.key_quotes, vec!["Report due January 20th."]);
}

#[test]
fn test_default_priority_table() {
    assert_eq!(default_priority(ActionType::Deadline), Priority::High);
    assert_eq!(default_priority(ActionType::Event), Priority::Medium);
    assert_eq!(default_priority(ActionType::Rsvp), Priority::Medium);
    assert_eq!(default_priority(ActionType::Location), Priority::Low);
    assert_eq!(default_priority(ActionType::Link), Priority::Low);
}

#[test]
fn test_end_to_end_three_items() {
    let text = "Please RSVP by Jan 18th. Meeting scheduled for January 20th at 2:00 PM. \
                Details: https://example.com/meeting";
    let result = extract_with_patterns(text, None, &options(2026, 1, 1));

    let deadline = result
        .action_items
        .iter()
        .find(|i| i.action_type == ActionType::Deadline)
        .expect("deadline item");
    assert_eq!(deadline.confidence, 0.8);

    let event = result
        .action_items
        .iter()
        .find(|i| i.action_type == ActionType::Event)
        .expect("event item");
    assert_eq!(event.confidence, 0.7);

    let link = result
        .action_items
        .iter()
        .find(|i| i.action_type == ActionType::Link)
        .expect("link item");
    assert_eq!(link.confidence, 0.95);
    assert_eq!(link.url.as_deref(), Some("https://example.com/meeting"));

    assert!(result.action_items.len() >= 3);
}
