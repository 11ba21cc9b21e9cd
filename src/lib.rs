// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Action/Event Extraction Engine
//!
//! Turns unstructured newsletter/email text into structured,
//! confidence-scored action items, groups them into per-email digests, and
//! groups digests by category for a dashboard view.
//!
//! # Features
//!
//! - Fixed-confidence pattern recognizers for deadlines, events, RSVPs,
//!   locations, and links
//! - An injectable external extraction service with graceful degradation:
//!   remote service, then local patterns, then a zero-value safe result
//! - Per-email digest cards with derived importance
//! - Category grouping ordered by recency
//!
//! # Example
//!
//! ```rust
//! use action_extract::{PatternOptions, extract_with_patterns};
//!
//! let text = "Please RSVP by Jan 18th. Details: https://example.com/meeting";
//! let result = extract_with_patterns(text, None, &PatternOptions::default());
//!
//! assert!(!result.action_items.is_empty());
//! assert!(!result.extraction_reasons.is_empty());
//! ```

mod digest;
mod error;
mod extractor;
mod patterns;
mod types;

pub use digest::*;
pub use error::{Result, ServiceError};
pub use extractor::*;
pub use patterns::*;
pub use types::*;
