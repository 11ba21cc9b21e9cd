//! Extraction engine with service delegation and graceful fallback
//!
//! The fallback chain is an explicit ordered list of strategies: remote
//! service, then local patterns, then the zero-value safe result. The first
//! non-failing strategy wins, and nothing below this boundary raises.

use crate::error::ServiceError;
use crate::patterns::{PatternOptions, extract_with_patterns};
use crate::types::ExtractionResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Request sent across the external extraction service boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub email_content: String,
    pub subject: Option<String>,
    pub sender: Option<String>,
}

/// One email submitted to a batch extraction pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailInput {
    pub message_id: String,
    pub email_content: String,
    pub subject: Option<String>,
    pub sender: Option<String>,
}

impl EmailInput {
    fn to_request(&self) -> ExtractionRequest {
        ExtractionRequest {
            email_content: self.email_content.clone(),
            subject: self.subject.clone(),
            sender: self.sender.clone(),
        }
    }
}

/// Per-email outcome of a batch pass, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub message_id: String,
    pub result: ExtractionResult,
}

/// Abstracted external extraction service.
///
/// Implementations own transport, authentication and timeouts; every
/// failure mode is reported as a [`ServiceError`] and recovered locally.
///
/// Execution is single-threaded and event-driven, so futures need no
/// auto-trait bounds here.
#[allow(async_fn_in_trait)]
pub trait ExtractionService {
    async fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResult, ServiceError>;

    /// Extract a whole chunk in one round-trip.
    ///
    /// The default issues one call per request; transports with a batch
    /// endpoint override this. Results must line up with `requests`.
    async fn extract_batch(
        &self,
        requests: &[ExtractionRequest],
    ) -> Vec<Result<ExtractionResult, ServiceError>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.extract(request).await);
        }
        results
    }
}

/// Marker service for an extractor running on local patterns only
#[derive(Debug, Clone, Copy)]
pub struct NoService;

impl ExtractionService for NoService {
    async fn extract(
        &self,
        _request: &ExtractionRequest,
    ) -> Result<ExtractionResult, ServiceError> {
        Err(ServiceError::Transport("no service configured".into()))
    }
}

/// Stateless extraction engine.
///
/// Construct one per collaborator and inject the service; there is no
/// global instance and no shared mutable state, so concurrent calls for
/// different emails need no coordination and abandoning a pending call
/// leaves nothing to roll back.
#[derive(Debug)]
pub struct Extractor<S = NoService> {
    service: Option<S>,
    options: PatternOptions,
}

impl Extractor<NoService> {
    /// Engine using only the local pattern library
    #[must_use]
    pub fn local() -> Self {
        Self {
            service: None,
            options: PatternOptions::default(),
        }
    }
}

impl<S: ExtractionService> Extractor<S> {
    #[must_use]
    pub fn new(service: S) -> Self {
        Self {
            service: Some(service),
            options: PatternOptions::default(),
        }
    }

    /// Override the reference date used to resolve year-less dates
    #[must_use]
    pub const fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.options.reference_date = date;
        self
    }

    /// Extract actions and events from one email.
    ///
    /// Never fails: a service error degrades to the pattern library, and an
    /// email with no text degrades to the zero-value safe result.
    pub async fn extract(
        &self,
        email_content: &str,
        subject: Option<&str>,
        sender: Option<&str>,
    ) -> ExtractionResult {
        if let Some(service) = &self.service {
            let request = ExtractionRequest {
                email_content: email_content.to_string(),
                subject: subject.map(ToString::to_string),
                sender: sender.map(ToString::to_string),
            };
            match service.extract(&request).await {
                Ok(result) => {
                    debug!(
                        "service extraction produced {} items",
                        result.action_items.len()
                    );
                    return result;
                }
                Err(err) => {
                    warn!("extraction service failed, falling back to patterns: {err}");
                }
            }
        }
        self.run_patterns(email_content, subject)
    }

    /// Extract for many emails, `batch_size` per service round-trip.
    ///
    /// Fallback is applied per item, not per batch: a failing or missing
    /// entry degrades alone and never aborts its siblings.
    pub async fn extract_batch(
        &self,
        inputs: &[EmailInput],
        batch_size: usize,
    ) -> Vec<BatchItem> {
        let mut out = Vec::with_capacity(inputs.len());
        for chunk in inputs.chunks(batch_size.max(1)) {
            match &self.service {
                Some(service) => {
                    let requests: Vec<ExtractionRequest> =
                        chunk.iter().map(EmailInput::to_request).collect();
                    let mut results = service.extract_batch(&requests).await;

                    // A short or oversized reply is a per-item failure, not
                    // a batch abort.
                    results.truncate(chunk.len());
                    results.resize_with(chunk.len(), || {
                        Err(ServiceError::MalformedResponse(
                            "missing batch entry".into(),
                        ))
                    });

                    for (input, service_result) in chunk.iter().zip(results) {
                        let result = match service_result {
                            Ok(result) => result,
                            Err(err) => {
                                warn!(
                                    "batch extraction failed for {}, falling back: {err}",
                                    input.message_id
                                );
                                self.run_patterns(
                                    &input.email_content,
                                    input.subject.as_deref(),
                                )
                            }
                        };
                        out.push(BatchItem {
                            message_id: input.message_id.clone(),
                            result,
                        });
                    }
                }
                None => {
                    for input in chunk {
                        out.push(BatchItem {
                            message_id: input.message_id.clone(),
                            result: self
                                .run_patterns(&input.email_content, input.subject.as_deref()),
                        });
                    }
                }
            }
        }
        out
    }

    fn run_patterns(&self, email_content: &str, subject: Option<&str>) -> ExtractionResult {
        if email_content.trim().is_empty() {
            return ExtractionResult::unprocessed();
        }
        let result = extract_with_patterns(email_content, subject, &self.options);
        debug!(
            "pattern extraction produced {} items",
            result.action_items.len()
        );
        result
    }
}

/// Validate and decode a service response body into an [`ExtractionResult`].
///
/// Any shape mismatch is a `MalformedResponse`, which routes the caller to
/// local fallback.
pub fn parse_service_payload(body: &str) -> Result<ExtractionResult, ServiceError> {
    serde_json::from_str(body).map_err(|e| ServiceError::MalformedResponse(e.to_string()))
}
