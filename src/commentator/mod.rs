//! The commentator widget.
//!
//! A [`Commentator`] watches one conversation. Each call to
//! [`Commentator::observe`] corresponds to the transcript changing in the chat
//! view; at most one completion request is made per new last message, and
//! triggers arriving while a request is outstanding are dropped.
//!
//! # Architecture
//!
//! - [`Commentator`]: guard, request building and widget state
//! - [`CommentatorStore`]: one commentator per conversation id
//! - [`prompt`]: fixed system instruction and fallback text

pub mod prompt;
mod store;

pub use store::CommentatorStore;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::CommentatorConfig;
use crate::llm::{ChatCompletionRequest, ChatMessage, CompletionClient};
use crate::transcript::Transcript;

use prompt::{ANALYSIS_PREFIX, COMMENTATOR_SYSTEM_PROMPT, FALLBACK_COMMENT};

/// What the widget currently displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommentarySnapshot {
    /// Last displayed commentary (empty before the first one).
    pub comment: String,
    /// True while a completion request is outstanding.
    pub is_loading: bool,
    /// Id of the last message a request was issued for.
    pub last_commented_id: Option<u64>,
}

/// Why an observation did not issue a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    InFlight,
    EmptyTranscript,
    AlreadyCommented,
}

/// Result of a single [`Commentator::observe`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// A request was issued and returned commentary.
    Commented { message_id: u64, comment: String },
    /// A request was issued and failed; the fallback text is displayed.
    Fallback { message_id: u64 },
    /// No request was issued.
    Skipped(SkipReason),
}

impl Observation {
    /// Whether this observation sent a completion request.
    #[must_use]
    pub fn requested(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// Sarcastic commentator for one conversation.
pub struct Commentator {
    client: Arc<dyn CompletionClient>,
    model: String,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
    in_flight: AtomicBool,
    state: RwLock<CommentarySnapshot>,
}

impl std::fmt::Debug for Commentator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commentator")
            .field("model", &self.model)
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .field("state", &self.snapshot())
            .finish()
    }
}

/// Clears the in-flight flag and loading state when dropped, so both settle
/// even if the observing future is dropped mid-request.
struct InFlightGuard<'a> {
    owner: &'a Commentator,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(owner: &'a Commentator) -> Option<Self> {
        owner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { owner })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.update(|s| s.is_loading = false);
        self.owner.in_flight.store(false, Ordering::Release);
    }
}

impl Commentator {
    /// Create a commentator using `client` and the sampling settings in `config`.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>, config: &CommentatorConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| COMMENTATOR_SYSTEM_PROMPT.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            in_flight: AtomicBool::new(false),
            state: RwLock::new(CommentarySnapshot::default()),
        }
    }

    /// Current widget state.
    #[must_use]
    pub fn snapshot(&self) -> CommentarySnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a completion request is outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// React to the transcript as it currently stands.
    ///
    /// Issues a request only when none is in flight, the transcript is
    /// non-empty, and its last message has not been commented on yet. Every
    /// failure settles to [`FALLBACK_COMMENT`]; errors are logged, not
    /// returned.
    pub async fn observe(&self, transcript: &Transcript) -> Observation {
        if self.is_in_flight() {
            return Observation::Skipped(SkipReason::InFlight);
        }
        let Some(last) = transcript.last() else {
            return Observation::Skipped(SkipReason::EmptyTranscript);
        };
        let message_id = last.id;
        if self.snapshot().last_commented_id == Some(message_id) {
            return Observation::Skipped(SkipReason::AlreadyCommented);
        }
        let _guard = match self.claim(message_id) {
            Ok(guard) => guard,
            Err(reason) => return Observation::Skipped(reason),
        };

        let request = self.build_request(transcript);
        info!(
            name: "commentary.requested",
            message_id,
            message_count = transcript.len(),
            model = %self.model,
            "Requesting commentary"
        );

        match self.client.complete(&request).await {
            Ok(comment) => {
                debug!(message_id, comment_length = comment.len(), "Commentary received");
                self.update(|s| s.comment.clone_from(&comment));
                Observation::Commented {
                    message_id,
                    comment,
                }
            }
            Err(e) => {
                error!(
                    name: "commentary.failed",
                    message_id,
                    error = %e,
                    "Commentary generation failed"
                );
                self.update(|s| s.comment = FALLBACK_COMMENT.to_string());
                Observation::Fallback { message_id }
            }
        }
    }

    /// Build the completion request for `transcript`.
    #[must_use]
    pub fn build_request(&self, transcript: &Transcript) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_prompt.clone()),
                ChatMessage::user(format!("{ANALYSIS_PREFIX}{}", transcript.to_prompt_text())),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Take the in-flight guard and record `message_id` as commented on.
    ///
    /// The id is compared and recorded under one write lock while the guard
    /// is held, so a caller that passed the early check in `observe` cannot
    /// issue a second request for an id another caller already finished.
    fn claim(&self, message_id: u64) -> Result<InFlightGuard<'_>, SkipReason> {
        let guard = InFlightGuard::acquire(self).ok_or(SkipReason::InFlight)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.last_commented_id == Some(message_id) {
            drop(state);
            return Err(SkipReason::AlreadyCommented);
        }
        state.is_loading = true;
        state.last_commented_id = Some(message_id);
        drop(state);
        Ok(guard)
    }

    fn update(&self, f: impl FnOnce(&mut CommentarySnapshot)) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}
