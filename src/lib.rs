//! Follow-up chat widgets
//!
//! Presentational components for a patient follow-up chat application,
//! rendered as HTML fragments and served HTMX-style by Axum.
//!
//! # Architecture
//!
//! - **Commentator**: critiques the conversation through a chat-completion API,
//!   at most once per new message
//! - **Patient dialog**: read-only rendering of a medical record
//! - **Rating dialog**: 1–5 star satisfaction capture with a submit callback
//! - **Server**: Axum routes exposing the widgets as fragments
//!
//! # Modules
//!
//! - [`commentator`]: request guard and widget state
//! - [`config`]: layered application configuration
//! - [`llm`]: chat-completion client
//! - [`patient`]: patient record types
//! - [`rating`]: rating dialog state machine
//! - [`transcript`]: chat messages
//! - [`ui`]: HTML fragment rendering

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod commentator;
pub mod config;
pub mod llm;
pub mod patient;
pub mod rating;
pub mod server;
pub mod transcript;
pub mod ui;

use std::sync::Arc;

use crate::commentator::CommentatorStore;
use crate::config::AppConfig;
use crate::llm::CompletionClient;
use crate::rating::RatingSink;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Commentators keyed by conversation id.
    pub commentators: CommentatorStore,
    /// Receives submitted ratings.
    pub rating_sink: Arc<dyn RatingSink>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("commentators", &self.commentators)
            .field("config", &self.config)
            .finish()
    }
}

impl AppState {
    /// Build state around a completion client and a rating sink.
    #[must_use]
    pub fn new(
        config: Arc<AppConfig>,
        client: Arc<dyn CompletionClient>,
        rating_sink: Arc<dyn RatingSink>,
    ) -> Self {
        Self {
            commentators: CommentatorStore::new(client, config.commentator.clone()),
            rating_sink,
            config,
        }
    }
}
