//! Follow-up satisfaction rating dialog.
//!
//! The dialog is a small state machine:
//!
//! ```text
//! closed --open--> open(None) --select(n)--> open(Some(n)) --submit--> closed
//! ```
//!
//! Submission is only possible with a selection; submitting hands the rating
//! to the caller's callback, clears the selection and closes the dialog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of stars shown.
pub const MAX_STARS: u8 = 5;

/// A star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=MAX_STARS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> Self {
        r.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("rating {0} is outside 1..=5")]
    OutOfRange(u8),
    #[error("rating dialog is closed")]
    DialogClosed,
    #[error("no rating selected; submission is disabled")]
    NothingSelected,
}

/// Local state of the rating dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingDialog {
    open: bool,
    rating: Option<Rating>,
}

impl RatingDialog {
    /// A closed dialog with no selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A dialog that is already open.
    #[must_use]
    pub fn opened() -> Self {
        Self {
            open: true,
            rating: None,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Dismiss without submitting. A pending selection is kept.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Apply an open/close request from the host view.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    #[must_use]
    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    /// Choose `stars` (1..=5). Replaces any earlier choice.
    pub fn select(&mut self, stars: u8) -> Result<Rating, RatingError> {
        if !self.open {
            return Err(RatingError::DialogClosed);
        }
        let rating = Rating::try_from(stars)?;
        self.rating = Some(rating);
        Ok(rating)
    }

    /// Whether the submit button is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.rating.is_some()
    }

    /// Filled state for each star, first to last.
    #[must_use]
    pub fn stars(&self) -> [bool; MAX_STARS as usize] {
        let selected = self.rating.map_or(0, Rating::get);
        std::array::from_fn(|i| i < usize::from(selected))
    }

    /// Report the selection through `on_submit`, then reset and close.
    pub fn submit<F>(&mut self, on_submit: F) -> Result<Rating, RatingError>
    where
        F: FnOnce(Rating),
    {
        let rating = self.rating.ok_or(RatingError::NothingSelected)?;
        on_submit(rating);
        self.rating = None;
        self.open = false;
        Ok(rating)
    }
}

/// A submitted rating, as handed to a [`RatingSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingSubmission {
    pub rating: Rating,
    pub submitted_at: DateTime<Utc>,
}

impl RatingSubmission {
    #[must_use]
    pub fn now(rating: Rating) -> Self {
        Self {
            rating,
            submitted_at: Utc::now(),
        }
    }
}

/// Receiver of submitted ratings; the host application's submit callback.
pub trait RatingSink: Send + Sync {
    fn record(&self, submission: RatingSubmission);
}

/// Sink that only logs the submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRatingSink;

impl RatingSink for TracingRatingSink {
    fn record(&self, submission: RatingSubmission) {
        tracing::info!(
            name: "rating.submitted",
            rating = submission.rating.get(),
            submitted_at = %submission.submitted_at.to_rfc3339(),
            "Follow-up rating submitted"
        );
    }
}
