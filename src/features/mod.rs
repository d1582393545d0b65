//! Feature view-models for notes, flashcards, and quizzes
//!
//! Each view-model is a small state machine driven by discrete user actions.
//! Generation outcomes arrive asynchronously and are tagged with the
//! `RequestToken` issued when the request started; only the outcome for the
//! latest token is applied.

pub mod flashcards;
pub mod notes;
pub mod quiz;

pub use flashcards::{Deck, FlashcardsState, FlashcardsView};
pub use notes::{NotesStatus, NotesView};
pub use quiz::{OptionFeedback, QuizActionError, QuizSession, QuizState, QuizView};

use crate::data::Feature;
use crate::fallback::{GenerationError, Source};

/// Identifies one generation request of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing request tokens and tracks the pending one
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
    pending: bool,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token that supersedes every earlier one
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        self.pending = true;
        RequestToken(self.latest)
    }

    /// Accepts the outcome for `token` if it is the pending, latest request.
    ///
    /// Each token is accepted at most once.
    pub fn accept(&mut self, token: RequestToken) -> bool {
        if self.pending && token.0 == self.latest {
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// Whether a request is in flight
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    /// Content was served from the cache
    Degraded,
    Error,
}

/// A transient, user-facing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }

    /// Notice shown when `feature` content came from the cache after a failure
    pub fn degraded(feature: Feature, source: Source) -> Self {
        let mut message = format!("Loaded cached {} instead.", feature.label());
        if let Source::Cache {
            cached_at: Some(cached_at),
        } = source
        {
            message.push_str(&format!(" Saved {}.", cached_at.format("%Y-%m-%d %H:%M UTC")));
        }
        Self::new(NoticeLevel::Degraded, "Backend offline", message)
    }

    /// Notice for a failed generation attempt
    pub fn from_error(feature: Feature, error: &GenerationError) -> Self {
        match error {
            GenerationError::EmptyInput => Self::error("No content provided", "Enter some text first!"),
            GenerationError::Unavailable { .. } => Self::error(
                "Error",
                format!("Failed to generate {}. Try again.", feature.label()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BackendError;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_tracker_tokens_increase() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(second > first);
        assert_eq!(second.value(), 2);
    }

    #[test]
    fn test_tracker_rejects_stale_token() {
        let mut tracker = RequestTracker::new();
        let stale = tracker.issue();
        let latest = tracker.issue();

        assert!(!tracker.accept(stale), "Superseded token must be discarded");
        assert!(tracker.is_pending());
        assert!(tracker.accept(latest));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn test_tracker_accepts_token_once() {
        let mut tracker = RequestTracker::new();
        let token = tracker.issue();
        assert!(tracker.accept(token));
        assert!(!tracker.accept(token));
    }

    #[test]
    fn test_degraded_notice_mentions_cache_time() {
        let cached_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let notice = Notice::degraded(
            Feature::Notes,
            Source::Cache {
                cached_at: Some(cached_at),
            },
        );
        assert_eq!(notice.level, NoticeLevel::Degraded);
        assert_eq!(notice.title, "Backend offline");
        assert!(notice.message.contains("cached notes"));
        assert!(notice.message.contains("2026-03-01 09:30 UTC"));
    }

    #[test]
    fn test_error_notices() {
        let empty = Notice::from_error(Feature::Quiz, &GenerationError::EmptyInput);
        assert_eq!(empty.title, "No content provided");

        let unavailable = Notice::from_error(
            Feature::Quiz,
            &GenerationError::Unavailable {
                feature: Feature::Quiz,
                source: BackendError::Schema("bad".to_string()),
            },
        );
        assert_eq!(unavailable.level, NoticeLevel::Error);
        assert!(unavailable.message.contains("quiz"));
    }
}
