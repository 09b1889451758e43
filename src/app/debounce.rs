//! Search input debouncing.
//!
//! Keystrokes arrive as raw `submit_input` calls. The debouncer keeps only
//! the latest text and commits it as a [`SearchQuery`] once the input has
//! been quiet for the configured interval. Time is always passed in by the
//! caller, which keeps the debouncer deterministic under test.

use super::results::{Seq, Sequencer};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A committed search, ready to be sent to the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Trimmed query text. Never empty.
    pub text: String,
    /// Ordering key assigned at commit time.
    pub seq: Seq,
}

/// Immediate result of submitting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    /// A commit is scheduled; the caller should poll again at `due_at`.
    Scheduled {
        /// Earliest time at which [`QueryDebouncer::poll`] commits the text.
        due_at: DateTime<Utc>,
    },
    /// The input is blank. Results must be cleared right now.
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingInput {
    text: String,
    due_at: DateTime<Utc>,
}

/// Rate-limits text input into committed search queries.
#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    quiet: Duration,
    pending: Option<PendingInput>,
}

impl QueryDebouncer {
    /// Creates a debouncer that waits `quiet` after the last keystroke.
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Records the latest input text.
    ///
    /// A due time past the end of the calendar saturates at
    /// `DateTime::<Utc>::MAX_UTC`. Blank input cancels any pending commit and returns
    /// [`InputSignal::Cleared`] without waiting.
    pub fn submit_input(&mut self, text: &str, now: DateTime<Utc>) -> InputSignal {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::trace!("blank input, clearing immediately");
            self.pending = None;
            return InputSignal::Cleared;
        }

        let due_at = now
            .checked_add_signed(self.quiet)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        tracing::trace!(query = %trimmed, due_at = %due_at, "input scheduled for commit");
        self.pending = Some(PendingInput {
            text: trimmed.to_string(),
            due_at,
        });
        InputSignal::Scheduled { due_at }
    }

    /// Commits the pending text if its quiet interval has elapsed by `now`.
    ///
    /// The sequence number is only consumed when a query is committed.
    pub fn poll(&mut self, now: DateTime<Utc>, sequencer: &mut Sequencer) -> Option<SearchQuery> {
        let due = self.pending.as_ref().is_some_and(|pending| pending.due_at <= now);
        if !due {
            return None;
        }

        let pending = self.pending.take()?;
        let query = SearchQuery {
            text: pending.text,
            seq: sequencer.next_seq(),
        };
        tracing::debug!(query = %query.text, seq = %query.seq, "search query committed");
        Some(query)
    }

    /// Returns when the pending input becomes due, if anything is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }

    /// Drops pending input without committing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
