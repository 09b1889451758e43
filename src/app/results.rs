//! Result set folding and response ordering.
//!
//! Every lookup (text or barcode) is tagged with a [`Seq`] drawn from one
//! [`Sequencer`]. The [`ResultSetReducer`] applies a response only when its
//! sequence number is newer than everything already applied and newer than
//! the last abandonment point, so completion order on the network never
//! decides what is shown.

use crate::domain::FoodRecord;
use crate::lookup::{LookupOutcome, LookupResponse};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic ordering key of a committed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seq(u64);

impl Seq {
    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues sequence numbers for text and barcode lookups alike.
///
/// Lives as long as the modal state that owns it; closing the modal does
/// not reset it, so responses from an earlier session can never look newer
/// than a query from a later one.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    last: u64,
}

impl Sequencer {
    /// Creates a sequencer that has not issued anything yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Issues the next sequence number.
    pub fn next_seq(&mut self) -> Seq {
        self.last += 1;
        Seq(self.last)
    }

    /// Returns the most recently issued sequence number, if any.
    #[must_use]
    pub const fn last_issued(&self) -> Option<Seq> {
        if self.last == 0 {
            None
        } else {
            Some(Seq(self.last))
        }
    }
}

/// Where the current result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    /// The caller's "recent foods" snapshot. Superseded by any lookup result.
    Recent,
    /// A lookup response with the given sequence number.
    Lookup(Seq),
}

/// Ordered records currently visible in the list, tagged with their origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub source: ResultSource,
    pub records: Vec<FoodRecord>,
}

impl ResultSet {
    /// Returns `true` if this is the recent-foods fallback.
    #[must_use]
    pub const fn is_recent(&self) -> bool {
        matches!(self.source, ResultSource::Recent)
    }
}

/// Outcome of offering a lookup response to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The response became the current result set.
    Applied,
    /// The lookup failed; the current result set is now empty.
    Failed {
        /// Failure description from the lookup boundary.
        message: String,
    },
    /// The response was older than what is shown or was abandoned. Dropped.
    Stale,
}

/// Folds lookup responses into the single current result set.
#[derive(Debug, Clone)]
pub struct ResultSetReducer {
    current: ResultSet,
    recent: Vec<FoodRecord>,
    highest_applied: Option<Seq>,
    abandoned_through: Option<Seq>,
}

impl Default for ResultSetReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSetReducer {
    /// Creates a reducer showing an empty recent-foods list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: ResultSet {
                source: ResultSource::Recent,
                records: Vec::new(),
            },
            recent: Vec::new(),
            highest_applied: None,
            abandoned_through: None,
        }
    }

    /// Returns the current result set.
    #[must_use]
    pub const fn current(&self) -> &ResultSet {
        &self.current
    }

    /// Replaces the recent-foods snapshot and shows it.
    pub fn load_recent(&mut self, recent: Vec<FoodRecord>) {
        self.recent = recent;
        self.show_recent();
    }

    /// Makes the recent-foods snapshot the current result set again.
    pub fn show_recent(&mut self) {
        self.current = ResultSet {
            source: ResultSource::Recent,
            records: self.recent.clone(),
        };
    }

    /// Marks every lookup up to and including `seq` as abandoned.
    ///
    /// Their responses will still arrive but are dropped as stale.
    pub fn abandon_through(&mut self, seq: Option<Seq>) {
        if seq > self.abandoned_through {
            tracing::debug!(abandoned_through = ?seq, "abandoning in-flight lookups");
            self.abandoned_through = seq;
        }
    }

    /// Returns `true` if a response with `seq` would be dropped.
    #[must_use]
    pub fn is_stale(&self, seq: Seq) -> bool {
        let superseded = self.highest_applied.is_some_and(|applied| seq <= applied);
        let abandoned = self.abandoned_through.is_some_and(|through| seq <= through);
        superseded || abandoned
    }

    /// Offers a lookup response; applies it unless it is stale.
    pub fn apply(&mut self, response: &LookupResponse) -> ApplyOutcome {
        if self.is_stale(response.seq) {
            tracing::debug!(
                seq = %response.seq,
                highest_applied = ?self.highest_applied,
                abandoned_through = ?self.abandoned_through,
                "dropping stale lookup response"
            );
            return ApplyOutcome::Stale;
        }

        self.highest_applied = Some(response.seq);
        let source = ResultSource::Lookup(response.seq);

        match &response.outcome {
            LookupOutcome::Found { records } => {
                tracing::debug!(seq = %response.seq, result_count = records.len(), "lookup response applied");
                self.current = ResultSet {
                    source,
                    records: records.clone(),
                };
                ApplyOutcome::Applied
            }
            LookupOutcome::Failed { message } => {
                self.current = ResultSet {
                    source,
                    records: Vec::new(),
                };
                ApplyOutcome::Failed {
                    message: message.clone(),
                }
            }
        }
    }
}
