//! Barcode decode events and duplicate suppression.
//!
//! Camera integrations fire the decode callback on every frame that still
//! shows the same code. Each callback becomes a [`ScanEvent`] value and is
//! passed through a [`ScanDeduplicator`], which remembers only the last
//! accepted barcode and when it was seen.

use crate::domain::BarcodeFormat;
use chrono::{DateTime, Duration, Utc};

/// One decode callback from the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    /// Decoded payload.
    pub barcode: String,
    /// Symbology reported by the camera.
    pub format: BarcodeFormat,
    /// Arrival time of the callback.
    pub at: DateTime<Utc>,
}

impl ScanEvent {
    /// Creates a scan event.
    #[must_use]
    pub fn new(barcode: impl Into<String>, format: BarcodeFormat, at: DateTime<Utc>) -> Self {
        Self {
            barcode: barcode.into(),
            format,
            at,
        }
    }
}

/// Whether a decode event should be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanVerdict {
    Accept,
    Suppress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RememberedScan {
    barcode: String,
    at: DateTime<Utc>,
}

/// Suppresses repeated decodes of one barcode inside a time window.
#[derive(Debug, Clone)]
pub struct ScanDeduplicator {
    window: Duration,
    remembered: Option<RememberedScan>,
}

impl ScanDeduplicator {
    /// Creates a deduplicator with the given window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            remembered: None,
        }
    }

    /// Decides whether `event` is new.
    ///
    /// A suppressed event does not extend the window; only accepted events
    /// replace the remembered pair.
    pub fn observe(&mut self, event: &ScanEvent) -> ScanVerdict {
        if let Some(remembered) = &self.remembered {
            let elapsed = event.at.signed_duration_since(remembered.at);
            if remembered.barcode == event.barcode && elapsed < self.window {
                tracing::debug!(
                    barcode = %event.barcode,
                    elapsed_ms = elapsed.num_milliseconds(),
                    "duplicate scan suppressed"
                );
                return ScanVerdict::Suppress;
            }
        }

        self.remembered = Some(RememberedScan {
            barcode: event.barcode.clone(),
            at: event.at,
        });
        ScanVerdict::Accept
    }

    /// Forgets the remembered scan once its window has elapsed by `now`.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let expired = self
            .remembered
            .as_ref()
            .is_some_and(|remembered| now.signed_duration_since(remembered.at) >= self.window);
        if expired {
            self.remembered = None;
        }
    }

    /// Forgets the remembered scan unconditionally.
    pub fn reset(&mut self) {
        self.remembered = None;
    }

    /// Returns the barcode currently inside its dedup window, if any.
    #[must_use]
    pub fn remembered_barcode(&self) -> Option<&str> {
        self.remembered.as_ref().map(|r| r.barcode.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(code: &str, at: DateTime<Utc>) -> ScanEvent {
        ScanEvent::new(code, BarcodeFormat::Ean13, at)
    }

    #[test]
    fn repeated_frames_are_suppressed_inside_window() {
        let start = Utc::now();
        let mut dedup = ScanDeduplicator::new(Duration::milliseconds(1500));

        assert_eq!(dedup.observe(&scan("4006381333931", start)), ScanVerdict::Accept);
        for offset in [16, 33, 500, 1499] {
            let at = start + Duration::milliseconds(offset);
            assert_eq!(dedup.observe(&scan("4006381333931", at)), ScanVerdict::Suppress);
        }
    }

    #[test]
    fn same_code_is_accepted_after_window() {
        let start = Utc::now();
        let mut dedup = ScanDeduplicator::new(Duration::milliseconds(1500));

        dedup.observe(&scan("123", start));
        let later = start + Duration::milliseconds(1500);
        assert_eq!(dedup.observe(&scan("123", later)), ScanVerdict::Accept);
    }

    #[test]
    fn suppressed_events_do_not_extend_the_window() {
        let start = Utc::now();
        let mut dedup = ScanDeduplicator::new(Duration::milliseconds(1000));

        dedup.observe(&scan("123", start));
        dedup.observe(&scan("123", start + Duration::milliseconds(900)));
        let after = start + Duration::milliseconds(1000);
        assert_eq!(dedup.observe(&scan("123", after)), ScanVerdict::Accept);
    }

    #[test]
    fn different_code_replaces_remembered_scan() {
        let start = Utc::now();
        let mut dedup = ScanDeduplicator::new(Duration::milliseconds(1500));

        dedup.observe(&scan("111", start));
        let next = start + Duration::milliseconds(10);
        assert_eq!(dedup.observe(&scan("222", next)), ScanVerdict::Accept);
        assert_eq!(dedup.remembered_barcode(), Some("222"));
        assert_eq!(
            dedup.observe(&scan("111", next + Duration::milliseconds(10))),
            ScanVerdict::Accept
        );
    }

    #[test]
    fn prune_forgets_expired_scan() {
        let start = Utc::now();
        let mut dedup = ScanDeduplicator::new(Duration::milliseconds(1500));

        dedup.observe(&scan("123", start));
        dedup.prune(start + Duration::milliseconds(1000));
        assert_eq!(dedup.remembered_barcode(), Some("123"));
        dedup.prune(start + Duration::milliseconds(1500));
        assert_eq!(dedup.remembered_barcode(), None);
    }
}
