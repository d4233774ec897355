//! Notification sink for transient banners.
//!
//! The sink exclusively owns the list of banners attached to the page anchor.
//! Banners are inserted most-recent-first and never deduplicated. Expiry is
//! driven from the outside: the coordinator schedules a fade timer per banner
//! and calls [`NotificationSink::begin_fade`] and then
//! [`NotificationSink::detach`] when those timers fire. A manual dismissal
//! detaches the banner at once; the timers that fire later find nothing to do.
//!
//! # Example
//!
//! ```rust
//! use hangar_coordinator::notify::NotificationSink;
//! use hangar_coordinator::domain::Severity;
//! use std::time::Duration;
//!
//! let mut sink = NotificationSink::default();
//! let first = sink.notify("Sync started successfully!", Severity::Success, Duration::ZERO);
//! let second = sink.notify("Sync started successfully!", Severity::Success, Duration::ZERO);
//! assert_ne!(first, second);
//! assert_eq!(sink.banners()[0].id, second);
//! ```

use crate::domain::{BannerPhase, Notification, NotificationId, Severity};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct NotificationSink {
    /// Attached banners, newest first.
    banners: Vec<Notification>,
    next_id: u64,
}

impl NotificationSink {
    /// Inserts a banner at the top of the anchor and returns its id.
    pub fn notify(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Duration,
    ) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        let message = message.into();

        tracing::debug!(
            notification_id = id.0,
            severity = %severity,
            message = %message,
            "notification shown"
        );

        self.banners.insert(
            0,
            Notification {
                id,
                message,
                severity,
                created_at: now,
                phase: BannerPhase::Visible,
            },
        );
        id
    }

    /// Starts the fade-out of a visible banner.
    ///
    /// Returns `false` when the banner is already gone or already fading.
    pub fn begin_fade(&mut self, id: NotificationId) -> bool {
        match self.banners.iter_mut().find(|b| b.id == id) {
            Some(banner) if banner.phase == BannerPhase::Visible => {
                banner.phase = BannerPhase::Fading;
                true
            }
            _ => false,
        }
    }

    /// Removes a banner from the anchor. Returns `false` if it was not attached.
    pub fn detach(&mut self, id: NotificationId) -> bool {
        let before = self.banners.len();
        self.banners.retain(|b| b.id != id);
        let removed = self.banners.len() != before;
        if removed {
            tracing::debug!(notification_id = id.0, "notification detached");
        }
        removed
    }

    /// User-initiated close. Takes effect immediately, fading or not.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        tracing::debug!(notification_id = id.0, "notification dismissed");
        self.detach(id)
    }

    #[must_use]
    pub fn banners(&self) -> &[Notification] {
        &self.banners
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_banner_comes_first() {
        let mut sink = NotificationSink::default();
        sink.notify("first", Severity::Info, Duration::from_millis(10));
        sink.notify("second", Severity::Danger, Duration::from_millis(20));

        let messages: Vec<&str> = sink.banners().iter().map(|b| b.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn fade_then_detach() {
        let mut sink = NotificationSink::default();
        let id = sink.notify("Sync failed", Severity::Danger, Duration::ZERO);

        assert!(sink.begin_fade(id));
        assert!(!sink.begin_fade(id));
        assert_eq!(sink.banners()[0].phase, BannerPhase::Fading);

        assert!(sink.detach(id));
        assert!(sink.is_empty());
    }

    #[test]
    fn dismissed_banner_ignores_later_timers() {
        let mut sink = NotificationSink::default();
        let keep = sink.notify("keep", Severity::Info, Duration::ZERO);
        let gone = sink.notify("gone", Severity::Info, Duration::ZERO);

        assert!(sink.dismiss(gone));
        assert!(!sink.begin_fade(gone));
        assert!(!sink.detach(gone));
        assert_eq!(sink.banners().len(), 1);
        assert_eq!(sink.banners()[0].id, keep);
    }
}
