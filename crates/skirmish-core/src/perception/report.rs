//! Per-frame perception summary.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Notable things that happened during one perception update.
    ///
    /// # Example
    ///
    /// ```
    /// use skirmish_core::perception::PerceptionEvents;
    ///
    /// let events = PerceptionEvents::FULL_DETECTION | PerceptionEvents::PLAYER_LOST;
    /// assert!(events.contains(PerceptionEvents::PLAYER_LOST));
    /// assert!(!events.contains(PerceptionEvents::PLAYER_RECOVERED));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PerceptionEvents: u8 {
        /// The tracked set was rebuilt from a full-frame detection
        const FULL_DETECTION = 1 << 0;
        /// The player tracker failed and redetection found nothing
        const PLAYER_LOST = 1 << 1;
        /// The player tracker failed but redetection found the player again
        const PLAYER_RECOVERED = 1 << 2;
    }
}

/// Outcome of one [`Perception::update`](super::Perception::update).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerceptionReport {
    /// Notable events
    pub events: PerceptionEvents,
    /// Entities whose tracker succeeded this frame (or that were just detected)
    pub tracked: usize,
    /// Entities lost and not recovered this frame
    pub lost: usize,
    /// Entities lost by their tracker but recovered by redetection
    pub recovered: usize,
}

impl PerceptionReport {
    /// Total entities in the tracked set after the update.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.tracked + self.lost + self.recovered
    }

    /// Whether this frame ran a full detection.
    #[must_use]
    pub fn ran_full_detection(&self) -> bool {
        self.events.contains(PerceptionEvents::FULL_DETECTION)
    }

    /// Whether the player ended the frame untracked.
    #[must_use]
    pub fn player_lost(&self) -> bool {
        self.events.contains(PerceptionEvents::PLAYER_LOST)
    }
}

impl fmt::Display for PerceptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tracked={} lost={} recovered={}",
            self.tracked, self.lost, self.recovered
        )?;
        if self.ran_full_detection() {
            write!(f, " [full detection]")?;
        }
        if self.player_lost() {
            write!(f, " [player lost]")?;
        }
        if self.events.contains(PerceptionEvents::PLAYER_RECOVERED) {
            write!(f, " [player recovered]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_and_flags() {
        let report = PerceptionReport {
            events: PerceptionEvents::FULL_DETECTION,
            tracked: 3,
            lost: 1,
            recovered: 2,
        };
        assert_eq!(report.total(), 6);
        assert!(report.ran_full_detection());
        assert!(!report.player_lost());
    }

    #[test]
    fn display_lists_events() {
        let report = PerceptionReport {
            events: PerceptionEvents::PLAYER_LOST,
            tracked: 0,
            lost: 2,
            recovered: 0,
        };
        assert_eq!(report.to_string(), "tracked=0 lost=2 recovered=0 [player lost]");
    }

    #[test]
    fn default_is_empty() {
        let report = PerceptionReport::default();
        assert!(report.events.is_empty());
        assert_eq!(report.total(), 0);
    }
}
