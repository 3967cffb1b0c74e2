//! Status - 送信状況の集計

use serde::{Deserialize, Serialize};

/// Snapshot of what is still waiting in `PendingEvents`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCounts {
    pub owners: usize,
    pub events: usize,
}

/// Outcome of one or more dispatch passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Container and task changes delivered.
    pub sent: usize,
    /// Attachment announcements delivered.
    pub attachments_sent: usize,
    /// Redundant envelopes removed without sending.
    pub dropped: usize,
    /// Owners whose pass stopped on a sink error.
    pub failed: usize,
}

impl DispatchReport {
    pub fn merge(&mut self, other: DispatchReport) {
        self.sent += other.sent;
        self.attachments_sent += other.attachments_sent;
        self.dropped += other.dropped;
        self.failed += other.failed;
    }

    pub fn delivered(&self) -> usize {
        self.sent + self.attachments_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adds_every_counter() {
        let mut total = DispatchReport {
            sent: 1,
            attachments_sent: 0,
            dropped: 2,
            failed: 0,
        };
        total.merge(DispatchReport {
            sent: 3,
            attachments_sent: 1,
            dropped: 0,
            failed: 1,
        });
        assert_eq!(
            total,
            DispatchReport {
                sent: 4,
                attachments_sent: 1,
                dropped: 2,
                failed: 1,
            }
        );
        assert_eq!(total.delivered(), 5);
    }
}
