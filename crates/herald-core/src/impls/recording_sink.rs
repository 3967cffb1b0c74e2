//! RecordingSink - 開発・テスト用の送信先
//!
//! 受け付けた送信をメモリに記録し、`tracing` でログに出します。
//! `fail_next(n)` で次の n 件を失敗させられます（障害注入）。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Arn, ContainerStateChange, EventKind, TaskStateChange};
use crate::ports::{Clock, SinkError, StateChangeSink};

/// One accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub owner_arn: Arn,
    pub kind: EventKind,
    pub status: String,
    pub attachment: bool,
    pub rendered: String,
    pub submitted_at: DateTime<Utc>,
}

pub struct RecordingSink<C> {
    clock: C,
    submissions: Mutex<Vec<Submission>>,
    failures_left: AtomicUsize,
}

impl<C: Clock> RecordingSink<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            submissions: Mutex::new(Vec::new()),
            failures_left: AtomicUsize::new(0),
        }
    }

    /// Make the next `n` submissions fail with `SinkError::Unavailable`.
    pub fn fail_next(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn take_failure(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn record(&self, submission: Submission) -> Result<(), SinkError> {
        if self.take_failure() {
            tracing::warn!(owner_arn = %submission.owner_arn, "injected sink failure");
            return Err(SinkError::Unavailable("injected failure".to_string()));
        }
        tracing::info!(
            owner_arn = %submission.owner_arn,
            kind = ?submission.kind,
            status = %submission.status,
            "submitted {}",
            submission.rendered
        );
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(submission);
        Ok(())
    }
}

#[async_trait]
impl<C: Clock> StateChangeSink for RecordingSink<C> {
    async fn submit_container_change(
        &self,
        change: &ContainerStateChange,
    ) -> Result<(), SinkError> {
        self.record(Submission {
            owner_arn: change.owner_arn().clone(),
            kind: EventKind::Container,
            status: change.status.to_string(),
            attachment: false,
            rendered: change.to_string(),
            submitted_at: self.clock.now(),
        })
    }

    async fn submit_task_change(&self, change: &TaskStateChange) -> Result<(), SinkError> {
        self.record(Submission {
            owner_arn: change.owner_arn().clone(),
            kind: EventKind::Task,
            status: change.status.to_string(),
            attachment: change.attachment.is_some(),
            rendered: change.to_string(),
            submitted_at: self.clock.now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContainerStatus, TaskStatus};
    use crate::ports::FixedClock;
    use chrono::TimeZone;

    fn sink() -> RecordingSink<FixedClock> {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        RecordingSink::new(FixedClock::new(at))
    }

    #[tokio::test]
    async fn records_submissions_in_order() {
        let sink = sink();
        sink.submit_container_change(&ContainerStateChange::new(
            "arn:task/1",
            "web",
            ContainerStatus::Running,
        ))
        .await
        .unwrap();
        sink.submit_task_change(&TaskStateChange::new("arn:task/1", TaskStatus::Running))
            .await
            .unwrap();

        let submissions = sink.submissions();
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[0].kind, EventKind::Container);
        assert_eq!(submissions[0].rendered, "arn:task/1 web -> RUNNING");
        assert_eq!(submissions[1].kind, EventKind::Task);
        assert_eq!(submissions[1].status, "RUNNING");
        assert_eq!(
            submissions[1].submitted_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let sink = sink();
        sink.fail_next(1);
        let change = TaskStateChange::new("arn:task/1", TaskStatus::Running);

        let err = sink.submit_task_change(&change).await.unwrap_err();
        assert!(matches!(err, SinkError::Unavailable(_)));
        assert!(sink.submissions().is_empty());

        sink.submit_task_change(&change).await.unwrap();
        assert_eq!(sink.submissions().len(), 1);
    }
}
