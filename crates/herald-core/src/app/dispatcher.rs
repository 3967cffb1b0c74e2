//! Dispatcher - 送信待ちエンベロープを StateChangeSink へ送る
//!
//! # フロー（owner ARN ごと、先頭から）
//! 1. 判定（container / task / attachment のどれで送るか、または冗長か）
//! 2. sink へ送信
//! 3. 成功したら `mark_sent()`
//! 4. 実体側のマーカーを進める（`set_sent_status` / `Attachment::set_sent`）
//!
//! 冗長なエンベロープは送らずに取り除きます。
//! 送信失敗時はそこで止め、エンベロープは先頭に残します（リトライは呼び出し側）。

use std::sync::Arc;

use super::pending::PendingEvents;
use super::status::DispatchReport;
use crate::domain::{Arn, SendableEvent, StateChange};
use crate::error::HeraldError;
use crate::ports::{SinkError, StateChangeSink};

enum Delivery {
    Sent,
    Attachment,
    Redundant,
}

pub struct Dispatcher {
    pending: Arc<PendingEvents>,
    sink: Arc<dyn StateChangeSink>,
}

impl Dispatcher {
    pub fn new(pending: Arc<PendingEvents>, sink: Arc<dyn StateChangeSink>) -> Self {
        Self { pending, sink }
    }

    pub fn pending(&self) -> &PendingEvents {
        &self.pending
    }

    /// Drain one owner's queue until it is empty or the sink fails.
    ///
    /// A drain of the same owner that is already running finishes first;
    /// this call then walks whatever it left behind.
    pub async fn submit_pending(&self, arn: &Arn) -> Result<DispatchReport, HeraldError> {
        let mut report = DispatchReport::default();
        self.drain(arn, &mut report)
            .await
            .map_err(|source| HeraldError::Submission {
                arn: arn.clone(),
                source,
            })?;
        Ok(report)
    }

    /// One pass over every owner. Failures are logged and counted, and do
    /// not stop other owners.
    pub async fn submit_all(&self) -> DispatchReport {
        let mut report = DispatchReport::default();
        for arn in self.pending.owners() {
            if let Err(error) = self.drain(&arn, &mut report).await {
                tracing::warn!(owner_arn = %arn, %error, "submission failed, left pending");
                report.failed += 1;
            }
        }
        report
    }

    async fn drain(&self, arn: &Arn, report: &mut DispatchReport) -> Result<(), SinkError> {
        let drain = self.pending.begin_drain(arn).await;

        while let Some(event) = drain.front() {
            match self.deliver(&event).await? {
                Delivery::Sent => report.sent += 1,
                Delivery::Attachment => report.attachments_sent += 1,
                Delivery::Redundant => {
                    tracing::debug!(event_id = %event.id(), "dropping redundant {event}");
                    report.dropped += 1;
                }
            }
            drain.pop_front();
        }
        Ok(())
    }

    async fn deliver(&self, event: &SendableEvent) -> Result<Delivery, SinkError> {
        // the payload is immutable, so a snapshot taken now matches what the
        // predicates below look at
        match event.snapshot() {
            StateChange::Container(change) => {
                if !event.container_should_send() {
                    return Ok(Delivery::Redundant);
                }
                self.sink.submit_container_change(&change).await?;
                event.mark_sent();
                if let Some(container) = &change.container {
                    container.set_sent_status(change.status);
                }
                Ok(Delivery::Sent)
            }
            StateChange::Task(change) => {
                if event.task_should_send() {
                    self.sink.submit_task_change(&change).await?;
                    event.mark_sent();
                    if let Some(task) = &change.task {
                        task.set_sent_status(change.status);
                    }
                    Ok(Delivery::Sent)
                } else if event.task_attachment_should_send() {
                    self.sink.submit_task_change(&change).await?;
                    event.mark_sent();
                    if let Some(attachment) = &change.attachment {
                        attachment.set_sent();
                    }
                    Ok(Delivery::Attachment)
                } else {
                    Ok(Delivery::Redundant)
                }
            }
        }
    }
}
