//! Backing entities - 送信済みマーカーを持つ実体
//!
//! Container / Task / Attachment は lifecycle 追跡側が所有する実体です。
//! SendableEvent はこれらのマーカーを読むだけで、書き込むのは dispatcher だけです。
//!
//! # マーカーの性質
//! - `sent_status` は単調非減少（`set_sent_status` は進める方向にしか動かない）
//! - Attachment の `sent` は Status とは独立したフラグ

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use super::ids::Arn;
use super::status::{ContainerStatus, TaskStatus};

/// Raise `marker` to `status` if that moves it forward.
fn advance<S: Copy + Ord>(marker: &RwLock<S>, status: S) -> bool {
    let mut current = marker.write().unwrap_or_else(PoisonError::into_inner);
    if status > *current {
        *current = status;
        true
    } else {
        false
    }
}

fn read<S: Copy>(marker: &RwLock<S>) -> S {
    *marker.read().unwrap_or_else(PoisonError::into_inner)
}

/// A live container, as seen by the state-change pipeline.
#[derive(Debug)]
pub struct Container {
    name: String,
    sent_status: RwLock<ContainerStatus>,
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sent_status: RwLock::new(ContainerStatus::None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Highest status successfully delivered for this container.
    pub fn sent_status(&self) -> ContainerStatus {
        read(&self.sent_status)
    }

    /// Returns `true` if the marker moved forward.
    pub fn set_sent_status(&self, status: ContainerStatus) -> bool {
        advance(&self.sent_status, status)
    }
}

/// A live task, as seen by the state-change pipeline.
#[derive(Debug)]
pub struct Task {
    arn: Arn,
    sent_status: RwLock<TaskStatus>,
}

impl Task {
    pub fn new(arn: impl Into<Arn>) -> Self {
        Self {
            arn: arn.into(),
            sent_status: RwLock::new(TaskStatus::None),
        }
    }

    pub fn arn(&self) -> &Arn {
        &self.arn
    }

    /// Highest status successfully delivered for this task.
    pub fn sent_status(&self) -> TaskStatus {
        read(&self.sent_status)
    }

    /// Returns `true` if the marker moved forward.
    pub fn set_sent_status(&self, status: TaskStatus) -> bool {
        advance(&self.sent_status, status)
    }
}

/// Task sub-record (e.g. network interface attachment) with its own sent marker.
#[derive(Debug)]
pub struct Attachment {
    attachment_arn: Arn,
    sent: AtomicBool,
}

impl Attachment {
    pub fn new(attachment_arn: impl Into<Arn>) -> Self {
        Self {
            attachment_arn: attachment_arn.into(),
            sent: AtomicBool::new(false),
        }
    }

    pub fn attachment_arn(&self) -> &Arn {
        &self.attachment_arn
    }

    pub fn is_sent(&self) -> bool {
        self.sent.load(Ordering::Acquire)
    }

    pub fn set_sent(&self) {
        self.sent.store(true, Ordering::Release);
    }
}
