//! SendableEvent - 送信判定付きの状態変更エンベロープ
//!
//! コンテナまたはタスクの状態変更を 1 件だけ包み、
//! 「まだ送る価値があるか」を複数スレッドから同時に問い合わせられるようにします。
//!
//! # 二つの重複チェック
//! - `sent`: このエンベロープ自身が送信済みか（ローカル、単調）
//! - `sent_status()`: 実体側のマーカー（別のエンベロープで既に届いた状態を含む）
//!
//! どちらか一方でも「送信済み」を示せば送らない。
//!
//! # ロック
//! - 判定と表示は read lock
//! - `mark_sent` だけ write lock
//! - ロック中に I/O や await はしない

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use super::change::{ContainerStateChange, TaskStateChange};
use super::ids::{Arn, EventId};

/// Which payload an event carries. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Container,
    Task,
}

/// Exactly one state-change payload.
#[derive(Debug, Clone)]
pub enum StateChange {
    Container(ContainerStateChange),
    Task(TaskStateChange),
}

impl StateChange {
    pub fn kind(&self) -> EventKind {
        match self {
            StateChange::Container(_) => EventKind::Container,
            StateChange::Task(_) => EventKind::Task,
        }
    }

    pub fn owner_arn(&self) -> &Arn {
        match self {
            StateChange::Container(change) => change.owner_arn(),
            StateChange::Task(change) => change.owner_arn(),
        }
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateChange::Container(change) => write!(f, "ContainerChange: {change}"),
            StateChange::Task(change) => write!(f, "TaskChange: {change}"),
        }
    }
}

#[derive(Debug)]
struct EventState {
    change: StateChange,
    sent: bool,
}

/// A state change waiting to be delivered, plus its local sent flag.
///
/// Shared between producers and dispatchers behind an `Arc`.
/// All predicates are pure reads of the current state.
pub struct SendableEvent {
    id: EventId,
    state: RwLock<EventState>,
}

impl SendableEvent {
    pub fn from_container_change(change: ContainerStateChange) -> Self {
        Self::new(StateChange::Container(change))
    }

    pub fn from_task_change(change: TaskStateChange) -> Self {
        Self::new(StateChange::Task(change))
    }

    fn new(change: StateChange) -> Self {
        Self {
            id: EventId::generate(),
            state: RwLock::new(EventState {
                change,
                sent: false,
            }),
        }
    }

    /// Read lock, recovering the state from a poisoned lock.
    fn read(&self) -> RwLockReadGuard<'_, EventState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.read().change.kind()
    }

    pub fn owner_arn(&self) -> Arn {
        self.read().change.owner_arn().clone()
    }

    pub fn is_sent(&self) -> bool {
        self.read().sent
    }

    /// Clone of the payload, for submitting without holding the lock.
    pub fn snapshot(&self) -> StateChange {
        self.read().change.clone()
    }

    /// Should the task change itself be delivered?
    pub fn task_should_send(&self) -> bool {
        let state = self.read();
        let StateChange::Task(change) = &state.change else {
            return false;
        };
        if change.status.is_none() {
            // no assigned status yet; only the attachment channel applies
            return false;
        }
        let delivered = change
            .task
            .as_ref()
            .is_some_and(|task| task.sent_status() >= change.status);
        !(state.sent || delivered)
    }

    /// Should the attachment announcement be delivered?
    ///
    /// Only while the task status is still unset. Dedup is by the
    /// attachment's own marker, not by `sent` or the task's sent status.
    pub fn task_attachment_should_send(&self) -> bool {
        let state = self.read();
        let StateChange::Task(change) = &state.change else {
            return false;
        };
        change.status.is_none()
            && change
                .attachment
                .as_ref()
                .is_some_and(|attachment| !attachment.is_sent())
    }

    /// Should the container change be delivered?
    pub fn container_should_send(&self) -> bool {
        let state = self.read();
        let StateChange::Container(change) = &state.change else {
            return false;
        };
        let delivered = change
            .container
            .as_ref()
            .is_some_and(|container| container.sent_status() >= change.status);
        !(state.sent || delivered)
    }

    /// Record that this envelope was delivered. Idempotent.
    ///
    /// Does not touch the backing entity; the dispatcher advances that
    /// marker after the send is confirmed.
    pub fn mark_sent(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.sent = true;
    }
}

impl fmt::Display for SendableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        fmt::Display::fmt(&state.change, f)
    }
}

impl fmt::Debug for SendableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("SendableEvent")
            .field("id", &self.id)
            .field("kind", &state.change.kind())
            .field("owner_arn", state.change.owner_arn())
            .field("sent", &state.sent)
            .finish()
    }
}
