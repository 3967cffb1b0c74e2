//! PendingEvents - 送信待ちエンベロープの置き場
//!
//! # 設計
//! - owner ARN ごとに挿入順で保持する
//! - owner ARN ごとに tokio::sync::Mutex を持ち、同じ ARN の drain は順番に実行する
//!   （別の ARN とは待ち合わせない）
//! - キュー本体は std::sync::Mutex。await を跨いで保持しない
//! - push は同期関数なので、producer は普通のスレッドからでも呼べる

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as DrainLock, OwnedMutexGuard};

use super::status::PendingCounts;
use crate::domain::{Arn, SendableEvent};

#[derive(Default)]
struct PendingState {
    queues: HashMap<Arn, VecDeque<Arc<SendableEvent>>>,
    drain_locks: HashMap<Arn, Arc<DrainLock<()>>>,
}

#[derive(Default)]
pub struct PendingEvents {
    state: Mutex<PendingState>,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PendingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an envelope behind earlier ones for the same owner.
    pub fn push(&self, event: Arc<SendableEvent>) {
        let arn = event.owner_arn();
        tracing::debug!(event_id = %event.id(), owner_arn = %arn, "queued {event}");
        self.lock().queues.entry(arn).or_default().push_back(event);
    }

    /// Owners with at least one pending envelope, sorted.
    pub fn owners(&self) -> Vec<Arn> {
        let mut owners: Vec<Arn> = self.lock().queues.keys().cloned().collect();
        owners.sort();
        owners
    }

    /// Pending envelopes for one owner, head first.
    pub fn events_for(&self, arn: &Arn) -> Vec<Arc<SendableEvent>> {
        self.lock()
            .queues
            .get(arn)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn counts(&self) -> PendingCounts {
        let state = self.lock();
        PendingCounts {
            owners: state.queues.len(),
            events: state.queues.values().map(VecDeque::len).sum(),
        }
    }

    pub fn len(&self) -> usize {
        self.counts().events
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queues.is_empty()
    }

    fn drain_lock(&self, arn: &Arn) -> Arc<DrainLock<()>> {
        let mut state = self.lock();
        Arc::clone(state.drain_locks.entry(arn.clone()).or_default())
    }

    /// Take exclusive drain rights for `arn`, waiting for any drain of the
    /// same owner that is already running.
    pub(crate) async fn begin_drain(&self, arn: &Arn) -> DrainGuard<'_> {
        let held = self.drain_lock(arn).lock_owned().await;
        DrainGuard {
            pending: self,
            arn: arn.clone(),
            _held: held,
        }
    }
}

/// Exclusive drain rights for one owner. Only the holder removes envelopes
/// from that owner's queue, so the head is stable between `front` and
/// `pop_front`.
pub(crate) struct DrainGuard<'a> {
    pending: &'a PendingEvents,
    arn: Arn,
    _held: OwnedMutexGuard<()>,
}

impl DrainGuard<'_> {
    pub(crate) fn front(&self) -> Option<Arc<SendableEvent>> {
        self.pending
            .lock()
            .queues
            .get(&self.arn)
            .and_then(|queue| queue.front().cloned())
    }

    pub(crate) fn pop_front(&self) {
        if let Some(queue) = self.pending.lock().queues.get_mut(&self.arn) {
            queue.pop_front();
        }
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.pending.lock();
        if state.queues.get(&self.arn).is_some_and(VecDeque::is_empty) {
            state.queues.remove(&self.arn);
        }
        // two handles left (the map and `_held`) means nobody is waiting
        if state
            .drain_locks
            .get(&self.arn)
            .is_some_and(|lock| Arc::strong_count(lock) == 2)
        {
            state.drain_locks.remove(&self.arn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContainerStateChange, ContainerStatus, TaskStateChange, TaskStatus};
    use std::time::Duration;
    use tokio::time::timeout;

    fn task_event(arn: &str, status: TaskStatus) -> Arc<SendableEvent> {
        Arc::new(SendableEvent::from_task_change(TaskStateChange::new(arn, status)))
    }

    #[test]
    fn groups_by_owner_in_insertion_order() {
        let pending = PendingEvents::new();
        pending.push(task_event("arn:task/b", TaskStatus::Running));
        pending.push(task_event("arn:task/a", TaskStatus::Running));
        pending.push(Arc::new(SendableEvent::from_container_change(
            ContainerStateChange::new("arn:task/a", "web", ContainerStatus::Running),
        )));

        assert_eq!(
            pending.owners(),
            vec![Arn::from("arn:task/a"), Arn::from("arn:task/b")]
        );
        assert_eq!(pending.counts(), PendingCounts { owners: 2, events: 3 });

        let events = pending.events_for(&Arn::from("arn:task/a"));
        assert_eq!(events.len(), 2);
        assert!(events[0].task_should_send());
        assert!(events[1].container_should_send());
    }

    #[tokio::test]
    async fn drains_of_one_owner_wait_for_each_other() {
        let pending = PendingEvents::new();
        let arn = Arn::from("arn:task/a");
        pending.push(task_event("arn:task/a", TaskStatus::Running));

        let guard = pending.begin_drain(&arn).await;
        let blocked = timeout(Duration::from_millis(20), pending.begin_drain(&arn)).await;
        assert!(blocked.is_err());
        // other owners are not held up
        let other = timeout(
            Duration::from_millis(20),
            pending.begin_drain(&Arn::from("arn:task/b")),
        )
        .await;
        assert!(other.is_ok());
        drop(other);

        drop(guard);
        let next = timeout(Duration::from_millis(20), pending.begin_drain(&arn)).await;
        assert!(next.is_ok());
    }

    #[tokio::test]
    async fn drain_lock_is_released_with_the_last_guard() {
        let pending = PendingEvents::new();
        let arn = Arn::from("arn:task/a");

        let guard = pending.begin_drain(&arn).await;
        assert_eq!(pending.lock().drain_locks.len(), 1);
        drop(guard);

        assert!(pending.lock().drain_locks.is_empty());
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn empty_queue_is_removed_when_drain_ends() {
        let pending = PendingEvents::new();
        let arn = Arn::from("arn:task/a");
        pending.push(task_event("arn:task/a", TaskStatus::Running));

        {
            let guard = pending.begin_drain(&arn).await;
            assert!(guard.front().is_some());
            guard.pop_front();
            assert!(guard.front().is_none());
        }

        assert!(pending.is_empty());
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn producers_can_push_from_threads() {
        let pending = Arc::new(PendingEvents::new());
        std::thread::scope(|s| {
            for i in 0..4 {
                let pending = Arc::clone(&pending);
                s.spawn(move || {
                    for _ in 0..25 {
                        pending.push(task_event(&format!("arn:task/{i}"), TaskStatus::Running));
                    }
                });
            }
        });
        assert_eq!(pending.counts(), PendingCounts { owners: 4, events: 100 });
    }
}
