//! StateChangeSink port - コントロールプレーンへの送信口
//!
//! 実際のネットワーク送信やリトライはこの trait の実装側の責務です。
//! Dispatcher はこの trait だけを見て送信し、成功したら sent マーカーを進めます。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ContainerStateChange, TaskStateChange};

#[derive(Debug, Error)]
pub enum SinkError {
    /// The control plane refused this change.
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// The control plane could not be reached.
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for state changes.
///
/// `Ok(())` means the change was durably accepted.
#[async_trait]
pub trait StateChangeSink: Send + Sync {
    async fn submit_container_change(
        &self,
        change: &ContainerStateChange,
    ) -> Result<(), SinkError>;

    async fn submit_task_change(&self, change: &TaskStateChange) -> Result<(), SinkError>;
}
