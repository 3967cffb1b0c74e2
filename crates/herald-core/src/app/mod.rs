//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **PendingEvents**: owner ARN ごとの送信待ちキュー
//! - **Dispatcher**: 判定 → 送信 → mark_sent → マーカー更新
//! - **status**: 集計（PendingCounts, DispatchReport）

pub mod dispatcher;
pub mod pending;
pub mod status;

pub use self::dispatcher::Dispatcher;
pub use self::pending::PendingEvents;
pub use self::status::{DispatchReport, PendingCounts};
