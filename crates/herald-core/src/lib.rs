//! herald-core
//!
//! コンテナ/タスクの状態変更をコントロールプレーンへ「実質 1 回」だけ届けるための部品。
//!
//! # モジュール構成
//! - **domain**: ids, status, 実体（Container/Task/Attachment）, payload, SendableEvent
//! - **ports**: 抽象化レイヤー（StateChangeSink, Clock）
//! - **impls**: ports の実装（RecordingSink）
//! - **app**: PendingEvents と Dispatcher
//! - **error**: クレート全体のエラー型

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use error::HeraldError;
