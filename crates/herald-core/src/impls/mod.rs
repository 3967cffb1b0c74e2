//! Impls - ports の実装（開発用・テスト用）
//!
//! 本番のコントロールプレーン送信は別クレートで StateChangeSink を実装します。

pub mod recording_sink;

pub use self::recording_sink::{RecordingSink, Submission};
