//! Ports - 抽象化レイヤー
//!
//! 外部システム（コントロールプレーン、時刻）への境界を trait で定義します。

pub mod clock;
pub mod state_change_sink;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::state_change_sink::{SinkError, StateChangeSink};
