//! Domain model: ids, lifecycle status, backing entities, payloads and the
//! sendable event envelope.

pub mod change;
pub mod entity;
pub mod event;
pub mod ids;
pub mod status;

pub use self::change::{ContainerStateChange, TaskStateChange};
pub use self::entity::{Attachment, Container, Task};
pub use self::event::{EventKind, SendableEvent, StateChange};
pub use self::ids::{Arn, EventId};
pub use self::status::{ContainerStatus, TaskStatus};
