//! Lifecycle status of tasks and containers.
//!
//! Both enums are totally ordered in lifecycle order, so "has the entity
//! already reported at least this far" is a plain `>=`. `None` is the
//! unset sentinel and sorts first.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle stage.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not assigned yet.
    #[default]
    None,
    Pulled,
    Created,
    Running,
    Stopped,
}

impl TaskStatus {
    pub fn is_none(self) -> bool {
        self == TaskStatus::None
    }

    pub fn is_terminal(self) -> bool {
        self == TaskStatus::Stopped
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::None => "NONE",
            TaskStatus::Pulled => "PULLED",
            TaskStatus::Created => "CREATED",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container lifecycle stage.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerStatus {
    #[default]
    None,
    Pulled,
    Created,
    Running,
    ResourcesProvisioned,
    Stopped,
}

impl ContainerStatus {
    pub fn is_none(self) -> bool {
        self == ContainerStatus::None
    }

    pub fn is_terminal(self) -> bool {
        self == ContainerStatus::Stopped
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContainerStatus::None => "NONE",
            ContainerStatus::Pulled => "PULLED",
            ContainerStatus::Created => "CREATED",
            ContainerStatus::Running => "RUNNING",
            ContainerStatus::ResourcesProvisioned => "RESOURCES_PROVISIONED",
            ContainerStatus::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
