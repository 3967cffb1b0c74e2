//! Scenario configuration (TOML).
//!
//! A scenario declares the live tasks (with their containers and
//! attachments), the state changes the lifecycle trackers produce for them,
//! and how many dispatch passes to run.
//!
//! ```toml
//! [dispatch]
//! passes = 2
//!
//! [[tasks]]
//! arn = "arn:aws:ecs:us-west-2:123456789012:task/abc"
//! containers = [{ name = "web" }]
//! attachments = [{ arn = "arn:aws:ecs:us-west-2:123456789012:attachment/eni-1" }]
//!
//! [[events]]
//! kind = "container"
//! task = "arn:aws:ecs:us-west-2:123456789012:task/abc"
//! container = "web"
//! status = "RUNNING"
//! ```

use std::path::Path;

use herald_core::domain::{ContainerStatus, TaskStatus};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid scenario: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Number of dispatch passes over all owners.
    #[serde(default = "default_passes")]
    pub passes: usize,

    /// Number of sink submissions to fail before accepting any.
    #[serde(default)]
    pub fail_first: usize,
}

fn default_passes() -> usize {
    1
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            passes: default_passes(),
            fail_first: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContainerConfig {
    pub name: String,

    /// Status already delivered before the scenario starts.
    #[serde(default)]
    pub sent_status: ContainerStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentConfig {
    pub arn: String,

    #[serde(default)]
    pub sent: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub arn: String,

    #[serde(default)]
    pub sent_status: TaskStatus,

    #[serde(default)]
    pub containers: Vec<ContainerConfig>,

    #[serde(default)]
    pub attachments: Vec<AttachmentConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventConfig {
    Container {
        task: String,
        container: String,
        status: ContainerStatus,
        #[serde(default)]
        exit_code: Option<i32>,
        #[serde(default)]
        reason: Option<String>,
    },
    Task {
        task: String,
        status: TaskStatus,
        #[serde(default)]
        reason: Option<String>,
    },
    Attachment {
        task: String,
        attachment: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub tasks: Vec<TaskConfig>,

    #[serde(default)]
    pub events: Vec<EventConfig>,
}

impl ScenarioConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.passes == 0 {
            return Err(ConfigError::ValidationError(
                "dispatch.passes must be at least 1".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.arn.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "task {} declared twice",
                    task.arn
                )));
            }
        }
        Ok(())
    }
}
