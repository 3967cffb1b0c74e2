//! State-change payloads produced by lifecycle trackers.

use std::fmt;
use std::sync::Arc;

use super::entity::{Attachment, Container, Task};
use super::ids::Arn;
use super::status::{ContainerStatus, TaskStatus};

/// One observed container transition.
///
/// `container` is the back-reference used for the external redundancy check.
/// When it is `None` there is nothing to compare against and the change counts
/// as not yet delivered.
#[derive(Debug, Clone)]
pub struct ContainerStateChange {
    pub task_arn: Arn,
    pub container_name: String,
    pub status: ContainerStatus,
    pub exit_code: Option<i32>,
    pub reason: Option<String>,
    pub container: Option<Arc<Container>>,
}

impl ContainerStateChange {
    pub fn new(
        task_arn: impl Into<Arn>,
        container_name: impl Into<String>,
        status: ContainerStatus,
    ) -> Self {
        Self {
            task_arn: task_arn.into(),
            container_name: container_name.into(),
            status,
            exit_code: None,
            reason: None,
            container: None,
        }
    }

    pub fn with_container(mut self, container: Arc<Container>) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = Some(exit_code);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn owner_arn(&self) -> &Arn {
        &self.task_arn
    }
}

impl fmt::Display for ContainerStateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.task_arn, self.container_name, self.status)?;
        if let Some(code) = self.exit_code {
            write!(f, ", exit {code}")?;
        }
        if let Some(reason) = &self.reason {
            write!(f, ", reason {reason:?}")?;
        }
        Ok(())
    }
}

/// One observed task transition, optionally carrying an attachment.
#[derive(Debug, Clone)]
pub struct TaskStateChange {
    pub task_arn: Arn,
    pub status: TaskStatus,
    pub reason: Option<String>,
    pub attachment: Option<Arc<Attachment>>,
    pub task: Option<Arc<Task>>,
}

impl TaskStateChange {
    pub fn new(task_arn: impl Into<Arn>, status: TaskStatus) -> Self {
        Self {
            task_arn: task_arn.into(),
            status,
            reason: None,
            attachment: None,
            task: None,
        }
    }

    /// Attachment announcement sent before the task record has a status.
    pub fn attachment_only(task_arn: impl Into<Arn>, attachment: Arc<Attachment>) -> Self {
        Self::new(task_arn, TaskStatus::None).with_attachment(attachment)
    }

    pub fn with_task(mut self, task: Arc<Task>) -> Self {
        self.task = Some(task);
        self
    }

    pub fn with_attachment(mut self, attachment: Arc<Attachment>) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn owner_arn(&self) -> &Arn {
        &self.task_arn
    }
}

impl fmt::Display for TaskStateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.task_arn, self.status)?;
        if let Some(reason) = &self.reason {
            write!(f, ", reason {reason:?}")?;
        }
        if let Some(attachment) = &self.attachment {
            write!(f, ", attachment {}", attachment.attachment_arn())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_change_renders_optional_fields() {
        let change = ContainerStateChange::new("arn:task/1", "web", ContainerStatus::Stopped)
            .with_exit_code(137)
            .with_reason("OOM");
        assert_eq!(
            change.to_string(),
            "arn:task/1 web -> STOPPED, exit 137, reason \"OOM\""
        );
    }

    #[test]
    fn task_change_renders_attachment() {
        let attachment = Arc::new(Attachment::new("arn:attachment/eni-1"));
        let change = TaskStateChange::attachment_only("arn:task/1", attachment);
        assert_eq!(change.status, TaskStatus::None);
        assert_eq!(
            change.to_string(),
            "arn:task/1 -> NONE, attachment arn:attachment/eni-1"
        );
    }

    #[test]
    fn owner_arn_is_the_task_arn() {
        let c = ContainerStateChange::new("arn:task/1", "web", ContainerStatus::Running);
        let t = TaskStateChange::new("arn:task/2", TaskStatus::Running);
        assert_eq!(c.owner_arn().as_str(), "arn:task/1");
        assert_eq!(t.owner_arn().as_str(), "arn:task/2");
    }
}
