//! Builds live entities and sendable events from a `ScenarioConfig`.

use std::collections::HashMap;
use std::sync::Arc;

use herald_core::domain::{
    Arn, Attachment, Container, ContainerStateChange, SendableEvent, Task, TaskStateChange,
    TaskStatus,
};

use crate::config::{ConfigError, EventConfig, ScenarioConfig};

struct TaskEntry {
    task: Arc<Task>,
    containers: HashMap<String, Arc<Container>>,
    attachments: HashMap<String, Arc<Attachment>>,
}

pub struct Scenario {
    tasks: HashMap<Arn, TaskEntry>,
    events: Vec<Arc<SendableEvent>>,
}

impl Scenario {
    pub fn build(config: &ScenarioConfig) -> Result<Self, ConfigError> {
        let mut tasks = HashMap::new();
        for task_config in &config.tasks {
            let task = Arc::new(Task::new(task_config.arn.as_str()));
            task.set_sent_status(task_config.sent_status);

            let containers = task_config
                .containers
                .iter()
                .map(|c| {
                    let container = Arc::new(Container::new(c.name.as_str()));
                    container.set_sent_status(c.sent_status);
                    (c.name.clone(), container)
                })
                .collect();

            let attachments = task_config
                .attachments
                .iter()
                .map(|a| {
                    let attachment = Arc::new(Attachment::new(a.arn.as_str()));
                    if a.sent {
                        attachment.set_sent();
                    }
                    (a.arn.clone(), attachment)
                })
                .collect();

            tasks.insert(
                Arn::new(task_config.arn.as_str()),
                TaskEntry {
                    task,
                    containers,
                    attachments,
                },
            );
        }

        let mut scenario = Self {
            tasks,
            events: Vec::with_capacity(config.events.len()),
        };
        for event_config in &config.events {
            let event = scenario.event(event_config)?;
            scenario.events.push(Arc::new(event));
        }
        Ok(scenario)
    }

    pub fn events(&self) -> &[Arc<SendableEvent>] {
        &self.events
    }

    /// Current sent status of every declared task, sorted by ARN.
    pub fn task_statuses(&self) -> Vec<(Arn, TaskStatus)> {
        let mut statuses: Vec<(Arn, TaskStatus)> = self
            .tasks
            .iter()
            .map(|(arn, entry)| (arn.clone(), entry.task.sent_status()))
            .collect();
        statuses.sort();
        statuses
    }

    fn entry(&self, task: &str) -> Result<&TaskEntry, ConfigError> {
        self.tasks
            .get(&Arn::from(task))
            .ok_or_else(|| ConfigError::ValidationError(format!("unknown task {task}")))
    }

    fn event(&self, config: &EventConfig) -> Result<SendableEvent, ConfigError> {
        match config {
            EventConfig::Container {
                task,
                container,
                status,
                exit_code,
                reason,
            } => {
                let entry = self.entry(task)?;
                let live = entry.containers.get(container).ok_or_else(|| {
                    ConfigError::ValidationError(format!(
                        "unknown container {container} in task {task}"
                    ))
                })?;
                let mut change =
                    ContainerStateChange::new(task.as_str(), container.as_str(), *status)
                        .with_container(Arc::clone(live));
                if let Some(code) = exit_code {
                    change = change.with_exit_code(*code);
                }
                if let Some(reason) = reason {
                    change = change.with_reason(reason.as_str());
                }
                Ok(SendableEvent::from_container_change(change))
            }
            EventConfig::Task {
                task,
                status,
                reason,
            } => {
                let entry = self.entry(task)?;
                let mut change =
                    TaskStateChange::new(task.as_str(), *status).with_task(Arc::clone(&entry.task));
                if let Some(reason) = reason {
                    change = change.with_reason(reason.as_str());
                }
                Ok(SendableEvent::from_task_change(change))
            }
            EventConfig::Attachment { task, attachment } => {
                let entry = self.entry(task)?;
                let live = entry.attachments.get(attachment).ok_or_else(|| {
                    ConfigError::ValidationError(format!(
                        "unknown attachment {attachment} in task {task}"
                    ))
                })?;
                Ok(SendableEvent::from_task_change(
                    TaskStateChange::attachment_only(task.as_str(), Arc::clone(live))
                        .with_task(Arc::clone(&entry.task)),
                ))
            }
        }
    }
}
