//! herald - replay a state-change scenario through the dispatcher.
//!
//! ```text
//! herald --scenario scenarios/basic.toml --passes 2 --format json
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG=herald_core=debug` to see
//! each queued, submitted and dropped event.

mod config;
mod scenario;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use herald_core::app::{DispatchReport, Dispatcher, PendingCounts, PendingEvents};
use herald_core::domain::{Arn, EventKind, TaskStatus};
use herald_core::impls::{RecordingSink, Submission};
use herald_core::ports::SystemClock;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ScenarioConfig;
use crate::scenario::Scenario;

#[derive(Debug, Parser)]
#[command(name = "herald")]
#[command(about = "Replay container/task state changes through the dispatcher")]
struct Cli {
    /// Scenario file (TOML).
    #[arg(long, env = "HERALD_SCENARIO")]
    scenario: PathBuf,

    /// Override `dispatch.passes` from the scenario.
    #[arg(long)]
    passes: Option<usize>,

    /// Override `dispatch.fail_first` from the scenario.
    #[arg(long)]
    fail_first: Option<usize>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    passes_run: usize,
    report: DispatchReport,
    remaining: PendingCounts,
    task_sent_status: Vec<(Arn, TaskStatus)>,
    submissions: Vec<Submission>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = ScenarioConfig::load(&cli.scenario)
        .with_context(|| format!("loading {}", cli.scenario.display()))?;
    let passes = cli.passes.unwrap_or(config.dispatch.passes);
    let fail_first = cli.fail_first.unwrap_or(config.dispatch.fail_first);

    let scenario = Scenario::build(&config)?;
    let summary = run(&scenario, passes, fail_first).await;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_text(&summary),
    }
    Ok(())
}

async fn run(scenario: &Scenario, passes: usize, fail_first: usize) -> RunSummary {
    let pending = Arc::new(PendingEvents::new());
    for event in scenario.events() {
        pending.push(Arc::clone(event));
    }

    let sink = Arc::new(RecordingSink::new(SystemClock));
    sink.fail_next(fail_first);
    let dispatcher = Dispatcher::new(Arc::clone(&pending), sink.clone());

    let mut report = DispatchReport::default();
    let mut passes_run = 0;
    while passes_run < passes && !pending.is_empty() {
        passes_run += 1;
        let pass = dispatcher.submit_all().await;
        tracing::info!(pass = passes_run, ?pass, "dispatch pass finished");
        report.merge(pass);
    }

    RunSummary {
        passes_run,
        report,
        remaining: pending.counts(),
        task_sent_status: scenario.task_statuses(),
        submissions: sink.submissions(),
    }
}

fn print_text(summary: &RunSummary) {
    for submission in &summary.submissions {
        let label = if submission.attachment {
            "attachment"
        } else {
            match submission.kind {
                EventKind::Container => "container",
                EventKind::Task => "task",
            }
        };
        println!("{label:<10} {}", submission.rendered);
    }
    let report = &summary.report;
    println!(
        "passes={} sent={} attachments={} dropped={} failed={} remaining={}",
        summary.passes_run,
        report.sent,
        report.attachments_sent,
        report.dropped,
        report.failed,
        summary.remaining.events
    );
    for (arn, status) in &summary.task_sent_status {
        println!("{arn} sent_status={status}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
[[tasks]]
arn = "arn:task/1"
containers = [{ name = "web" }]
attachments = [{ arn = "arn:attachment/eni-1" }]

[[events]]
kind = "attachment"
task = "arn:task/1"
attachment = "arn:attachment/eni-1"

[[events]]
kind = "container"
task = "arn:task/1"
container = "web"
status = "RUNNING"

[[events]]
kind = "task"
task = "arn:task/1"
status = "RUNNING"

[[events]]
kind = "task"
task = "arn:task/1"
status = "RUNNING"
"#;

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from([
            "herald",
            "--scenario",
            "s.toml",
            "--passes",
            "3",
            "--format",
            "json",
        ]);
        assert_eq!(cli.scenario, PathBuf::from("s.toml"));
        assert_eq!(cli.passes, Some(3));
        assert_eq!(cli.fail_first, None);
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[tokio::test]
    async fn run_delivers_each_change_once() {
        let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        let scenario = Scenario::build(&config).unwrap();

        let summary = run(&scenario, 3, 0).await;

        assert_eq!(summary.passes_run, 1);
        assert_eq!(summary.report.sent, 2);
        assert_eq!(summary.report.attachments_sent, 1);
        assert_eq!(summary.report.dropped, 1);
        assert_eq!(summary.remaining, PendingCounts::default());
        assert_eq!(summary.submissions.len(), 3);
        assert_eq!(
            summary.task_sent_status,
            vec![(Arn::from("arn:task/1"), TaskStatus::Running)]
        );
    }

    #[tokio::test]
    async fn failed_pass_is_picked_up_by_the_next() {
        let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        let scenario = Scenario::build(&config).unwrap();

        let summary = run(&scenario, 2, 1).await;

        assert_eq!(summary.passes_run, 2);
        assert_eq!(summary.report.failed, 1);
        assert_eq!(summary.report.delivered(), 3);
        assert_eq!(summary.remaining.events, 0);
    }
}
