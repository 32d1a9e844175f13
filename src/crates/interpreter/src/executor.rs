//! Sequential plan execution with per-command failure isolation

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tooling::logging::format_duration;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::error::{InterpreterError, Result};
use crate::plan::{CommandParser, CommandPlan};
use crate::registry::ActionRegistry;

/// Stage of one command in the execution log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Attempted,
    Succeeded,
    Failed,
}

/// One line of the execution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogEntry {
    pub command_text: String,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExecutionLogEntry {
    fn new(command_text: &str, phase: Phase, message: Option<String>) -> Self {
        Self {
            command_text: command_text.to_string(),
            phase,
            message,
        }
    }

    /// One-line human readable form.
    pub fn summary(&self) -> String {
        let marker = match self.phase {
            Phase::Attempted => "▶",
            Phase::Succeeded => "✔",
            Phase::Failed => "✖",
        };
        match &self.message {
            Some(message) => format!("{} {}: {}", marker, self.command_text, message),
            None => format!("{} {}", marker, self.command_text),
        }
    }
}

/// Ordered record of a plan run: one `Attempted` entry followed by exactly
/// one `Succeeded` or `Failed` entry per command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionLog {
    entries: Vec<ExecutionLogEntry>,
}

impl ExecutionLog {
    pub fn entries(&self) -> &[ExecutionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionLogEntry> {
        self.entries.iter()
    }

    /// The `Succeeded`/`Failed` entries, in plan order.
    pub fn outcomes(&self) -> impl Iterator<Item = &ExecutionLogEntry> {
        self.entries.iter().filter(|e| e.phase != Phase::Attempted)
    }

    pub fn succeeded(&self) -> usize {
        self.count(Phase::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.count(Phase::Failed)
    }

    fn count(&self, phase: Phase) -> usize {
        self.entries.iter().filter(|e| e.phase == phase).count()
    }

    fn push(&mut self, entry: ExecutionLogEntry) {
        self.entries.push(entry);
    }
}

/// Runs plans against an [`ActionRegistry`].
///
/// Commands run strictly one after another. A command that cannot be parsed,
/// names no registered handler, or whose handler fails is logged as `Failed`
/// and execution continues with the next one.
#[derive(Debug, Clone)]
pub struct PlanExecutor {
    registry: Arc<ActionRegistry>,
    parser: CommandParser,
}

impl PlanExecutor {
    pub fn new(registry: ActionRegistry) -> Self {
        Self::with_parser(Arc::new(registry), CommandParser::new())
    }

    pub fn with_parser(registry: Arc<ActionRegistry>, parser: CommandParser) -> Self {
        Self { registry, parser }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    /// Execute every command of `plan` in order.
    pub async fn execute(&self, plan: &CommandPlan) -> ExecutionLog {
        let span = info_span!("plan", commands = plan.len());
        async {
            let mut log = ExecutionLog::default();

            for (index, command) in plan.iter().enumerate() {
                log.push(ExecutionLogEntry::new(command, Phase::Attempted, None));
                debug!(index, command = %command, "Executing command");

                let started = Instant::now();
                let outcome = self.run_one(command).await;
                let elapsed = format_duration(started.elapsed());

                match outcome {
                    Ok(message) => {
                        info!(index, command = %command, elapsed = %elapsed, "Command succeeded");
                        log.push(ExecutionLogEntry::new(command, Phase::Succeeded, message));
                    }
                    Err(e) => {
                        warn!(index, command = %command, elapsed = %elapsed, error = %e, "Command failed");
                        log.push(ExecutionLogEntry::new(command, Phase::Failed, Some(e.to_string())));
                    }
                }
            }

            info!(
                succeeded = log.succeeded(),
                failed = log.failed(),
                "Plan finished"
            );
            log
        }
        .instrument(span)
        .await
    }

    /// Execute a plan supplied as JSON; anything but an array is rejected.
    pub async fn execute_value(&self, value: Value) -> Result<ExecutionLog> {
        let plan = CommandPlan::from_value(value)?;
        Ok(self.execute(&plan).await)
    }

    async fn run_one(&self, command: &str) -> Result<Option<String>> {
        let parsed = self.parser.parse(command)?;

        let handler = self
            .registry
            .lookup(&parsed.name)
            .ok_or_else(|| InterpreterError::Dispatch(parsed.name.clone()))?;

        handler
            .invoke(&parsed.args)
            .await
            .map_err(|source| InterpreterError::Handler {
                command: parsed.name,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionError;

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        registry
            .register_fn("ok", |_| async { Ok(Some("done".to_string())) })
            .register_fn("boom", |_| async {
                Err(ActionError::Device("pointer unavailable".into()))
            });
        registry
    }

    #[tokio::test]
    async fn test_unknown_command_is_isolated() {
        let executor = PlanExecutor::new(registry());
        let log = executor
            .execute(&CommandPlan::new(vec!["unknownCmd()".into()]))
            .await;

        assert_eq!(log.len(), 2);
        let outcome = log.outcomes().next().unwrap();
        assert_eq!(outcome.phase, Phase::Failed);
        assert_eq!(outcome.message.as_deref(), Some("unknown command: unknownCmd()"));
    }

    #[tokio::test]
    async fn test_handler_failure_message() {
        let executor = PlanExecutor::new(registry());
        let log = executor
            .execute(&CommandPlan::new(vec!["boom()".into(), "ok()".into()]))
            .await;

        let outcomes: Vec<_> = log.outcomes().collect();
        assert_eq!(
            outcomes[0].message.as_deref(),
            Some("boom failed: device error: pointer unavailable")
        );
        assert_eq!(outcomes[1].phase, Phase::Succeeded);
        assert_eq!(outcomes[1].message.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_execute_value_rejects_non_array() {
        let executor = PlanExecutor::new(registry());
        let err = executor
            .execute_value(serde_json::json!("ok()"))
            .await
            .unwrap_err();
        assert!(matches!(err, InterpreterError::InvalidPlan(_)));
    }

    #[test]
    fn test_log_serialization() {
        let entry = ExecutionLogEntry::new("wait(1)", Phase::Succeeded, None);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({"commandText": "wait(1)", "phase": "succeeded"})
        );
        assert_eq!(entry.summary(), "✔ wait(1)");
    }
}
