//! Instruction to executed plan

use std::sync::Arc;
use std::time::Duration;

use llm::TextGenerator;
use serde::Serialize;
use serde_json::Value;
use tooling::logging::{timed, truncate_for_logging};
use tracing::{debug, info, warn};

use crate::actions::{
    BrowserActions, BrowserSession, DesktopActions, Launcher, RecordingInputDevice,
    RecordingLauncher, SharedInputDevice, SystemLauncher,
};
use crate::config::AgentConfig;
use crate::error::{InterpreterError, Result};
use crate::executor::{ExecutionLog, PlanExecutor};
use crate::plan::{extract, CommandParser, CommandPlan, ParseCache};
use crate::prompt::PromptBuilder;
use crate::registry::ActionRegistry;

/// Result of one request: the plan that ran and its log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub plan: CommandPlan,
    pub logs: ExecutionLog,
}

/// Turns free-text instructions into executed plans.
#[derive(Clone)]
pub struct InstructionAgent {
    generator: Arc<dyn TextGenerator>,
    executor: PlanExecutor,
    prompt: PromptBuilder,
    plan_timeout: Option<Duration>,
}

impl InstructionAgent {
    /// The prompt advertises exactly the executor's registered commands.
    pub fn new(generator: Arc<dyn TextGenerator>, executor: PlanExecutor) -> Self {
        let prompt = PromptBuilder::for_registry(executor.registry());
        Self {
            generator,
            executor,
            prompt,
            plan_timeout: None,
        }
    }

    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_plan_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.plan_timeout = timeout;
        self
    }

    pub fn executor(&self) -> &PlanExecutor {
        &self.executor
    }

    /// Ask the generator for a plan without executing it.
    pub async fn plan(&self, instruction: &str) -> Result<CommandPlan> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(InterpreterError::InvalidInstruction(
                "Invalid or missing instruction.".to_string(),
            ));
        }

        let prompt = self.prompt.build(instruction);
        debug!(
            generator = %self.generator.describe(),
            instruction = %truncate_for_logging(instruction, 120),
            "Requesting plan"
        );

        let raw = timed("generate_plan", self.generator.generate(&prompt)).await;
        if raw.trim().is_empty() {
            warn!("Generator returned an empty response");
        }

        extract(&raw)
    }

    /// Generate and execute a plan for `instruction`.
    pub async fn run(&self, instruction: &str) -> Result<PlanReport> {
        let plan = self.plan(instruction).await?;
        info!(commands = plan.len(), "Executing generated plan");
        self.run_plan(plan).await
    }

    /// Execute a plan that was produced elsewhere.
    pub async fn run_plan(&self, plan: CommandPlan) -> Result<PlanReport> {
        let logs = match self.plan_timeout {
            Some(limit) => tokio::time::timeout(limit, self.executor.execute(&plan))
                .await
                .map_err(|_| InterpreterError::Timeout(limit))?,
            None => self.executor.execute(&plan).await,
        };
        Ok(PlanReport { plan, logs })
    }

    /// Execute a caller-supplied JSON plan; non-arrays are rejected.
    pub async fn run_value(&self, value: Value) -> Result<PlanReport> {
        self.run_plan(CommandPlan::from_value(value)?).await
    }
}

/// Input device for `config`: recording in dry runs, otherwise the native
/// backend, or a device that refuses every operation when the crate was
/// built without `native-input`.
pub fn input_device(config: &AgentConfig) -> SharedInputDevice {
    if config.dry_run {
        return RecordingInputDevice::shared().1;
    }

    #[cfg(feature = "native-input")]
    {
        Arc::new(tokio::sync::Mutex::new(crate::actions::NativeInputDevice::new()))
    }

    #[cfg(not(feature = "native-input"))]
    {
        warn!("Built without native input support; input and screenshot commands will fail");
        crate::actions::UnavailableInputDevice::shared()
    }
}

/// Agent wired from `config` alone, as the `local-agent` binary runs it.
pub fn build_agent(config: &AgentConfig, generator: Arc<dyn TextGenerator>) -> InstructionAgent {
    InstructionAgent::new(generator, build_executor(config, input_device(config), None))
        .with_plan_timeout(config.plan_timeout())
}

/// Build the executor described by `config`: desktop actions on `device`,
/// plus browser actions when a session is supplied.
pub fn build_executor(
    config: &AgentConfig,
    device: SharedInputDevice,
    browser: Option<Arc<dyn BrowserSession>>,
) -> PlanExecutor {
    let launcher: Arc<dyn Launcher> = if config.dry_run {
        Arc::new(RecordingLauncher::new())
    } else {
        Arc::new(SystemLauncher)
    };

    let mut registry = ActionRegistry::new();
    let mut desktop = DesktopActions::new(device, launcher, config.timing.clone());
    if let Some(dir) = &config.working_dir {
        desktop = desktop.with_working_dir(dir.clone());
    }
    desktop.register(&mut registry);

    if let Some(session) = browser {
        let mut actions = BrowserActions::new(session);
        if let Some(dir) = &config.working_dir {
            actions = actions.with_output_dir(dir.clone());
        }
        actions.register(&mut registry);
    }

    let cache = match config.parse_cache_capacity {
        Some(capacity) => ParseCache::with_capacity(capacity),
        None => ParseCache::new(),
    };

    PlanExecutor::with_parser(Arc::new(registry), CommandParser::with_cache(Arc::new(cache)))
}
