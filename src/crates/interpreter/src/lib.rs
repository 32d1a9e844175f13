//! Plan interpreter for the local automation agent
//!
//! A language model answers an automation instruction with a list of
//! function-call-like commands such as `clickAt(100,200)`. This crate turns
//! that loosely structured text into something that can be executed safely:
//!
//! 1. [`plan::extract`] isolates the command array inside noisy model output.
//! 2. [`plan::CommandParser`] splits each command into a name and typed
//!    arguments, falling back through progressively more lenient strategies.
//! 3. [`PlanExecutor`] runs the commands one at a time against an
//!    [`ActionRegistry`], isolating failures and recording an [`ExecutionLog`].
//!
//! Around that core sit the prompt builder, the [`InstructionAgent`] that
//! ties a text generator to the executor, the default desktop and browser
//! action handlers, and the HTTP API served by the `local-agent` binary.

pub mod actions;
pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod executor;
pub mod plan;
pub mod prompt;
pub mod registry;

pub use agent::{InstructionAgent, PlanReport};
pub use config::AgentConfig;
pub use error::{ActionError, InterpreterError, Result};
pub use executor::{ExecutionLog, ExecutionLogEntry, Phase, PlanExecutor};
pub use plan::{ArgValue, CommandParser, CommandPlan, ParseCache, ParsedCommand};
pub use registry::{ActionHandler, ActionRegistry, Args};
