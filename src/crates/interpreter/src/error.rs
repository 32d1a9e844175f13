//! Error types for plan interpretation and action handlers

use thiserror::Error;

/// Errors raised while turning model output into executed actions.
///
/// The request-level variants (see [`InterpreterError::is_fatal`]) abort a
/// whole request. The remaining variants describe a single command and are
/// recorded in the execution log instead of being raised.
#[derive(Debug, Error)]
pub enum InterpreterError {
    /// No command array could be located in the model output
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// An array was located but could not be parsed, even after repair
    #[error("Plan is malformed: {0}")]
    PlanMalformed(String),

    /// The model produced an empty plan
    #[error("LLM returned no commands. Please rephrase your instruction.")]
    PlanEmpty,

    /// A command string is not shaped like `name(args)`
    #[error("Invalid command format: {0}")]
    CommandFormat(String),

    /// No handler is registered under the command name
    #[error("unknown command: {0}()")]
    Dispatch(String),

    /// A handler ran and failed
    #[error("{command} failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: ActionError,
    },

    /// A caller-supplied plan is not an array
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// The instruction is missing or blank
    #[error("{0}")]
    InvalidInstruction(String),

    /// The whole plan did not finish within the configured limit
    #[error("Plan timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl InterpreterError {
    /// Whether this error fails the whole request rather than one command.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            InterpreterError::Extraction(_)
                | InterpreterError::PlanMalformed(_)
                | InterpreterError::PlanEmpty
                | InterpreterError::InvalidPlan(_)
                | InterpreterError::InvalidInstruction(_)
                | InterpreterError::Timeout(_)
        )
    }

    /// Stable identifier for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            InterpreterError::Extraction(_) => "EXTRACTION_ERROR",
            InterpreterError::PlanMalformed(_) => "PLAN_MALFORMED",
            InterpreterError::PlanEmpty => "PLAN_EMPTY",
            InterpreterError::CommandFormat(_) => "COMMAND_FORMAT",
            InterpreterError::Dispatch(_) => "UNKNOWN_COMMAND",
            InterpreterError::Handler { .. } => "HANDLER_ERROR",
            InterpreterError::InvalidPlan(_) => "INVALID_PLAN",
            InterpreterError::InvalidInstruction(_) => "INVALID_INSTRUCTION",
            InterpreterError::Timeout(_) => "PLAN_TIMEOUT",
        }
    }
}

/// Result type for interpreter operations
pub type Result<T> = std::result::Result<T, InterpreterError>;

/// Errors returned by action handlers
#[derive(Debug, Error)]
pub enum ActionError {
    /// Arguments are missing or of the wrong type
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A key chord part has no known key
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    /// The input device or browser session rejected the operation
    #[error("device error: {0}")]
    Device(String),

    /// A process could not be started
    #[error("launch failed: {0}")]
    Launch(String),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Not available on this platform or without a browser session
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl ActionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ActionError::InvalidArguments(message.into())
    }

    pub fn device(message: impl std::fmt::Display) -> Self {
        ActionError::Device(message.to_string())
    }
}

impl From<csv::Error> for ActionError {
    fn from(err: csv::Error) -> Self {
        ActionError::Device(format!("csv: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(InterpreterError::Extraction("no array found".into()).is_fatal());
        assert!(InterpreterError::PlanMalformed("eof".into()).is_fatal());
        assert!(InterpreterError::PlanEmpty.is_fatal());
        assert!(InterpreterError::InvalidPlan("not an array".into()).is_fatal());
        assert!(!InterpreterError::CommandFormat("x".into()).is_fatal());
        assert!(!InterpreterError::Dispatch("foo".into()).is_fatal());
    }

    #[test]
    fn test_dispatch_message() {
        let err = InterpreterError::Dispatch("unknownCmd".into());
        assert_eq!(err.to_string(), "unknown command: unknownCmd()");
        assert_eq!(err.code(), "UNKNOWN_COMMAND");
    }

    #[test]
    fn test_handler_error_wraps_source() {
        let err = InterpreterError::Handler {
            command: "pressKey".into(),
            source: ActionError::UnknownKey("hyper".into()),
        };
        assert_eq!(err.to_string(), "pressKey failed: Unknown key: hyper");
    }
}
