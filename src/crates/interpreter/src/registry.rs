//! Command name to handler mapping

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ActionError;
use crate::plan::ArgValue;

/// What a handler returns: an optional informational message, or an error.
pub type ActionOutcome = std::result::Result<Option<String>, ActionError>;

/// A primitive action bound to a command name.
///
/// Handlers receive arguments positionally and perform one effect. The
/// executor never runs two handlers at the same time.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn invoke(&self, args: &[ArgValue]) -> ActionOutcome;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> ActionHandler for FnHandler<F>
where
    F: Fn(Vec<ArgValue>) -> Fut + Send + Sync,
    Fut: Future<Output = ActionOutcome> + Send + 'static,
{
    async fn invoke(&self, args: &[ArgValue]) -> ActionOutcome {
        (self.0)(args.to_vec()).await
    }
}

/// Registry of action handlers, looked up by exact command name.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, name: impl Into<String>, handler: H) -> &mut Self
    where
        H: ActionHandler + 'static,
    {
        self.register_arc(name, Arc::new(handler))
    }

    pub fn register_arc(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ActionHandler>,
    ) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Register an async closure.
    ///
    /// ```rust,ignore
    /// registry.register_fn("ping", |_args| async { Ok(Some("pong".to_string())) });
    /// ```
    pub fn register_fn<F, Fut>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Vec<ArgValue>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionOutcome> + Send + 'static,
    {
        self.register(name, FnHandler(f))
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.remove(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

/// Positional argument accessors with lenient coercion.
///
/// Models are inconsistent about quoting, so numbers are accepted from
/// numeric strings and strings are accepted from any scalar.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    command: &'a str,
    values: &'a [ArgValue],
}

impl<'a> Args<'a> {
    pub fn new(command: &'a str, values: &'a [ArgValue]) -> Self {
        Self { command, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a ArgValue> {
        self.values.get(index)
    }

    pub fn string(&self, index: usize) -> std::result::Result<String, ActionError> {
        match self.values.get(index) {
            Some(ArgValue::String(s)) | Some(ArgValue::RawToken(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(self.missing(index, "string")),
        }
    }

    pub fn string_or(&self, index: usize, default: &str) -> String {
        self.string(index).unwrap_or_else(|_| default.to_string())
    }

    pub fn number(&self, index: usize) -> std::result::Result<f64, ActionError> {
        match self.values.get(index) {
            Some(value) => coerce_number(value).ok_or_else(|| {
                ActionError::invalid(format!(
                    "{}: argument {} must be a number, got {}",
                    self.command,
                    index + 1,
                    value
                ))
            }),
            None => Err(self.missing(index, "number")),
        }
    }

    /// Like [`Args::number`], but a missing argument yields `default`.
    pub fn number_or(&self, index: usize, default: f64) -> std::result::Result<f64, ActionError> {
        if index >= self.values.len() {
            return Ok(default);
        }
        self.number(index)
    }

    fn missing(&self, index: usize, kind: &str) -> ActionError {
        ActionError::invalid(format!(
            "{}: missing {} argument {}",
            self.command,
            kind,
            index + 1
        ))
    }
}

fn coerce_number(value: &ArgValue) -> Option<f64> {
    match value {
        ArgValue::Number(n) => Some(*n),
        ArgValue::String(s) | ArgValue::RawToken(s) => s.trim().parse::<f64>().ok(),
        ArgValue::Pattern { .. } => None,
    }
}
