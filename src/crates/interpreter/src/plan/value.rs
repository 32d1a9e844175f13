//! Plan and argument types

use crate::error::{InterpreterError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Ordered list of raw command strings, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandPlan(Vec<String>);

impl CommandPlan {
    pub fn new(entries: Vec<String>) -> Self {
        Self(entries)
    }

    /// Build a plan from an arbitrary JSON value.
    ///
    /// Non-string entries are kept as their JSON text so that they fail on
    /// their own when parsed, without affecting their neighbours.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Self(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            other => Err(InterpreterError::InvalidPlan(format!(
                "expected an array of commands, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for CommandPlan {
    fn from(entries: Vec<String>) -> Self {
        Self(entries)
    }
}

impl<'a> IntoIterator for &'a CommandPlan {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One positional argument of a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ArgValue {
    String(String),
    Number(f64),
    /// `/source/flags` literal
    Pattern { source: String, flags: String },
    /// Anything else, kept verbatim
    RawToken(String),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::String(s) => write!(f, "{}", s),
            ArgValue::Number(n) => write!(f, "{}", n),
            ArgValue::Pattern { source, flags } => write!(f, "/{}/{}", source, flags),
            ArgValue::RawToken(t) => write!(f, "{}", t),
        }
    }
}

/// A command split into its name and arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<ArgValue>,
}
