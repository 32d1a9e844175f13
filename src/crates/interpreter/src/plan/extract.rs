//! Locating the command array inside raw model output
//!
//! Models wrap their answer in markdown fences, add prose before and after,
//! leave `//` comments in the array and emit trailing commas. Extraction
//! peels those layers off in a fixed order:
//!
//! 1. fenced blocks holding an array are replaced by their interior, other
//!    fenced blocks are dropped, stray fence markers are deleted
//! 2. the text from the first `[` to the last `]` is taken
//! 3. `//` comments outside strings are stripped
//! 4. line breaks become spaces
//! 5. the result is parsed as JSON, with one trailing-comma repair retry

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::value::CommandPlan;
use crate::error::{InterpreterError, Result};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[\w-]*[^\S\n]*\n?(.*?)```").unwrap());

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*([\]}])").unwrap());

/// Extract the command plan embedded in `raw`.
pub fn extract(raw: &str) -> Result<CommandPlan> {
    let unfenced = strip_fences(raw);

    let array = locate_array(&unfenced)
        .ok_or_else(|| InterpreterError::Extraction("no array found".to_string()))?;

    let cleaned = normalize_line_breaks(&strip_line_comments(array));
    let plan = CommandPlan::from_value(parse_with_repair(&cleaned)?)?;

    if plan.is_empty() {
        return Err(InterpreterError::PlanEmpty);
    }

    debug!(commands = plan.len(), "Extracted command plan");
    Ok(plan)
}

fn strip_fences(raw: &str) -> String {
    let replaced = FENCED_BLOCK.replace_all(raw, |caps: &regex::Captures<'_>| {
        let interior = &caps[1];
        if interior.contains('[') && interior.contains(']') {
            interior.to_string()
        } else {
            String::new()
        }
    });
    replaced.replace("```", "")
}

fn locate_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Remove `//` comments up to the end of the line, leaving string literals
/// (and the URLs inside them) alone.
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn parse_with_repair(text: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(first) => {
            debug!(error = %first, "Strict plan parse failed, removing trailing commas");
            let repaired = TRAILING_COMMA.replace_all(text, "$1");
            serde_json::from_str::<Value>(&repaired).map_err(|second| {
                InterpreterError::PlanMalformed(format!("{}; after repair: {}", first, second))
            })
        }
    }
}
