//! Parsing of individual `name(args)` commands
//!
//! Arguments go through a fixed chain of strategies, strictest first:
//!
//! - [`Strategy::Strict`]: the argument text wrapped in `[...]` is a JSON array
//! - [`Strategy::Sanitized`]: trailing commas removed and stray inner quotes
//!   escaped, then parsed strictly
//! - [`Strategy::Manual`]: comma tokenization outside quotes, never fails
//!
//! Results are memoized in a [`ParseCache`] keyed by the exact command text.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace};

use super::cache::ParseCache;
use super::value::{ArgValue, ParsedCommand};
use crate::error::{InterpreterError, Result};

static COMMAND_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\((?s:(.*))\)\s*$").unwrap());

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*([\]}])").unwrap());

static MANUAL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:\\.|[^"\\])*"|[^,\s][^,]*"#).unwrap());

static PATTERN_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(.+)/([gimsuy]*)$").unwrap());

/// A strategy rejected the argument text.
#[derive(Debug, Clone, Error)]
#[error("{strategy} strategy rejected arguments: {message}")]
pub struct StrategyError {
    pub strategy: &'static str,
    pub message: String,
}

/// Argument parsing strategies, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Strict,
    Sanitized,
    Manual,
}

impl Strategy {
    pub const CHAIN: [Strategy; 3] = [Strategy::Strict, Strategy::Sanitized, Strategy::Manual];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Strict => "strict",
            Strategy::Sanitized => "sanitized",
            Strategy::Manual => "manual",
        }
    }

    /// Parse the text between the command's parentheses.
    pub fn apply(self, args: &str) -> std::result::Result<Vec<ArgValue>, StrategyError> {
        match self {
            Strategy::Strict => parse_strict(args),
            Strategy::Sanitized => parse_sanitized(args),
            Strategy::Manual => Ok(parse_manual(args)),
        }
    }
}

/// Parses command strings, sharing a [`ParseCache`].
#[derive(Debug, Clone, Default)]
pub struct CommandParser {
    cache: Arc<ParseCache>,
}

impl CommandParser {
    /// Parser with its own unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser backed by a shared cache.
    pub fn with_cache(cache: Arc<ParseCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ParseCache> {
        &self.cache
    }

    /// Split `command` into its name and typed arguments.
    pub fn parse(&self, command: &str) -> Result<ParsedCommand> {
        let (name, args_text) = split_command(command)?;

        if let Some(args) = self.cache.get(command) {
            trace!(command = %command, "Parse cache hit");
            return Ok(ParsedCommand {
                name,
                args: args.to_vec(),
            });
        }

        let (args, strategy) = parse_args(args_text);
        if strategy != Strategy::Strict {
            debug!(
                command = %command,
                strategy = strategy.name(),
                "Arguments parsed by fallback strategy"
            );
        }

        let args = self.cache.insert(command, args);
        Ok(ParsedCommand {
            name,
            args: args.to_vec(),
        })
    }
}

fn split_command(command: &str) -> Result<(String, &str)> {
    let caps = COMMAND_SHAPE
        .captures(command)
        .ok_or_else(|| InterpreterError::CommandFormat(command.to_string()))?;

    let name = caps.get(1).map(|m| m.as_str().to_string());
    let args = caps.get(2).map(|m| m.as_str());

    match (name, args) {
        (Some(name), Some(args)) => Ok((name, args)),
        _ => Err(InterpreterError::CommandFormat(command.to_string())),
    }
}

/// Run the strategy chain, returning the first success.
pub(crate) fn parse_args(args: &str) -> (Vec<ArgValue>, Strategy) {
    for strategy in Strategy::CHAIN {
        match strategy.apply(args) {
            Ok(values) => return (values, strategy),
            Err(e) => trace!(error = %e, "Strategy failed"),
        }
    }
    (parse_manual(args), Strategy::Manual)
}

fn parse_strict(args: &str) -> std::result::Result<Vec<ArgValue>, StrategyError> {
    parse_json_array(&format!("[{}]", args), Strategy::Strict)
}

fn parse_sanitized(args: &str) -> std::result::Result<Vec<ArgValue>, StrategyError> {
    let wrapped = format!("[{}]", args);
    let without_commas = TRAILING_COMMA.replace_all(&wrapped, "$1");
    parse_json_array(&escape_inner_quotes(&without_commas), Strategy::Sanitized)
}

fn parse_json_array(
    text: &str,
    strategy: Strategy,
) -> std::result::Result<Vec<ArgValue>, StrategyError> {
    let reject = |message: String| StrategyError {
        strategy: strategy.name(),
        message,
    };

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Ok(items.into_iter().map(json_to_arg).collect()),
        Ok(_) => Err(reject("not an array".to_string())),
        Err(e) => Err(reject(e.to_string())),
    }
}

fn json_to_arg(value: Value) -> ArgValue {
    match value {
        Value::String(s) => ArgValue::String(s),
        Value::Number(n) => match n.as_f64() {
            Some(f) => ArgValue::Number(f),
            None => ArgValue::RawToken(n.to_string()),
        },
        other => ArgValue::RawToken(other.to_string()),
    }
}

/// Escape quotes that sit inside a string literal.
///
/// A quote closes the current string only when the next non-space character
/// is `,`, `]`, `}`, `)` or the end of the text.
fn escape_inner_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if !in_string {
            in_string = c == '"';
            out.push(c);
        } else if c == '\\' {
            out.push(c);
            if let Some(&next) = chars.get(i + 1) {
                out.push(next);
                i += 1;
            }
        } else if c == '"' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, None | Some(',' | ']' | '}' | ')')) {
                in_string = false;
                out.push('"');
            } else {
                out.push_str("\\\"");
            }
        } else {
            out.push(c);
        }

        i += 1;
    }

    out
}

fn parse_manual(args: &str) -> Vec<ArgValue> {
    MANUAL_TOKEN
        .find_iter(args)
        .map(|m| classify_token(m.as_str().trim()))
        .collect()
}

fn classify_token(token: &str) -> ArgValue {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        return ArgValue::String(token[1..token.len() - 1].replace("\\\"", "\""));
    }

    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = token.parse::<f64>() {
            return ArgValue::Number(n);
        }
    }

    if let Some(caps) = PATTERN_LITERAL.captures(token) {
        return ArgValue::Pattern {
            source: caps[1].to_string(),
            flags: caps[2].to_string(),
        };
    }

    ArgValue::RawToken(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> ArgValue {
        ArgValue::String(v.to_string())
    }

    #[test]
    fn test_split_command_tolerates_whitespace() {
        let (name, args) = split_command("  clickAt (1, 2)  ").unwrap();
        assert_eq!(name, "clickAt");
        assert_eq!(args, "1, 2");
    }

    #[test]
    fn test_split_command_rejects_bad_shape() {
        assert!(matches!(
            split_command("clickAt 100 200"),
            Err(InterpreterError::CommandFormat(_))
        ));
        assert!(split_command("1abc()").is_err());
    }

    #[test]
    fn test_split_command_requires_ascii_name() {
        assert!(matches!(split_command("clické()"), Err(InterpreterError::CommandFormat(_))));
        assert!(split_command("click_2()").is_ok());
    }

    #[test]
    fn test_strict_handles_json_literals() {
        let args = parse_strict(r#""a", 1.5, true, null, [1]"#).unwrap();
        assert_eq!(
            args,
            vec![
                s("a"),
                ArgValue::Number(1.5),
                ArgValue::RawToken("true".into()),
                ArgValue::RawToken("null".into()),
                ArgValue::RawToken("[1]".into()),
            ]
        );
    }

    #[test]
    fn test_sanitized_repairs_inner_quotes_and_trailing_comma() {
        assert!(parse_strict(r#""say "hi"", 2,"#).is_err());
        let args = parse_sanitized(r#""say "hi"", 2,"#).unwrap();
        assert_eq!(args, vec![s(r#"say "hi""#), ArgValue::Number(2.0)]);
    }

    #[test]
    fn test_escape_inner_quotes_keeps_valid_text() {
        let text = r#"["a", "b\"c"]"#;
        assert_eq!(escape_inner_quotes(text), text);
    }

    #[test]
    fn test_manual_classifies_tokens() {
        let args = parse_manual(r#" "hello, world", 42, /ab+c/gi, foo bar , 3.5"#);
        assert_eq!(
            args,
            vec![
                s("hello, world"),
                ArgValue::Number(42.0),
                ArgValue::Pattern {
                    source: "ab+c".into(),
                    flags: "gi".into()
                },
                ArgValue::RawToken("foo bar".into()),
                ArgValue::RawToken("3.5".into()),
            ]
        );
    }

    #[test]
    fn test_manual_empty_args() {
        assert!(parse_manual("").is_empty());
        assert!(parse_manual("   ").is_empty());
    }

    #[test]
    fn test_parse_args_reports_strategy() {
        assert_eq!(parse_args("1, 2").1, Strategy::Strict);
        assert_eq!(parse_args(r#""a "b" c""#).1, Strategy::Sanitized);
        assert_eq!(parse_args("/x/, 007").1, Strategy::Manual);
    }

    #[test]
    fn test_cache_hit_uses_fresh_name() {
        let parser = CommandParser::new();
        let first = parser.parse("wait(100)").unwrap();
        let second = parser.parse("wait(100)").unwrap();
        assert_eq!(first, second);
        assert_eq!(parser.cache().len(), 1);
    }
}
