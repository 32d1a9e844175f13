//! Logging utilities
//!
//! Subscriber setup for binaries plus small helpers used when emitting
//! structured `tracing` events.

use std::sync::LazyLock;
use std::time::{Duration, Instant};
use regex::Regex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{Result, ToolingError};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` is used, raised to
/// `debug` when `verbose` is true.
pub fn init_tracing(default_directive: &str, verbose: bool) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::new(directive),
        _ if verbose => EnvFilter::new("debug"),
        _ => EnvFilter::new(default_directive),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| ToolingError::Logging(e.to_string()))
}

/// Await `future`, logging its duration at debug level.
///
/// ```rust,ignore
/// let plan = timed("generate_plan", generator.generate(&prompt)).await;
/// ```
pub async fn timed<F, T>(name: &str, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let start = Instant::now();
    debug!("Starting: {}", name);

    let result = future.await;

    debug!("Completed: {} in {}", name, format_duration(start.elapsed()));
    result
}

/// Format duration in human-readable form
///
/// ```rust
/// use tooling::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
/// assert_eq!(format_duration(Duration::from_micros(500)), "500μs");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{}ms", micros / 1000)
    } else if micros < 60_000_000 {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    } else {
        let seconds = micros / 1_000_000;
        format!("{}m{}s", seconds / 60, seconds % 60)
    }
}

static REDACTION_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"([?&]key=)[^&\s]+", "${1}[REDACTED]"),
        (r"(?i)(api[\s_-]?key|apikey)\s*[:=]\s*\S+", "$1: [REDACTED]"),
        (r"(?i)(password|passwd|pwd)\s*[:=]\s*\S+", "$1: [REDACTED]"),
        (r"(?i)(token|secret)\s*[:=]\s*\S+", "$1: [REDACTED]"),
        (r"(?i)(authorization)\s*:\s*bearer\s+\S+", "$1: Bearer [REDACTED]"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Redact credentials before a string reaches the logs.
///
/// Covers `?key=` query parameters (the Gemini API key travels that way) and
/// the usual `api_key: …`, `password=…`, `token=…` and bearer header forms.
///
/// ```rust
/// use tooling::logging::sanitize_for_logging;
///
/// let url = "https://example.test/v1/models/m:generateContent?key=abc123";
/// assert!(!sanitize_for_logging(url).contains("abc123"));
/// ```
pub fn sanitize_for_logging(input: &str) -> String {
    REDACTION_RULES
        .iter()
        .fold(input.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

/// Shorten `text` to at most `max_chars` characters for log fields.
pub fn truncate_for_logging(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
