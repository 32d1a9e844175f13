//! Environment variable loading
//!
//! Every helper distinguishes "not set" (`Ok(None)`) from "set but unusable"
//! (`Err`), so callers can keep their current value in the first case and
//! refuse to start in the second.

use crate::{Result, ToolingError};
use std::env;
use std::str::FromStr;

/// Read an environment variable as a string.
///
/// Empty values are treated as unset.
pub fn env_var(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ToolingError::InvalidEnv {
            key: key.to_string(),
            message: "value is not valid UTF-8".to_string(),
        }),
    }
}

/// Read and parse an environment variable.
///
/// ```rust,ignore
/// let port: Option<u16> = env_parse("LOCAL_AGENT_PORT")?;
/// ```
pub fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = env_var(key)? else {
        return Ok(None);
    };

    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ToolingError::InvalidEnv {
            key: key.to_string(),
            message: e.to_string(),
        })
}

/// Read a boolean flag.
///
/// Accepts `true/1/yes/on` and `false/0/no/off`, case-insensitively.
pub fn env_flag(key: &str) -> Result<Option<bool>> {
    let Some(raw) = env_var(key)? else {
        return Ok(None);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(ToolingError::InvalidEnv {
            key: key.to_string(),
            message: format!("expected a boolean, got {:?}", raw),
        }),
    }
}

/// Read a comma-separated list, dropping empty items.
pub fn env_list(key: &str) -> Result<Option<Vec<String>>> {
    Ok(env_var(key)?.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }))
}

/// Build a prefixed, upper-cased variable name: `env_key("LOCAL_AGENT_", "port")`
/// is `LOCAL_AGENT_PORT`.
pub fn env_key(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, name.to_uppercase())
}
