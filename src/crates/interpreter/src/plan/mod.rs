//! Command plans: extraction from model output, per-command parsing, caching
//!
//! # Example
//!
//! ```rust,ignore
//! use interpreter::plan::{extract, CommandParser};
//!
//! let plan = extract("Sure! ```json\n[\"clickAt(100,200)\"]\n```")?;
//! let parser = CommandParser::new();
//! let parsed = parser.parse(&plan.entries()[0])?;
//! assert_eq!(parsed.name, "clickAt");
//! ```

pub mod cache;
pub mod extract;
pub mod parser;
pub mod value;

pub use cache::ParseCache;
pub use extract::extract;
pub use parser::{CommandParser, Strategy, StrategyError};
pub use value::{ArgValue, CommandPlan, ParsedCommand};
