//! Browser command vocabulary
//!
//! Registered only when a [`BrowserSession`] is available. Selectors are
//! passed through to the session unchanged.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{resolve_path, write_output};
use crate::error::ActionError;
use crate::plan::ArgValue;
use crate::registry::{ActionHandler, ActionOutcome, ActionRegistry, Args};

/// A controllable browser page.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), ActionError>;

    async fn click(&self, selector: &str) -> Result<(), ActionError>;

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), ActionError>;

    /// Rows of the table matched by `selector`, header row first.
    async fn extract_table(&self, selector: &str) -> Result<Vec<Vec<String>>, ActionError>;

    /// PNG bytes of the element matched by `selector`.
    async fn screenshot_region(&self, selector: &str) -> Result<Vec<u8>, ActionError>;

    /// Run a named multi-step flow known to the session, such as an order
    /// form walkthrough.
    async fn run_flow(&self, name: &str, params: &[ArgValue]) -> Result<Option<String>, ActionError>;
}

/// Commands bound by [`BrowserActions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserCommand {
    Navigate,
    ClickSelector,
    TypeSelector,
    ExtractTable,
    ScreenshotRegion,
    OrderFlow,
}

impl BrowserCommand {
    pub const ALL: [BrowserCommand; 6] = [
        BrowserCommand::Navigate,
        BrowserCommand::ClickSelector,
        BrowserCommand::TypeSelector,
        BrowserCommand::ExtractTable,
        BrowserCommand::ScreenshotRegion,
        BrowserCommand::OrderFlow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BrowserCommand::Navigate => "navigate",
            BrowserCommand::ClickSelector => "clickSelector",
            BrowserCommand::TypeSelector => "typeSelector",
            BrowserCommand::ExtractTable => "extractTable",
            BrowserCommand::ScreenshotRegion => "screenshotRegion",
            BrowserCommand::OrderFlow => "orderFlow",
        }
    }
}

/// Browser actions over a [`BrowserSession`].
pub struct BrowserActions {
    session: Arc<dyn BrowserSession>,
    output_dir: PathBuf,
}

impl BrowserActions {
    pub fn new(session: Arc<dyn BrowserSession>) -> Self {
        Self {
            session,
            output_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Base directory for relative CSV and screenshot paths.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn register(self, registry: &mut ActionRegistry) {
        let actions = Arc::new(self);
        for command in BrowserCommand::ALL {
            registry.register(
                command.name(),
                BrowserHandler {
                    command,
                    actions: actions.clone(),
                },
            );
        }
        info!(commands = BrowserCommand::ALL.len(), "Registered browser actions");
    }

    pub async fn run(&self, command: BrowserCommand, values: &[ArgValue]) -> ActionOutcome {
        let args = Args::new(command.name(), values);

        match command {
            BrowserCommand::Navigate => self.session.navigate(&args.string(0)?).await?,
            BrowserCommand::ClickSelector => self.session.click(&args.string(0)?).await?,
            BrowserCommand::TypeSelector => {
                self.session
                    .type_text(&args.string(0)?, &args.string(1)?)
                    .await?
            }
            BrowserCommand::ExtractTable => {
                let selector = args.string(0)?;
                let path = resolve_path(&self.output_dir, &args.string(1)?);
                let delimiter = delimiter(&args.string_or(2, ","))?;

                let rows = self.session.extract_table(&selector).await?;
                write_output(&path, &to_csv(&rows, delimiter)?).await?;
                return Ok(Some(format!(
                    "Extracted {} rows to {}",
                    rows.len(),
                    path.display()
                )));
            }
            BrowserCommand::ScreenshotRegion => {
                let selector = args.string(0)?;
                let path = resolve_path(&self.output_dir, &args.string(1)?);

                let png = self.session.screenshot_region(&selector).await?;
                write_output(&path, &png).await?;
                return Ok(Some(format!("Screenshot saved to {}", path.display())));
            }
            BrowserCommand::OrderFlow => {
                let name = args.string(0)?;
                return self.session.run_flow(&name, &values[1..]).await;
            }
        }

        Ok(None)
    }
}

struct BrowserHandler {
    command: BrowserCommand,
    actions: Arc<BrowserActions>,
}

#[async_trait]
impl ActionHandler for BrowserHandler {
    async fn invoke(&self, args: &[ArgValue]) -> ActionOutcome {
        self.actions.run(self.command, args).await
    }
}

fn delimiter(raw: &str) -> Result<u8, ActionError> {
    match raw.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ActionError::invalid(format!(
            "extractTable: delimiter must be a single ASCII character, got {:?}",
            raw
        ))),
    }
}

fn to_csv(rows: &[Vec<String>], delimiter: u8) -> Result<Vec<u8>, ActionError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ActionError::device(format!("csv: {}", e)))
}
