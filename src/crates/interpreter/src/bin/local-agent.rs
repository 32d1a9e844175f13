//! Local automation agent
//!
//! Serves the plan interpreter over HTTP, or runs a single instruction or
//! plan file from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use interpreter::agent::build_agent;
use interpreter::api::{create_router, AppState};
use interpreter::plan::extract;
use interpreter::{AgentConfig, PlanReport};
use llm::remote::GeminiClient;
use llm::{StaticGenerator, TextGenerator};
use tokio::io::AsyncReadExt;
use tooling::config::ConfigBuilder;
use tooling::logging::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "local-agent", version, about = "Turns instructions into executed desktop automation plans")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "LOCAL_AGENT_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Record process launches instead of starting them
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Generate and execute a plan for one instruction
    Run {
        instruction: String,
        /// Use the model answer stored in this file instead of calling the model
        #[arg(long)]
        replay: Option<PathBuf>,
        /// Print the generated plan without executing it
        #[arg(long)]
        plan_only: bool,
    },
    /// Execute a plan file; `-` reads standard input
    Exec { plan: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing("info", cli.verbose)?;

    let mut config = AgentConfig::resolve(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.dry_run {
        config.dry_run = true;
    }
    if let Command::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Command::Serve { .. } => serve(config).await,
        Command::Run {
            instruction,
            replay,
            plan_only,
        } => {
            let generator: Arc<dyn TextGenerator> = match replay {
                Some(path) => {
                    let recorded = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    Arc::new(StaticGenerator::new(recorded))
                }
                None => gemini(&config)?,
            };
            let agent = build_agent(&config, generator);

            if plan_only {
                let plan = agent.plan(&instruction).await?;
                println!("{}", serde_json::to_string_pretty(&plan)?);
                return Ok(());
            }
            print_report(&agent.run(&instruction).await?)
        }
        Command::Exec { plan } => {
            let text = if plan == "-" {
                let mut text = String::new();
                tokio::io::stdin().read_to_string(&mut text).await?;
                text
            } else {
                tokio::fs::read_to_string(&plan)
                    .await
                    .with_context(|| format!("Failed to read {}", plan))?
            };

            let agent = build_agent(&config, Arc::new(StaticGenerator::new(String::new())));
            print_report(&agent.run_plan(extract(&text)?).await?)
        }
    }
}

async fn serve(config: AgentConfig) -> Result<()> {
    let addr = config.socket_addr()?;
    let agent = build_agent(&config, gemini(&config)?);
    let app = create_router(AppState::new(agent), &config.server.allowed_origins);

    tracing::info!(
        origins = ?config.server.allowed_origins,
        dry_run = config.dry_run,
        "Starting local agent on http://{}",
        addr
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Local agent shut down gracefully");
    Ok(())
}

fn gemini(config: &AgentConfig) -> Result<Arc<dyn TextGenerator>> {
    if !config.llm.has_api_key() {
        tracing::warn!("GEMINI_API_KEY is not set; instructions will produce no plan");
    }
    let client = GeminiClient::new(config.llm.clone()).context("Failed to create Gemini client")?;
    Ok(Arc::new(client))
}

fn print_report(report: &PlanReport) -> Result<()> {
    for entry in report.logs.outcomes() {
        tracing::debug!("{}", entry.summary());
    }
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL-C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
