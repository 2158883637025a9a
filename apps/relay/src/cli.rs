//! CLI command handling for the relay server

use crate::context_factory::{create_context, Indexing};
use anyhow::Context;
use clap::{Parser, Subcommand};
use relay_config::{AppConfig, ProjectConfig};
use relay_handlers::{OperationHandler, StatusHandler};
use std::path::PathBuf;
use tracing::info;

/// The main CLI struct.
#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(about = "HTTP router dispatching refactoring requests to per-language backends")]
#[command(version)]
pub struct Cli {
    /// The command to run; `serve` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// The available commands.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Open the projects and start the HTTP server
    Serve {
        /// Project to open, as NAME=PATH (repeatable)
        #[arg(long = "project", value_parser = parse_project)]
        projects: Vec<ProjectConfig>,
        /// Port to bind to, overriding the configuration
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the status payload for the configured projects and exit
    Status {
        /// Project to open, as NAME=PATH (repeatable)
        #[arg(long = "project", value_parser = parse_project)]
        projects: Vec<ProjectConfig>,
    },
}

/// Parse `NAME=PATH`
fn parse_project(value: &str) -> Result<ProjectConfig, String> {
    let (name, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{}'", value))?;
    let name = name.trim();
    if name.is_empty() || path.trim().is_empty() {
        return Err(format!("expected NAME=PATH, got '{}'", value));
    }
    Ok(ProjectConfig {
        name: name.to_string(),
        path: PathBuf::from(path.trim()),
    })
}

/// Fold command-line overrides into the loaded configuration
fn apply_overrides(
    mut config: AppConfig,
    projects: Vec<ProjectConfig>,
    port: Option<u16>,
) -> anyhow::Result<AppConfig> {
    for project in projects {
        config
            .projects
            .retain(|existing| !existing.name.eq_ignore_ascii_case(&project.name));
        config.projects.push(project);
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate().context("Invalid command-line options")?;
    Ok(config)
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve {
        projects: Vec::new(),
        port: None,
    });

    let config = AppConfig::load().context("Failed to load configuration")?;

    match command {
        Commands::Serve { projects, port } => {
            let config = apply_overrides(config, projects, port)?;
            relay_config::logging::initialize(&config);
            info!(
                version = env!("CARGO_PKG_VERSION"),
                projects = config.projects.len(),
                "Starting relay"
            );

            let context = create_context(&config, Indexing::Background).await?;
            relay_transport::start_http_server(&config.server, context)
                .await
                .context("HTTP server failed")?;
        }
        Commands::Status { projects } => {
            let config = apply_overrides(config, projects, None)?;
            let context = create_context(&config, Indexing::Wait).await?;
            let status = StatusHandler::new().handle(&context, ()).await;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}
