//! Pulse - Command line entry point
//!
//! Drives the request workbench against the PulseAPI backend. Results are
//! printed to stdout as JSON; logs and notices go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pulse_application::{SaveTarget, Workbench};
use pulse_domain::{BodyContentType, ClientSettings, HttpMethod, RunDisplay, TabId};
use pulse_infrastructure::{
    ReqwestRequestService, SettingsRepository, SystemClock, TracingNotifier, to_json_stable,
};

#[derive(Parser, Debug)]
#[command(name = "pulse", version, about = "PulseAPI request workbench")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a persisted request
    Show {
        /// Request id
        id: String,
    },
    /// Execute a persisted request and print its run
    Run {
        /// Request id
        id: String,
    },
    /// Create a request in a collection
    Create {
        /// Target URL
        url: String,
        /// Target collection
        #[arg(long)]
        collection: String,
        /// Request name
        #[arg(long)]
        name: String,
        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: HttpMethod,
        /// Workspace (defaults to the configured one)
        #[arg(long)]
        workspace: Option<String>,
        /// Header as `Name: value`, repeatable
        #[arg(long = "header", value_name = "HEADER")]
        headers: Vec<String>,
        /// Request body
        #[arg(long)]
        body: Option<String>,
        /// Send the body as plain text instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Rename or move a persisted request
    Update {
        /// Request id
        id: String,
        /// New name
        #[arg(long)]
        name: String,
        /// Destination collection
        #[arg(long)]
        collection: Option<String>,
    },
    /// Delete a persisted request
    Delete {
        /// Request id
        id: String,
    },
    /// Print the effective settings
    Settings,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let repository = cli
        .config
        .clone()
        .map_or_else(SettingsRepository::new, SettingsRepository::at);
    let settings = repository.load().await?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(
        api = %settings.api_base_url,
        "starting Pulse v{}",
        env!("CARGO_PKG_VERSION")
    );

    if matches!(cli.command, Command::Settings) {
        print!("{}", to_json_stable(&settings)?);
        return Ok(ExitCode::SUCCESS);
    }

    let workbench = build_workbench(settings)?;
    let ok = run(&workbench, cli.command).await?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn build_workbench(settings: ClientSettings) -> Result<Workbench, Box<dyn std::error::Error>> {
    let service = ReqwestRequestService::new(&settings)?;
    Ok(Workbench::new(
        Arc::new(service),
        Arc::new(TracingNotifier),
        Arc::new(SystemClock),
        settings,
    ))
}

/// Runs one command; returns whether it took effect.
async fn run(
    workbench: &Workbench,
    command: Command,
) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Command::Show { id } => {
            let Some(tab_id) = workbench.open_existing(&id).await else {
                return Ok(false);
            };
            if let Some(tab) = workbench.tab(&tab_id) {
                print!("{}", to_json_stable(&tab)?);
            }
            Ok(true)
        }
        Command::Run { id } => {
            if workbench.open_existing(&id).await.is_none() {
                return Ok(false);
            }
            let run = workbench.execute_active().await;
            // Failed executions still record a run; print whatever the tab holds.
            let Some(last_run) = workbench.active_tab().and_then(|tab| tab.last_run) else {
                return Ok(false);
            };
            print!("{}", to_json_stable(&last_run)?);
            match last_run.display() {
                RunDisplay::Failed(message) => {
                    tracing::error!(synthesized = last_run.is_synthesized(), "{message}");
                }
                RunDisplay::Response(status) if !last_run.is_success() => {
                    tracing::warn!(status, "request answered with an error status");
                }
                RunDisplay::Response(_) => {}
            }
            Ok(run.is_some())
        }
        Command::Create {
            url,
            collection,
            name,
            method,
            workspace,
            headers,
            body,
            text,
        } => {
            let content_type = if text {
                BodyContentType::Text
            } else {
                BodyContentType::Json
            };
            let created = create(
                workbench,
                Draft {
                    url,
                    method,
                    headers,
                    body,
                    content_type,
                },
                SaveTarget {
                    workspace_id: workspace,
                    collection_id: collection,
                    name,
                },
            )
            .await;
            let Some(tab_id) = created else {
                return Ok(false);
            };
            if let Some(tab) = workbench.tab(&tab_id) {
                print!("{}", to_json_stable(&tab)?);
            }
            Ok(true)
        }
        Command::Update {
            id,
            name,
            collection,
        } => {
            if workbench.open_existing(&id).await.is_none() {
                return Ok(false);
            }
            let Some(request) = workbench.update_active(name, collection).await else {
                return Ok(false);
            };
            print!("{}", to_json_stable(&request)?);
            Ok(true)
        }
        Command::Delete { id } => {
            let Some(tab_id) = workbench.open_existing(&id).await else {
                return Ok(false);
            };
            Ok(workbench.delete(&tab_id).await.is_some())
        }
        Command::Settings => {
            print!("{}", to_json_stable(workbench.settings())?);
            Ok(true)
        }
    }
}

/// Fields of a request typed on the command line.
struct Draft {
    url: String,
    method: HttpMethod,
    headers: Vec<String>,
    body: Option<String>,
    content_type: BodyContentType,
}

/// Fills a new tab through the editors, then saves it.
async fn create(workbench: &Workbench, draft: Draft, target: SaveTarget) -> Option<TabId> {
    let tab_id = workbench.new_request();

    let mut url_editor = workbench.url_editor(&tab_id)?;
    url_editor.set_url(draft.url);
    url_editor.set_method(draft.method);
    url_editor.settle().await;

    if !draft.headers.is_empty() {
        let mut header_editor = workbench.header_editor(&tab_id)?;
        for (index, header) in draft.headers.iter().enumerate() {
            let (key, value) = header.split_once(':').unwrap_or((header.as_str(), ""));
            if index > 0 {
                header_editor.add_row();
            }
            header_editor.edit_row(index, key.trim(), value.trim());
        }
        header_editor.settle().await;
    }

    if let Some(body) = draft.body {
        let mut body_editor = workbench.body_editor(&tab_id)?;
        body_editor.set_content_type(draft.content_type);
        body_editor.set_text(body);
        if !workbench.save_body(&tab_id, &mut body_editor).await {
            return None;
        }
    }

    workbench.save_active(target).await
}
