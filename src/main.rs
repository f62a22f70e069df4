//! Farmdesk - terminal admin dashboard for farm, advisor and visit management
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

use farmdesk::{run_export, run_template, ExportRequest, HeadlessEvent};
use farmdesk_api::ApiClient;
use farmdesk_app::config::{default_config_dir, init_config_dir, load_settings};
use farmdesk_app::{DynPreferences, FileStore};
use farmdesk_core::{logging, Resource};

/// Farmdesk - admin dashboard for farmers, advisors and visits
#[derive(Parser, Debug)]
#[command(name = "farmdesk", version)]
#[command(about = "Terminal admin dashboard for farm, advisor and visit management", long_about = None)]
struct Args {
    /// Directory holding config.toml and preferences.toml
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive dashboard (default)
    Tui,

    /// Export one page of a resource as CSV
    Export {
        /// Resource slug, e.g. farmers, employees, users
        resource: Resource,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Rows per page (10, 25, 50 or 100)
        #[arg(long)]
        page_size: Option<u32>,

        /// Free-text filter
        #[arg(long)]
        search: Option<String>,

        /// Output file; defaults to the export directory
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Write the CSV upload template for a resource
    Template {
        resource: Resource,

        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init()?;

    let args = Args::parse();
    let config_dir = args.config_dir.unwrap_or_else(default_config_dir);
    let settings = load_settings(&config_dir);

    match args.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            if let Err(e) = init_config_dir(&config_dir) {
                tracing::warn!("Could not write default config: {}", e);
            }
            let backend = Arc::new(ApiClient::new(settings.api_config())?);
            let prefs = DynPreferences::boxed(FileStore::open(&config_dir));
            farmdesk_tui::run(settings, prefs, backend).await?;
        }

        Command::Export {
            resource,
            page,
            page_size,
            search,
            out,
        } => {
            let backend = ApiClient::new(settings.api_config())?;
            let prefs = DynPreferences::boxed(FileStore::open(&config_dir));
            let request = ExportRequest {
                resource,
                page,
                page_size,
                search,
                out,
            };
            report(run_export(&backend, &settings, &prefs, request).await);
        }

        Command::Template { resource, out } => {
            report(run_template(&settings, resource, out));
        }
    }

    Ok(())
}

/// Print the outcome of a headless command; failures exit non-zero.
fn report(result: farmdesk_core::Result<HeadlessEvent>) {
    match result {
        Ok(event) => event.emit(),
        Err(e) => {
            HeadlessEvent::error(e.to_string()).emit();
            std::process::exit(1);
        }
    }
}
