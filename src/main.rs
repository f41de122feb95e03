//! desktop-notes - sticky note widget backend
//!
//! Acts as the host shell for a single widget instance and for the
//! management view. Every command prints its `CommandResponse` as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use desktop_notes::commands;
use desktop_notes::models::response::CommandResponse;
use desktop_notes::models::settings::SettingsUpdate;
use desktop_notes::state::AppState;

/// desktop-notes - sticky note widget backend
#[derive(Parser, Debug)]
#[command(name = "desktop-notes")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the notes database, overriding the configuration
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // === Widget instance ===
    /// Start a widget instance and resolve its note
    Instance {
        /// Instance name, used as its remembered identity slot
        #[arg(short, long)]
        name: String,
    },

    /// Bind a content file to an instance's note
    Bind {
        #[arg(short, long)]
        name: String,
        /// Absolute path of the file
        path: PathBuf,
    },

    /// Hide an instance's note
    Hide {
        #[arg(short, long)]
        name: String,
    },

    /// Request a new note beside an instance's note
    Spawn {
        #[arg(short, long)]
        name: String,
    },

    // === Management view ===
    /// List every note
    #[command(alias = "ls")]
    List,

    /// Set a note's status (shown, hidden, pending_placement)
    SetStatus { id: i64, status: String },

    /// Toggle shown/hidden for a row of the listing
    Toggle { index: usize },

    /// Request a new note at an explicit position
    Request {
        #[arg(long)]
        x: i32,
        #[arg(long)]
        y: i32,
    },

    /// Delete a note
    Delete { id: i64 },

    /// Report store health
    Health,

    // === Settings ===
    /// Show settings, or update the given fields
    Config {
        /// Editor command, must contain {filepath}
        #[arg(long)]
        editor_command: Option<String>,
        /// Gap between a note and one requested beside it
        #[arg(long)]
        new_note_spacing: Option<i32>,
        /// Log filter used when RUST_LOG is not set
        #[arg(long)]
        log_level: Option<String>,
        /// Database file location
        #[arg(long)]
        database_path: Option<PathBuf>,
        /// Restore the default settings
        #[arg(long, conflicts_with_all = ["editor_command", "new_note_spacing", "log_level", "database_path"])]
        reset: bool,
    },
}

fn print<T: Serialize>(response: CommandResponse<T>) -> Result<()> {
    let success = response.success;
    println!("{}", serde_json::to_string_pretty(&response)?);
    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppState::load_config(cli.config).context("failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.get_config().log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut state = AppState::from_config(config, cli.database)
        .context("failed to initialize application state")?;

    match cli.command {
        Commands::Instance { name } => print(commands::start_instance(&state, &name)),
        Commands::Bind { name, path } => print(commands::bind_instance_file(&state, &name, &path)),
        Commands::Hide { name } => print(commands::hide_instance(&state, &name)),
        Commands::Spawn { name } => print(commands::request_note_beside(&state, &name)),
        Commands::List => print(commands::list_notes(&state)),
        Commands::SetStatus { id, status } => print(commands::set_note_status(&state, id, &status)),
        Commands::Toggle { index } => print(commands::toggle_note_at(&state, index)),
        Commands::Request { x, y } => print(commands::request_note(&state, x, y)),
        Commands::Delete { id } => print(commands::delete_note(&state, id)),
        Commands::Health => print(commands::get_health(&state)),
        Commands::Config { reset: true, .. } => print(commands::reset_settings(&mut state)),
        Commands::Config {
            editor_command,
            new_note_spacing,
            log_level,
            database_path,
            reset: false,
        } => {
            let update = SettingsUpdate {
                editor_command,
                database_path,
                new_note_spacing,
                log_level,
            };
            if update == SettingsUpdate::default() {
                print(commands::get_settings(&state))
            } else {
                print(commands::update_settings(&mut state, update))
            }
        }
    }
}
