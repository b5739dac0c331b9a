//! Command-line interface for gofcm.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigArgs;

/// Top-level command line
#[derive(Parser, Debug)]
#[command(name = "gofcm", version, about = "gofcm push service configuration")]
pub struct Cli {
    /// Configuration file. When omitted, go_fcm.yml is searched for in
    /// /etc/gofcm, ~/.gofcm and the current directory
    #[arg(short, long, global = true, env = "GOFCM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect configuration resolution
    Config(ConfigArgs),

    /// Resolve the configuration, start logging and report startup settings
    Check,
}

/// Print the error chain and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": causes,
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
