//! Command-line configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "freewrite", version, about = "Distraction-free writing in the terminal")]
pub struct Cli {
    /// Directory holding entries and preferences
    #[arg(long, env = "FREEWRITE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log file (defaults to freewrite.log in the data directory)
    #[arg(long, env = "FREEWRITE_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print stored entries, newest first
    List,
}

impl Cli {
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn resolve_log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.resolve_data_dir().join("freewrite.log"))
    }
}

/// `$XDG_DATA_HOME/freewrite`, then `$HOME/.local/share/freewrite`, then `./.freewrite`
fn default_data_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("freewrite");
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("freewrite");
    }
    PathBuf::from(".freewrite")
}
