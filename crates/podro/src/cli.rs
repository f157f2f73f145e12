use std::path::PathBuf;

use clap::Parser;

/// Pocket DRO — shop-floor settings store with machine, project and style
/// data served to the browser UI.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Address to bind the web server to.
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value = "3090")]
    pub port: u16,

    /// Path to the JSON file backing the store.
    /// If omitted, data is held in memory only and lost on exit.
    #[arg(long, env = "PODRO_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Byte cap for the in-memory store (ignored with --data-file).
    #[arg(long)]
    pub quota_bytes: Option<usize>,

    /// Fixed API token for this session. A random token is generated
    /// when omitted.
    #[arg(long, env = "PODRO_API_TOKEN")]
    pub api_token: Option<String>,
}
