use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log filter used by every binary when `RUST_LOG` is unset or unparsable
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the tracing filter from a `RUST_LOG` value
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// [`log_filter`] over the process environment
pub fn env_log_filter() -> EnvFilter {
    log_filter(std::env::var("RUST_LOG").ok().as_deref())
}

/// Viewer CLI (also reads from env via clap)
#[derive(Parser, Debug, Clone)]
#[command(name = "broadcast_guide", about = "Show where to watch today's games for your ZIP code")]
pub struct ViewerCli {
    /// ZIP code to switch to; remembered for the next run
    #[arg(long)]
    pub zip: Option<String>,
    /// File holding the last used ZIP code (env: GUIDE_STATE_FILE)
    #[arg(long, env = "GUIDE_STATE_FILE", default_value = "data/location.json")]
    pub state_file: PathBuf,
    /// Guide API base URL; without it the built-in sample schedule is used (env: GUIDE_SERVER)
    #[arg(long, env = "GUIDE_SERVER")]
    pub server: Option<String>,
}

/// API server configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "api_server", about = "Broadcast guide REST API")]
pub struct ServerCli {
    /// Address to bind (env: GUIDE_HOST)
    #[arg(long, env = "GUIDE_HOST", default_value_t = String::from("0.0.0.0"))]
    pub host: String,
    /// Port to listen on (env: GUIDE_PORT)
    #[arg(long, env = "GUIDE_PORT", default_value_t = 8080)]
    pub port: u16,
    /// JSON rule file written by import_rules; sample rules when absent (env: GUIDE_RULES)
    #[arg(long, env = "GUIDE_RULES")]
    pub rules: Option<PathBuf>,
}

/// CSV rule importer
#[derive(Parser, Debug, Clone)]
#[command(name = "import_rules", about = "Convert a DMA rule CSV into the server's JSON rule file")]
pub struct ImportCli {
    /// CSV with columns dma,team,sport,channel
    #[arg(long)]
    pub csv: PathBuf,
    /// Output JSON rule file
    #[arg(long, default_value = "data/rules.json")]
    pub out: PathBuf,
    /// Merge into an existing output file instead of replacing it
    #[arg(long, default_value_t = false)]
    pub merge: bool,
}
