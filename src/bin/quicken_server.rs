//! Static file server binary
//!
//! Serves the index page and export workbooks over HTTP.

use clap::Parser;
use quicken_clean::serve::{run_server, server::DEFAULT_PORT, ServerConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quicken-server")]
#[command(version)]
#[command(about = "Serve index.html and the Quicken export workbooks over HTTP")]
#[command(long_about = r#"
quicken-server - static file server for the cleaner's inputs and outputs

Routes:
  - GET /                     - index.html
  - GET /quicken_export.xlsx  - quicken_export.xlsx
  - GET /sample_export.xlsx   - sample_export.xlsx

All files are read from --root (default: the working directory).
Every other path returns 404. The server always binds all interfaces.

Example usage:
  quicken-server                 # 0.0.0.0:5000
  PORT=8000 quicken-server       # 0.0.0.0:8000
  quicken-server --root ./public --port 3000
"#)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    port: u16,

    /// Directory containing the served files
    #[arg(short, long, default_value = ".")]
    root: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ServerConfig {
        port: args.port,
        root: args.root,
        ..ServerConfig::default()
    };

    run_server(config).await
}
