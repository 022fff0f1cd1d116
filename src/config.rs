//! Command-line options. Everything is optional; with no flags the dashboard
//! reads its CSV files from `./data`.

use std::path::PathBuf;

use clap::Parser;

/// Default name of the header logo inside the data directory.
pub const LOGO_FILE: &str = "logo.jpg";

/// Decision intelligence dashboard: revenue forecasts, ROI simulation and customer segments
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the three CSV datasets
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Header logo image (defaults to <DATA_DIR>/logo.jpg)
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Render every view to this JSON file and exit without opening a window
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn logo_path(&self) -> PathBuf {
        self.logo
            .clone()
            .unwrap_or_else(|| self.data_dir.join(LOGO_FILE))
    }

    /// Default `env_logger` filter; `RUST_LOG` still wins.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
