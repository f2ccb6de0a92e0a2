mod core;
mod identity;
#[cfg(test)]
mod test_support;
mod transport;
mod tui;

use clap::Parser;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

use crate::core::config::{CliOverrides, DEFAULT_LOG_LEVEL, HimasifConfig, load_config, resolve};

#[derive(Parser)]
#[command(name = "himasif", about = "Terminal client for the 360 AI HIMASIF assistant")]
struct Args {
    /// Chat backend base URL (overrides config and HIMASIF_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Disable Google sign-in even when credentials are configured
    #[arg(long)]
    no_auth: bool,
}

/// Start the file logger before the config is read, at the default level.
/// The logger itself accepts everything; `log::set_max_level` narrows it
/// once the configured level is known.
fn init_file_logger(log_file: File) -> Result<(), SetLoggerError> {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    WriteLogger::init(LevelFilter::Trace, log_config, log_file)?;
    log::set_max_level(DEFAULT_LOG_LEVEL);
    Ok(())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Writes to himasif.log in current directory
    if let Ok(log_file) = File::create("himasif.log") {
        let _ = init_file_logger(log_file);
    }

    let file_config = load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}, using defaults");
        log::warn!("Config not loaded: {}", e);
        HimasifConfig::default()
    });
    let config = resolve(
        &file_config,
        &CliOverrides {
            backend_url: args.backend_url,
            no_auth: args.no_auth,
        },
    );
    log::set_max_level(config.log_level);

    log::info!("360 AI HIMASIF starting up, backend {}", config.backend_url);

    tui::run(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_captures_startup_lines_then_narrows() {
        let path = std::env::temp_dir().join(format!("himasif-log-{}.log", std::process::id()));
        init_file_logger(File::create(&path).unwrap()).unwrap();

        log::info!("loaded before resolve");
        log::set_max_level(LevelFilter::Warn);
        log::info!("filtered after resolve");
        log::warn!("kept after resolve");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("loaded before resolve"));
        assert!(!contents.contains("filtered after resolve"));
        assert!(contents.contains("kept after resolve"));
        std::fs::remove_file(&path).unwrap();
    }
}
