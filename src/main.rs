//! CardioAI: Cardiovascular risk assessment in the terminal.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardioai::adapters::sanitize::SanitizingMakeWriter;
use cardioai::application::EntrySignal;
use cardioai::config::Settings;
use cardioai::tui::App;

fn main() -> Result<()> {
    // Initialize logging.
    //
    // Writing logs to the terminal corrupts the TUI (alternate screen), so an
    // interactive session logs to a file and a piped one logs to stdout.
    let log_mode = std::env::var("CARDIOAI_LOG_MODE").unwrap_or_else(|_| "auto".to_string());

    let interactive = std::io::stdout().is_terminal();
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stdout" => false,
        // auto
        _ => interactive,
    };

    let (writer, _guard) = if use_file {
        let log_file =
            std::env::var("CARDIOAI_LOG_FILE").unwrap_or_else(|_| "cardioai.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: a missing directory surfaces as the open error below.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting CardioAI...");

    let settings = Settings::from_env();
    if settings.api_url.is_none() {
        tracing::warn!("CARDIOAI_API_URL is not set; predictions will use the fallback result");
    }

    let mut app = App::new(settings, EntrySignal::from_args(std::env::args().skip(1)))?;
    app.run()?;

    tracing::info!("CardioAI shutdown complete.");
    Ok(())
}
