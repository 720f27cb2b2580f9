use anyhow::Result;
use tui_mood_app::app::App;
use tui_mood_app::config::{AppConfig, LoggingConfig};
use tui_mood_app::tui;

/// EnvFilter from `RUST_LOG` when set, otherwise from the logging config
/// section (base level plus per-module overrides).
fn env_filter(logging: &LoggingConfig) -> tracing_subscriber::EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        return tracing_subscriber::EnvFilter::from_default_env();
    }
    let mut directives = logging.level.clone();
    for (module, level) in &logging.module_levels {
        directives.push_str(&format!(",{module}={level}"));
    }
    tracing_subscriber::EnvFilter::new(directives)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load();

    // The terminal decides where tracing writes: once the TUI owns the
    // screen, anything printed to stdout/stderr would corrupt it, so logs
    // go to a daily-rolling file instead. If the terminal cannot be
    // initialized at all, log to the console where the user can see it.
    match tui::init() {
        Ok(terminal) => {
            let log_dir = config.logging.log_directory.as_deref().unwrap_or("logs");
            let file_appender = tracing_appender::rolling::daily(log_dir, "tui-mood-app.log");
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::fmt()
                .with_env_filter(env_filter(&config.logging))
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();

            let mut app = App::new();
            let res = app.run(terminal).await;

            tui::restore()?;

            // Full traces are in the log file; a short line on stderr is
            // enough once the terminal is back to normal.
            if let Err(err) = res {
                eprintln!("{err:?}");
            }

            Ok(())
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(&config.logging))
                .init();

            eprintln!("Failed to initialize TUI: {e:?}");
            Err(e)
        }
    }
}
