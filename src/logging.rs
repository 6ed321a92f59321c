//! Logging setup with journald support on Linux.
//!
//! The panel owns the terminal, so nothing may be written to stdout. Logs go
//! to systemd's journal when it is reachable and to a daily-rolling file
//! otherwise.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `info` everywhere, plus a debug line per gallery request and snapshot so
/// sync problems can be traced without setting `GALLERY_PANEL_LOG`.
pub const DEFAULT_FILTER: &str = "info,gallery_panel::gallery=debug";

/// Initialize the logging system.
///
/// Log level is taken from `GALLERY_PANEL_LOG` (e.g. `debug`,
/// `gallery_panel::gallery=trace`), defaulting to [`DEFAULT_FILTER`].
pub fn init(log_dir: Option<PathBuf>) -> Result<()> {
    let env_filter = EnvFilter::try_from_env("GALLERY_PANEL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    #[cfg(target_os = "linux")]
    {
        if let Ok(journald_layer) = tracing_journald::layer() {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(journald_layer)
                .init();

            tracing::info!("Logging initialized with journald backend");
            return Ok(());
        }
    }

    let log_dir = log_dir.unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gallery-panel")
            .join("logs")
    });

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "gallery-panel.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The worker flushes on drop, so it has to live for the whole process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    tracing::info!("Logging initialized with file backend at {:?}", log_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_default_filter_traces_gallery_requests() {
        let filter: EnvFilter = DEFAULT_FILTER.parse().unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let rendered = filter.to_string();
        assert!(rendered.contains("gallery_panel::gallery=debug"));
        assert!(rendered.contains("info"));
    }
}
