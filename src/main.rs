mod app;
mod ui;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gallery_panel::config::Config;
use gallery_panel::credentials::ConfiguredCredentials;
use gallery_panel::gallery::{GalleryController, HttpGalleryClient};
use gallery_panel::logging;
use gallery_panel::server_status::StatusClient;

use app::App;

fn parse_args() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("gallery-panel {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config_path
}

fn print_help() {
    println!(
        r#"gallery-panel - TUI management panel for a picture gallery

USAGE:
    gallery-panel [OPTIONS]

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    GALLERY_PANEL_CONFIG   Path to config file (overrides default location)
    GALLERY_PANEL_TOKEN    Login token (checked before the cookie jar)
    GALLERY_PANEL_LOG      Log filter (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/gallery-panel/config.toml"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = parse_args();

    // Initialize logging (uses journald on Linux, file fallback otherwise)
    let _ = logging::init(Some(Config::config_dir().join("logs")));

    let config = match config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    tracing::info!(gallery = %config.gallery_url(), "starting gallery panel");

    let credentials = Arc::new(ConfiguredCredentials::from_config(&config.credentials));
    let client = HttpGalleryClient::from_config(&config, credentials);
    let controller = GalleryController::new(Arc::new(client), config.gallery.clone());

    let status_rx = config.status.enabled.then(|| {
        StatusClient::new(&config.status, Duration::from_secs(config.api.timeout_secs)).spawn_fetch()
    });

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, controller);
    if let Some(rx) = status_rx {
        app.watch_server_status(rx);
    }
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
