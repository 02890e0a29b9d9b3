pub mod api;
pub mod app;
pub mod config;
pub mod models;
pub mod routes;
pub mod session;
mod theme;

use anyhow::anyhow;
use eframe::{self, egui};
use log::info;

pub use app::MentiiApp;
pub use config::FrontendConfig;

use api::ApiClient;
use session::{open_storage, Session};

/// Launches the Mentii client with default window options.
pub fn run_frontend(config: FrontendConfig) -> anyhow::Result<()> {
    run_frontend_with_options(config, default_native_options())
}

/// Launches the client with caller-provided window options.
pub fn run_frontend_with_options(
    config: FrontendConfig,
    options: eframe::NativeOptions,
) -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(false).try_init();
    info!(
        "connecting to {} (session data in {})",
        config.api_url,
        config.data_dir.display()
    );

    let session = Session::load(open_storage(&config.data_dir));
    let api = ApiClient::new(config.api_url, session.clone())?;

    eframe::run_native(
        "Mentii",
        options,
        Box::new(move |cc| Ok(Box::new(MentiiApp::new(cc, api, session)))),
    )
    .map_err(|err| anyhow!(err.to_string()))
}

fn default_native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Mentii")
            .with_inner_size([480.0, 820.0])
            .with_min_inner_size([360.0, 600.0]),
        ..Default::default()
    }
}
