use anyhow::Context;
use campaign_predictor::config::Config;
use campaign_predictor::loader::load_classifier;
use campaign_predictor::ui::{self, PredictorApp};
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env().context("Failed to load config")?;
    info!(model = %config.model_path.display(), "Starting campaign predictor");

    // Without a model there is nothing to show, so fail before opening a window.
    let classifier = load_classifier(&config.model_path).with_context(|| {
        format!("Failed to load classifier from {}", config.model_path.display())
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Marketing Campaign Success Predictor",
        options,
        Box::new(move |cc| {
            ui::set_custom_style(&cc.egui_ctx);
            Ok(Box::new(PredictorApp::new(Box::new(classifier))))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
