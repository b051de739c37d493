mod cli;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use shader_slider::SliderOptions;

fn main() -> Result<()> {
    let args = cli::parse();
    initialise_tracing();

    let file_options = match &args.config {
        Some(path) => SliderOptions::from_toml_file(path)
            .with_context(|| format!("failed to load slider config {}", path.display()))?,
        None => SliderOptions::default(),
    };
    let options = file_options.merge(args.slider_options());

    tracing::info!(
        slides = options.images.len(),
        autoplay = options.autoplay.unwrap_or(false),
        "starting slider"
    );
    shader_slider::run(options, args.app_config()).context("slider exited with an error")
}

fn initialise_tracing() {
    let default_filter = "info,naga=warn,wgpu=warn,wgpu_core=warn,wgpu_hal=warn,winit=warn";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
