use kettle_climate_gen::run_codegen;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // RUST_LOG=debug for verbose, RUST_LOG=info for normal
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("[kettle-climate-gen] starting code generation...");

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());
    let device_config_path = format!("{}/device.toml", config_path);

    match run_codegen(&device_config_path).await {
        Ok(_ctx) => info!("[kettle-climate-gen] code generation complete"),
        Err(e) => {
            error!("[kettle-climate-gen] {}", e);
            std::process::exit(1);
        }
    }
}
