// Public modules
pub mod climate;
pub mod config;
pub mod errors;
pub mod kettle;
pub mod pipeline;
pub mod platform;
pub mod registry;
pub mod schema;

// Re-export commonly used types
pub use climate::{register_climate, ClimateEntity, ClimateMode, ClimateOptions};
pub use config::load_device_config;
pub use errors::{BuildError, BuildResult, ConfigError, ConfigResult};
pub use kettle::CosoriKettleBle;
pub use pipeline::generate;
pub use platform::{platform_schema, validate_config, KettleClimatePlatform, Platform};
pub use registry::BuildContext;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize tracing with default configuration
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}

/// Run code generation for the device configuration at `config_path`.
pub async fn run_codegen(config_path: &str) -> Result<BuildContext, Box<dyn std::error::Error>> {
    let raw = load_device_config(config_path)?;
    info!("[config] loaded device block from {}", config_path);

    let ctx = BuildContext::new();
    let validated = generate(&ctx, &raw).await?;

    let ident = validated
        .get(schema::CONF_ID)
        .and_then(|v| v.as_str())
        .unwrap_or("?");
    info!(
        "[codegen] done: {} climate registration(s) for '{}'",
        ctx.climate_count().await,
        ident
    );
    if let Some(registration) = ctx.climate_registration(ident).await {
        info!("[codegen] climate options:\n{}", registration.options.to_json()?);
    }
    Ok(ctx)
}
