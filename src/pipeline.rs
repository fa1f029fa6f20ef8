//! Code-generation pipeline for one kettle device.
//!
//! A single linear sequence: validate the raw block, declare the driver
//! object, then run the climate platform step. The first error aborts the
//! device's generation; there is no partial success.

use crate::errors::BuildResult;
use crate::kettle::declare_kettle;
use crate::platform::{require_str, validate_config, KettleClimatePlatform, Platform};
use crate::registry::BuildContext;
use crate::schema::CONF_ID;
use toml::value::Table;
use tracing::info;

/// Validate `raw` and generate the object graph for one kettle device
/// into `ctx`. Returns the validated configuration for inspection.
pub async fn generate(ctx: &BuildContext, raw: &Table) -> BuildResult<Table> {
    let validated = validate_config(raw)?;

    let ident = require_str(&validated, CONF_ID)?;
    declare_kettle(ctx, ident).await?;

    let platform = KettleClimatePlatform;
    platform.to_code(ctx, &validated).await?;
    info!("[codegen] device '{}' generated", ident);

    Ok(validated)
}
