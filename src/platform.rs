//! Climate platform for the Cosori BLE kettle.
//!
//! Declares the `kettle_climate` configuration block and, during code
//! generation, registers the already-declared kettle controller as the
//! device's climate entity. The controller plays both roles; no new
//! object is constructed here.

use crate::climate::{climate_schema, register_climate, ClimateEntity, ClimateOptions};
use crate::config::CONF_COSORI_KETTLE_BLE;
use crate::errors::{BuildResult, ConfigError, ConfigResult};
use crate::kettle::{component_schema, CosoriKettleBle, KETTLE_OBJECT_TYPE};
use crate::registry::BuildContext;
use crate::schema::{join_path, Requirement, Schema, Validator, CONF_ID};
use async_trait::async_trait;
use std::sync::Arc;
use toml::value::Table;
use tracing::debug;

pub const CONF_KETTLE_CLIMATE: &str = "kettle_climate";

/// Full schema for the kettle device block: the controller identifier
/// plus the optional climate sub-block. The sub-block accepts every
/// generic climate option and an identifier typed as the kettle
/// controller, generated when absent.
pub fn platform_schema() -> Schema {
    let climate_block = climate_schema().extend(&Schema::new().entry(
        CONF_ID,
        Requirement::Optional,
        Validator::GeneratedId {
            object_type: KETTLE_OBJECT_TYPE,
        },
    ));
    component_schema().extend(&Schema::new().entry(
        CONF_KETTLE_CLIMATE,
        Requirement::Optional,
        Validator::Block(climate_block),
    ))
}

/// Validate a raw device block. All user-facing configuration errors
/// surface here, before any code generation runs.
pub fn validate_config(raw: &Table) -> ConfigResult<Table> {
    let validated = platform_schema().validate(raw, CONF_COSORI_KETTLE_BLE)?;
    if let Some(block) = validated.get(CONF_KETTLE_CLIMATE) {
        // Schema validation guarantees the block is a table; run the
        // cross-field checks now so codegen never sees a bad block.
        if let Some(table) = block.as_table() {
            ClimateOptions::from_validated(
                table,
                &join_path(CONF_COSORI_KETTLE_BLE, CONF_KETTLE_CLIMATE),
            )?;
        }
    }
    Ok(validated)
}

/// One code-generation step of the build. Implementations receive the
/// validated configuration for their device and wire objects into the
/// build context.
#[async_trait]
pub trait Platform: Send + Sync {
    fn name(&self) -> &'static str;
    async fn to_code(&self, ctx: &BuildContext, config: &Table) -> BuildResult<()>;
}

pub struct KettleClimatePlatform;

#[async_trait]
impl Platform for KettleClimatePlatform {
    fn name(&self) -> &'static str {
        CONF_KETTLE_CLIMATE
    }

    async fn to_code(&self, ctx: &BuildContext, config: &Table) -> BuildResult<()> {
        let ident = require_str(config, CONF_ID)?;
        let parent: Arc<CosoriKettleBle> = ctx.get_variable(ident).await?;

        let block = match config.get(CONF_KETTLE_CLIMATE).and_then(|v| v.as_table()) {
            Some(block) => block,
            None => {
                debug!("[{}] no climate block for '{}', skipping", self.name(), ident);
                return Ok(());
            }
        };
        let options = ClimateOptions::from_validated(
            block,
            &join_path(CONF_COSORI_KETTLE_BLE, CONF_KETTLE_CLIMATE),
        )?;

        // The parent IS the climate entity; register the same handle.
        let entity: Arc<dyn ClimateEntity> = parent;
        register_climate(ctx, entity, options).await
    }
}

pub(crate) fn require_str<'a>(table: &'a Table, key: &str) -> BuildResult<&'a str> {
    table
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            ConfigError::MissingKey {
                path: join_path(CONF_COSORI_KETTLE_BLE, key),
            }
            .into()
        })
}
