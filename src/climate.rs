//! Generic climate-entity support: the shared configuration schema, the
//! validated options, the narrow capability trait, and the registration
//! procedure that wires an entity into the build.

use crate::errors::{BuildResult, ConfigError, ConfigResult};
use crate::registry::BuildContext;
use crate::schema::{join_path, Requirement, Schema, Validator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toml::value::Table;
use toml::Value;
use tracing::info;

pub const CONF_NAME: &str = "name";
pub const CONF_ICON: &str = "icon";
pub const CONF_INTERNAL: &str = "internal";
pub const CONF_MIN_TEMPERATURE: &str = "min_temperature";
pub const CONF_MAX_TEMPERATURE: &str = "max_temperature";
pub const CONF_TEMPERATURE_STEP: &str = "temperature_step";
pub const CONF_MODE: &str = "mode";

/// Options accepted by every climate entity, regardless of the platform
/// providing it.
pub fn climate_schema() -> Schema {
    Schema::new()
        .entry(CONF_NAME, Requirement::Optional, Validator::Str)
        .entry(CONF_ICON, Requirement::Optional, Validator::Icon)
        .entry(
            CONF_INTERNAL,
            Requirement::Default(Value::Boolean(false)),
            Validator::Bool,
        )
        .entry(
            CONF_MIN_TEMPERATURE,
            Requirement::Default(Value::Float(40.0)),
            Validator::FloatRange { min: 0.0, max: 100.0 },
        )
        .entry(
            CONF_MAX_TEMPERATURE,
            Requirement::Default(Value::Float(100.0)),
            Validator::FloatRange { min: 0.0, max: 100.0 },
        )
        .entry(
            CONF_TEMPERATURE_STEP,
            Requirement::Default(Value::Float(1.0)),
            Validator::FloatRange { min: 0.1, max: 25.0 },
        )
        .entry(
            CONF_MODE,
            Requirement::Default(Value::String("heat".to_string())),
            Validator::OneOf(&["off", "heat"]),
        )
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClimateMode {
    Off,
    Heat,
}

/// A validated climate configuration block.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClimateOptions {
    pub id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub internal: bool,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub temperature_step: f64,
    pub mode: ClimateMode,
}

impl ClimateOptions {
    /// Build typed options from a table that already passed schema
    /// validation, then apply the cross-field checks a per-key validator
    /// cannot express.
    pub fn from_validated(table: &Table, path: &str) -> ConfigResult<Self> {
        let options: ClimateOptions = Value::Table(table.clone()).try_into()?;
        if options.min_temperature >= options.max_temperature {
            return Err(ConfigError::InvalidValue {
                path: join_path(path, CONF_MIN_TEMPERATURE),
                reason: format!(
                    "{} must be below max_temperature ({})",
                    options.min_temperature, options.max_temperature
                ),
            });
        }
        Ok(options)
    }

    /// Serialize to JSON for debugging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The capability surface a climate entity exposes to the rest of the
/// firmware: set-point, mode, and status reporting.
pub trait ClimateEntity: Send + Sync {
    fn entity_id(&self) -> &str;
    fn mode(&self) -> ClimateMode;
    fn set_mode(&self, mode: ClimateMode);
    fn target_temperature(&self) -> f64;
    fn set_target_temperature(&self, celsius: f64);
    fn current_temperature(&self) -> Option<f64>;
}

/// Register `entity` as a climate entity for the current build. The
/// entity is an already-constructed object owned elsewhere; registration
/// only records the association. Conflicts propagate unchanged.
pub async fn register_climate(
    ctx: &BuildContext,
    entity: Arc<dyn ClimateEntity>,
    options: ClimateOptions,
) -> BuildResult<()> {
    info!("[climate] registering climate entity '{}'", entity.entity_id());
    ctx.insert_climate(entity, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::toml;

    fn validated(raw: Table) -> Table {
        let schema = climate_schema().extend(&Schema::new().entry(
            crate::schema::CONF_ID,
            Requirement::Optional,
            Validator::GeneratedId {
                object_type: "climate_entity",
            },
        ));
        schema.validate(&raw, "kettle_climate").unwrap()
    }

    #[test]
    fn test_options_from_empty_block_are_all_defaults() {
        let table = validated(Table::new());
        let options = ClimateOptions::from_validated(&table, "kettle_climate").unwrap();
        assert_eq!(options.id, "kettle_climate");
        assert_eq!(options.name, None);
        assert!(!options.internal);
        assert_eq!(options.min_temperature, 40.0);
        assert_eq!(options.max_temperature, 100.0);
        assert_eq!(options.temperature_step, 1.0);
        assert_eq!(options.mode, ClimateMode::Heat);
    }

    #[test]
    fn test_options_pick_up_user_values() {
        let table = validated(toml! {
            name = "Morning Kettle"
            icon = "mdi:kettle"
            min_temperature = 60
            mode = "off"
        });
        let options = ClimateOptions::from_validated(&table, "kettle_climate").unwrap();
        assert_eq!(options.name.as_deref(), Some("Morning Kettle"));
        assert_eq!(options.icon.as_deref(), Some("mdi:kettle"));
        assert_eq!(options.min_temperature, 60.0);
        assert_eq!(options.mode, ClimateMode::Off);
    }

    #[test]
    fn test_inverted_temperature_bounds_rejected() {
        let table = validated(toml! {
            min_temperature = 90.0
            max_temperature = 50.0
        });
        let err = ClimateOptions::from_validated(&table, "kettle_climate").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref path, .. } if path == "kettle_climate.min_temperature"
        ));
    }

    #[tokio::test]
    async fn test_duplicate_entity_registration_conflicts() {
        use crate::kettle::CosoriKettleBle;

        let ctx = BuildContext::new();
        let kettle: Arc<dyn ClimateEntity> = Arc::new(CosoriKettleBle::new("kettle1"));
        let table = validated(Table::new());
        let options = ClimateOptions::from_validated(&table, "kettle_climate").unwrap();

        register_climate(&ctx, kettle.clone(), options.clone())
            .await
            .unwrap();
        let err = register_climate(&ctx, kettle, options).await.unwrap_err();
        assert!(matches!(
            err,
            crate::errors::BuildError::RegistrationConflict { ref ident } if ident == "kettle1"
        ));
    }

    #[test]
    fn test_options_json_dump() {
        let table = validated(Table::new());
        let options = ClimateOptions::from_validated(&table, "kettle_climate").unwrap();
        let json = options.to_json().unwrap();
        assert!(json.contains("\"mode\": \"heat\""));
    }
}
