//! Build-time representation of the Cosori BLE kettle controller.
//!
//! One [`CosoriKettleBle`] stands for one physical kettle peripheral. The
//! driver object is declared once into the build context and later reused
//! in a second role: the same object is what gets registered as the
//! device's climate entity.

use crate::climate::{ClimateEntity, ClimateMode};
use crate::errors::BuildResult;
use crate::registry::BuildContext;
use crate::schema::{Requirement, Schema, Validator, CONF_ID};
use std::sync::Arc;
use std::sync::RwLock;
use tracing::info;

/// Build-time type tag for kettle-controller identifiers.
pub const KETTLE_OBJECT_TYPE: &str = "cosori_kettle_ble";

#[derive(Debug)]
struct KettleState {
    mode: ClimateMode,
    target_temperature: f64,
    current_temperature: Option<f64>,
}

#[derive(Debug)]
pub struct CosoriKettleBle {
    ident: String,
    state: RwLock<KettleState>,
}

impl CosoriKettleBle {
    pub fn new(ident: &str) -> Self {
        Self {
            ident: ident.to_string(),
            state: RwLock::new(KettleState {
                mode: ClimateMode::Off,
                target_temperature: 100.0,
                current_temperature: None,
            }),
        }
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }
}

// The controller is the climate entity; no wrapper object exists.
impl ClimateEntity for CosoriKettleBle {
    fn entity_id(&self) -> &str {
        &self.ident
    }

    fn mode(&self) -> ClimateMode {
        self.state.read().expect("kettle state lock poisoned").mode
    }

    fn set_mode(&self, mode: ClimateMode) {
        self.state.write().expect("kettle state lock poisoned").mode = mode;
    }

    fn target_temperature(&self) -> f64 {
        self.state
            .read()
            .expect("kettle state lock poisoned")
            .target_temperature
    }

    fn set_target_temperature(&self, celsius: f64) {
        self.state
            .write()
            .expect("kettle state lock poisoned")
            .target_temperature = celsius;
    }

    fn current_temperature(&self) -> Option<f64> {
        self.state
            .read()
            .expect("kettle state lock poisoned")
            .current_temperature
    }
}

/// Base schema shared by every configuration block attached to a kettle
/// controller: the controller identifier itself.
pub fn component_schema() -> Schema {
    Schema::new().entry(
        CONF_ID,
        Requirement::Required,
        Validator::Ident {
            object_type: KETTLE_OBJECT_TYPE,
        },
    )
}

/// Construct the driver object for a validated configuration and declare
/// it in the build context under its identifier.
pub async fn declare_kettle(
    ctx: &BuildContext,
    ident: &str,
) -> BuildResult<Arc<CosoriKettleBle>> {
    let kettle = Arc::new(CosoriKettleBle::new(ident));
    ctx.declare_variable(ident, kettle.clone()).await?;
    info!("[kettle] declared controller '{}'", ident);
    Ok(kettle)
}
