//! Build-time object registry.
//!
//! A [`BuildContext`] is created per build invocation and passed through
//! the code-generation pipeline; it is never a process global. It owns the
//! identifier map (identifier -> declared build object) and the climate
//! registrations produced while generating one device.

use crate::climate::{ClimateEntity, ClimateOptions};
use crate::errors::{BuildError, BuildResult};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

struct BuildObject {
    type_name: &'static str,
    object: Arc<dyn Any + Send + Sync>,
}

/// One completed climate registration.
pub struct ClimateRegistration {
    pub entity: Arc<dyn ClimateEntity>,
    pub options: ClimateOptions,
}

#[derive(Default)]
pub struct BuildContext {
    variables: RwLock<HashMap<String, BuildObject>>,
    climates: RwLock<HashMap<String, Arc<ClimateRegistration>>>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a build object under `ident`. Each identifier may be
    /// declared exactly once per build.
    pub async fn declare_variable<T>(&self, ident: &str, object: Arc<T>) -> BuildResult<()>
    where
        T: Any + Send + Sync,
    {
        let mut variables = self.variables.write().await;
        if variables.contains_key(ident) {
            return Err(BuildError::RegistrationConflict {
                ident: ident.to_string(),
            });
        }
        debug!("[registry] declared '{}'", ident);
        variables.insert(
            ident.to_string(),
            BuildObject {
                type_name: std::any::type_name::<T>(),
                object,
            },
        );
        Ok(())
    }

    /// Resolve a previously-declared identifier to its build object.
    ///
    /// Identifiers reaching this point have already passed validation, so
    /// a miss or a type mismatch indicates a pipeline bug rather than user
    /// error; both surface as build-invariant errors.
    pub async fn get_variable<T>(&self, ident: &str) -> BuildResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let variables = self.variables.read().await;
        let slot = variables
            .get(ident)
            .ok_or_else(|| BuildError::UnresolvedId {
                ident: ident.to_string(),
            })?;
        slot.object
            .clone()
            .downcast::<T>()
            .map_err(|_| BuildError::TypeMismatch {
                ident: ident.to_string(),
                expected: std::any::type_name::<T>(),
                found: slot.type_name,
            })
    }

    /// Record a climate registration, keyed by the entity's identifier.
    /// A second registration under the same identifier is a conflict.
    pub(crate) async fn insert_climate(
        &self,
        entity: Arc<dyn ClimateEntity>,
        options: ClimateOptions,
    ) -> BuildResult<()> {
        let ident = entity.entity_id().to_string();
        let mut climates = self.climates.write().await;
        if climates.contains_key(&ident) {
            return Err(BuildError::RegistrationConflict { ident });
        }
        climates.insert(ident, Arc::new(ClimateRegistration { entity, options }));
        Ok(())
    }

    pub async fn climate_registration(&self, ident: &str) -> Option<Arc<ClimateRegistration>> {
        self.climates.read().await.get(ident).cloned()
    }

    pub async fn climate_count(&self) -> usize {
        self.climates.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Widget {
        label: String,
    }

    #[tokio::test]
    async fn test_declare_and_resolve() {
        let ctx = BuildContext::new();
        let widget = Arc::new(Widget {
            label: "w".to_string(),
        });
        ctx.declare_variable("widget1", widget.clone()).await.unwrap();

        let resolved: Arc<Widget> = ctx.get_variable("widget1").await.unwrap();
        assert!(Arc::ptr_eq(&resolved, &widget));
        assert_eq!(resolved.label, "w");
    }

    #[tokio::test]
    async fn test_unresolved_identifier_is_an_invariant_error() {
        let ctx = BuildContext::new();
        let err = ctx.get_variable::<Widget>("ghost").await.unwrap_err();
        assert!(matches!(err, BuildError::UnresolvedId { ref ident } if ident == "ghost"));
    }

    #[tokio::test]
    async fn test_type_mismatch_is_an_invariant_error() {
        let ctx = BuildContext::new();
        ctx.declare_variable("num", Arc::new(7u32)).await.unwrap();
        let err = ctx.get_variable::<Widget>("num").await.unwrap_err();
        assert!(matches!(err, BuildError::TypeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_declaration_conflicts() {
        let ctx = BuildContext::new();
        ctx.declare_variable("dup", Arc::new(1u32)).await.unwrap();
        let err = ctx
            .declare_variable("dup", Arc::new(2u32))
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::RegistrationConflict { ref ident } if ident == "dup"));
    }
}
