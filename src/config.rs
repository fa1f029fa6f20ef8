//! Device-configuration loading.

use crate::errors::{ConfigError, ConfigResult};
use std::fs;
use toml::value::Table;
use toml::Value;

/// Top-level key of the kettle device block in a configuration file.
pub const CONF_COSORI_KETTLE_BLE: &str = "cosori_kettle_ble";

/// Load a device configuration file and return the raw (unvalidated)
/// kettle device block.
pub fn load_device_config(path: &str) -> ConfigResult<Table> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Load {
        path: path.to_string(),
        source: e,
    })?;
    let doc: Value = toml::from_str(&content)?;
    doc.as_table()
        .and_then(|t| t.get(CONF_COSORI_KETTLE_BLE))
        .and_then(|v| v.as_table())
        .cloned()
        .ok_or_else(|| ConfigError::MissingKey {
            path: CONF_COSORI_KETTLE_BLE.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_device_block() {
        let dir = std::env::temp_dir().join("kettle-climate-gen-test-config");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.toml");
        fs::write(&path, "[something_else]\n").unwrap();

        let err = load_device_config(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingKey { ref path } if path == CONF_COSORI_KETTLE_BLE
        ));
    }

    #[test]
    fn test_load_device_block() {
        let dir = std::env::temp_dir().join("kettle-climate-gen-test-config");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("device.toml");
        fs::write(
            &path,
            "[cosori_kettle_ble]\nid = \"kettle1\"\n\n[cosori_kettle_ble.kettle_climate]\nname = \"Kettle\"\n",
        )
        .unwrap();

        let block = load_device_config(path.to_str().unwrap()).unwrap();
        assert_eq!(block["id"].as_str(), Some("kettle1"));
        assert!(block["kettle_climate"].is_table());
    }

    #[test]
    fn test_unreadable_file() {
        let err = load_device_config("/nonexistent/device.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
    }
}
