use crate::errors::ConfigResult;
use serde::Deserialize;

/// Root structure for loading `[[bus]]` style TOML config
#[derive(Debug, Deserialize)]
pub struct BusConfig {
    #[serde(rename = "bus")]
    pub buses: Vec<BusEntry>,
}

/// One bus entry, e.g. `/dev/i2c-1`
#[derive(Debug, Clone, Deserialize)]
pub struct BusEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub r#type: String, // 'type' is a reserved word in Rust, use raw identifier
    pub path: String,
}

impl BusConfig {
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Load bus config file
pub fn load_bus_config(path: &str) -> ConfigResult<BusConfig> {
    let content = super::read_config_file(path)?;
    BusConfig::from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bus_config() {
        let config = BusConfig::from_toml_str(
            r#"
            [[bus]]
            id = "i2c1"
            type = "i2c"
            path = "/dev/i2c-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.buses.len(), 1);
        assert_eq!(config.buses[0].id, "i2c1");
        assert_eq!(config.buses[0].r#type, "i2c");
        assert_eq!(config.buses[0].path, "/dev/i2c-1");
    }

    #[test]
    fn test_bus_entry_requires_path() {
        let result = BusConfig::from_toml_str(
            r#"
            [[bus]]
            id = "i2c1"
            type = "i2c"
            "#,
        );
        assert!(result.is_err());
    }
}
