use crate::core::geocoder::GeocoderProvider;
use crate::domain::model::MapStyle;
use crate::utils::error::{PlacesError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every section and key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub geocoder: GeocoderConfig,
    pub map: MapConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub delimiter: Option<String>,
    pub has_headers: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub provider: Option<GeocoderProvider>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub style: Option<MapStyle>,
    pub zoom: Option<u8>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| PlacesError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlacesError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlacesError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[input]
delimiter = ";"
has_headers = true

[geocoder]
provider = "google"
endpoint = "https://geo.example.com/json"
api_key = "secret"
timeout_seconds = 3

[map]
style = "google"
zoom = 5

[output]
path = "visited.html"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.input.delimiter.as_deref(), Some(";"));
        assert_eq!(config.input.has_headers, Some(true));
        assert_eq!(config.geocoder.provider, Some(GeocoderProvider::Google));
        assert_eq!(config.geocoder.timeout_seconds, Some(3));
        assert_eq!(config.map.style, Some(MapStyle::Google));
        assert_eq!(config.map.zoom, Some(5));
        assert_eq!(config.output.path.as_deref(), Some("visited.html"));
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PLACEMAP_TEST_GEOCODER_KEY", "from-env");

        let toml_content = r#"
[geocoder]
api_key = "${PLACEMAP_TEST_GEOCODER_KEY}"
user_agent = "${PLACEMAP_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.geocoder.api_key.as_deref(), Some("from-env"));
        assert_eq!(
            config.geocoder.user_agent.as_deref(),
            Some("${PLACEMAP_TEST_UNSET_VARIABLE}")
        );

        std::env::remove_var("PLACEMAP_TEST_GEOCODER_KEY");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let err = TomlConfig::from_toml_str("[geocoder]\nprovider = \"bing\"\n").unwrap_err();
        assert!(matches!(err, PlacesError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[map]\nstyle = \"leaflet\"\nzoom = 3\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.map.style, Some(MapStyle::Leaflet));
        assert_eq!(config.map.zoom, Some(3));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = TomlConfig::from_file("/nonexistent/placemap.toml").unwrap_err();
        assert!(matches!(err, PlacesError::ConfigError { .. }));
    }
}
