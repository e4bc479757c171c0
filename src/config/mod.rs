pub mod cli;
pub mod toml_config;

use crate::core::geocoder::{GeocoderProvider, GeocoderSettings};
use crate::core::ConfigProvider;
use crate::domain::model::{MapOptions, MapStyle};
use crate::utils::error::{PlacesError, Result};
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::str::FromStr;

pub const DEFAULT_OUTPUT_FILE: &str = "map.html";

/// Create a map page with places as specified by a .csv file.
///
/// Every place name in the first column is geocoded once and shown as a marker.
///
/// Examples:
///   placemap my-visited-places.csv
///   placemap places.tsv --output visited.html --style google
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "placemap", version, about, long_about = None)]
pub struct CliConfig {
    /// Delimited file with one place name in the first field of each row.
    pub input: String,

    /// Output HTML file. Overwritten if it exists.
    #[arg(short, long)]
    pub output: Option<String>,

    /// TOML settings file.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Field delimiter (e.g. ",", ";", "tab"). Sniffed from the file when omitted.
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Skip the first row of the input.
    #[arg(long)]
    pub has_headers: bool,

    /// Geocoding service: "nominatim" or "google".
    #[arg(long, value_parser = GeocoderProvider::from_str)]
    pub provider: Option<GeocoderProvider>,

    /// Override the geocoding service URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Mapping library used by the page: "leaflet" or "google".
    #[arg(long, value_parser = MapStyle::from_str)]
    pub style: Option<MapStyle>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

/// Effective settings of a run: defaults, then the TOML file, then command line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input_path: String,
    pub output_path: String,
    pub delimiter: Option<u8>,
    pub has_headers: bool,
    pub geocoder: GeocoderSettings,
    pub map: MapOptions,
}

impl RunConfig {
    pub fn new(input_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: DEFAULT_OUTPUT_FILE.to_string(),
            delimiter: None,
            has_headers: false,
            geocoder: GeocoderSettings::default(),
            map: MapOptions::default(),
        }
    }

    pub fn apply_file(mut self, file: &TomlConfig) -> Result<Self> {
        if let Some(delimiter) = &file.input.delimiter {
            self.delimiter = Some(validation::parse_delimiter("input.delimiter", delimiter)?);
        }
        if let Some(has_headers) = file.input.has_headers {
            self.has_headers = has_headers;
        }

        let geocoder = &file.geocoder;
        if let Some(provider) = geocoder.provider {
            self.geocoder.provider = provider;
        }
        if geocoder.endpoint.is_some() {
            self.geocoder.endpoint = geocoder.endpoint.clone();
        }
        if geocoder.api_key.is_some() {
            self.geocoder.api_key = geocoder.api_key.clone();
        }
        if let Some(user_agent) = &geocoder.user_agent {
            self.geocoder.user_agent = user_agent.clone();
        }
        if let Some(seconds) = geocoder.timeout_seconds {
            self.geocoder.timeout = Duration::from_secs(seconds);
        }

        if let Some(style) = file.map.style {
            self.map.style = style;
        }
        if let Some(zoom) = file.map.zoom {
            self.map.zoom = zoom;
        }
        if file.map.api_key.is_some() {
            self.map.api_key = file.map.api_key.clone();
        }

        if let Some(path) = &file.output.path {
            self.output_path = path.clone();
        }

        Ok(self)
    }

    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let mut config = Self::new(cli.input.clone());

        if let Some(path) = &cli.config {
            tracing::debug!("Loading settings from: {}", path);
            config = config.apply_file(&TomlConfig::from_file(path)?)?;
        }

        if let Some(output) = &cli.output {
            config.output_path = output.clone();
        }
        if let Some(delimiter) = &cli.delimiter {
            config.delimiter = Some(validation::parse_delimiter("--delimiter", delimiter)?);
        }
        if cli.has_headers {
            config.has_headers = true;
        }
        if let Some(provider) = cli.provider {
            config.geocoder.provider = provider;
        }
        if cli.endpoint.is_some() {
            config.geocoder.endpoint = cli.endpoint.clone();
        }
        if let Some(style) = cli.style {
            config.map.style = style;
        }

        Ok(config.share_google_key())
    }

    /// A Google geocoding key also unlocks the Google Maps script when no map key is set.
    fn share_google_key(mut self) -> Self {
        if self.map.style == MapStyle::Google
            && self.map.api_key.is_none()
            && self.geocoder.provider == GeocoderProvider::Google
        {
            self.map.api_key = self.geocoder.api_key.clone();
        }
        self
    }
}

impl ConfigProvider for RunConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn delimiter(&self) -> Option<u8> {
        self.delimiter
    }

    fn has_headers(&self) -> bool {
        self.has_headers
    }

    fn map_options(&self) -> &MapOptions {
        &self.map
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_input_path("input", &self.input_path)?;
        validation::validate_output_path("output", &self.output_path)?;
        validation::validate_endpoint("geocoder.endpoint", self.geocoder.endpoint())?;
        validation::validate_user_agent("geocoder.user_agent", &self.geocoder.user_agent)?;
        validation::validate_timeout("geocoder.timeout_seconds", self.geocoder.timeout)?;
        validation::validate_zoom("map.zoom", self.map.zoom)?;

        if self.geocoder.provider == GeocoderProvider::Google && self.geocoder.api_key.is_none() {
            return Err(PlacesError::MissingConfigError {
                field: "geocoder.api_key".to_string(),
            });
        }

        Ok(())
    }
}
