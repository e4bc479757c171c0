use crate::utils::error::{PlacesError, Result};
use reqwest::header::HeaderValue;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Highest zoom level both Leaflet and Google Maps render.
pub const MAX_ZOOM: u8 = 21;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> PlacesError {
    PlacesError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Geocoder endpoints must be absolute http(s) URLs.
pub fn validate_endpoint(field_name: &str, endpoint: &str) -> Result<()> {
    if endpoint.is_empty() {
        return Err(invalid(field_name, endpoint, "Endpoint cannot be empty"));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field_name, endpoint, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            endpoint,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_input_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

/// The map page is a single file, so the path has to end in a file name.
pub fn validate_output_path(field_name: &str, path: &str) -> Result<()> {
    validate_input_path(field_name, path)?;
    if path.ends_with('/') || path.ends_with(std::path::MAIN_SEPARATOR) {
        return Err(invalid(field_name, path, "Path names a directory, not a file"));
    }
    match Path::new(path).file_name() {
        Some(_) => Ok(()),
        None => Err(invalid(field_name, path, "Path names a directory, not a file")),
    }
}

/// Parses a delimiter given as text into the single byte the CSV reader expects.
/// Accepts `\t` and `tab` for a tab character.
pub fn parse_delimiter(field_name: &str, value: &str) -> Result<u8> {
    let candidate = match value {
        "\\t" | "tab" => "\t",
        other => other,
    };

    match candidate.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(invalid(
            field_name,
            value,
            "Delimiter must be a single ASCII character other than a quote or newline",
        )),
    }
}

/// Nominatim refuses anonymous clients, and reqwest only sends header-safe values.
pub fn validate_user_agent(field_name: &str, user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(invalid(field_name, user_agent, "User agent cannot be empty"));
    }
    HeaderValue::from_str(user_agent)
        .map(|_| ())
        .map_err(|_| invalid(field_name, user_agent, "User agent is not a valid HTTP header value"))
}

pub fn validate_timeout(field_name: &str, timeout: Duration) -> Result<()> {
    let seconds = timeout.as_secs();
    if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
        return Err(invalid(
            field_name,
            seconds,
            format!("Timeout must be between 1 and {} seconds", MAX_TIMEOUT_SECONDS),
        ));
    }
    Ok(())
}

pub fn validate_zoom(field_name: &str, zoom: u8) -> Result<()> {
    if zoom > MAX_ZOOM {
        return Err(invalid(
            field_name,
            zoom,
            format!("Zoom must be between 0 and {}", MAX_ZOOM),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("geocoder.endpoint", "https://nominatim.openstreetmap.org/search").is_ok());
        assert!(validate_endpoint("geocoder.endpoint", "http://127.0.0.1:8080/search").is_ok());
        assert!(validate_endpoint("geocoder.endpoint", "").is_err());
        assert!(validate_endpoint("geocoder.endpoint", "nominatim.openstreetmap.org").is_err());
        assert!(validate_endpoint("geocoder.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("delimiter", ",").unwrap(), b',');
        assert_eq!(parse_delimiter("delimiter", ":").unwrap(), b':');
        assert_eq!(parse_delimiter("delimiter", "\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("delimiter", "tab").unwrap(), b'\t');
        assert!(parse_delimiter("delimiter", "").is_err());
        assert!(parse_delimiter("delimiter", ",,").is_err());
        assert!(parse_delimiter("delimiter", "\"").is_err());
        assert!(parse_delimiter("delimiter", "é").is_err());
    }

    #[test]
    fn test_validate_zoom() {
        assert!(validate_zoom("map.zoom", 0).is_ok());
        assert!(validate_zoom("map.zoom", MAX_ZOOM).is_ok());
        let err = validate_zoom("map.zoom", 22).unwrap_err();
        assert!(err.to_string().contains("map.zoom"));
    }

    #[test]
    fn test_validate_timeout() {
        assert!(validate_timeout("geocoder.timeout_seconds", Duration::from_secs(10)).is_ok());
        assert!(validate_timeout("geocoder.timeout_seconds", Duration::from_millis(500)).is_err());
        assert!(validate_timeout("geocoder.timeout_seconds", Duration::from_secs(301)).is_err());
    }

    #[test]
    fn test_validate_user_agent() {
        assert!(validate_user_agent("geocoder.user_agent", "placemap/0.1 (me@example.com)").is_ok());
        assert!(validate_user_agent("geocoder.user_agent", "   ").is_err());
        assert!(validate_user_agent("geocoder.user_agent", "placemap\n0.1").is_err());
    }

    #[test]
    fn test_validate_paths() {
        assert!(validate_input_path("input", "places.csv").is_ok());
        assert!(validate_input_path("input", "").is_err());
        assert!(validate_input_path("input", "places\0.csv").is_err());

        assert!(validate_output_path("output", "out/map.html").is_ok());
        assert!(validate_output_path("output", "out/").is_err());
        assert!(validate_output_path("output", "..").is_err());
    }
}
