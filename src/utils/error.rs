use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Geocoding request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    InputReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not detect the delimiter of {source_name}: {reason}")]
    DelimiterDetectionError { source_name: String, reason: String },

    #[error("Could not get coordinates for: {place}")]
    PlaceNotFound { place: String },

    #[error("Geocoder returned status {status} for '{place}'")]
    GeocoderStatusError {
        place: String,
        status: String,
        message: Option<String>,
    },

    #[error("Invalid geocoder response for '{place}': {message}")]
    InvalidResponseError { place: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, PlacesError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Provider,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PlacesError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CsvError(_)
            | Self::InputReadError { .. }
            | Self::DelimiterDetectionError { .. } => ErrorCategory::Input,
            Self::IoError(_) => ErrorCategory::Output,
            Self::ApiError(_) => ErrorCategory::Network,
            Self::SerializationError(_)
            | Self::PlaceNotFound { .. }
            | Self::GeocoderStatusError { .. }
            | Self::InvalidResponseError { .. } => ErrorCategory::Provider,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Provider => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// Process exit status for a run that ended with this error.
    ///
    /// Status 2 is left to clap for usage errors.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
            ErrorSeverity::Medium => 4,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::IoError(_) => "Check that the output location is writable".to_string(),
            Self::InputReadError { .. } => "Check that the input file exists and is readable".to_string(),
            Self::CsvError(_) => "Make sure the input is valid UTF-8 delimited text".to_string(),
            Self::DelimiterDetectionError { .. } => {
                "Pass the delimiter explicitly with --delimiter".to_string()
            }
            Self::ApiError(_) => {
                "Check the network connection and the geocoder endpoint".to_string()
            }
            Self::GeocoderStatusError { status, .. } => match status.as_str() {
                "REQUEST_DENIED" => "Check the geocoder API key".to_string(),
                "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => {
                    "The geocoder quota is exhausted, try again later".to_string()
                }
                _ => "Inspect the geocoder response status".to_string(),
            },
            Self::SerializationError(_) | Self::InvalidResponseError { .. } => {
                "The geocoder endpoint did not return the expected format".to_string()
            }
            Self::PlaceNotFound { .. } => "Check the spelling of the place name".to_string(),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Failed to read places: {}", self),
            ErrorCategory::Network => format!("Could not reach the geocoder: {}", self),
            ErrorCategory::Provider => format!("Geocoding failed: {}", self),
            ErrorCategory::Output => format!("File error: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PlaceNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_the_only_recoverable_variant() {
        let not_found = PlacesError::PlaceNotFound {
            place: "Atlantis".to_string(),
        };
        assert!(not_found.is_not_found());

        let status = PlacesError::GeocoderStatusError {
            place: "Paris".to_string(),
            status: "REQUEST_DENIED".to_string(),
            message: None,
        };
        assert!(!status.is_not_found());
        assert_eq!(status.exit_code(), 4);
    }

    #[test]
    fn test_exit_codes_by_category() {
        let input = PlacesError::DelimiterDetectionError {
            source_name: "places.csv".to_string(),
            reason: "inconsistent".to_string(),
        };
        assert_eq!(input.category(), ErrorCategory::Input);
        assert_eq!(input.exit_code(), 1);

        let io = PlacesError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert_eq!(io.exit_code(), 3);
    }

    #[test]
    fn test_failed_runs_never_exit_with_usage_status() {
        let bad_body = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let errors = [
            PlacesError::SerializationError(bad_body),
            PlacesError::InvalidResponseError {
                place: "Paris".to_string(),
                message: "lat is not a finite number: 'inf'".to_string(),
            },
            PlacesError::MissingConfigError {
                field: "geocoder.api_key".to_string(),
            },
        ];
        for err in errors {
            assert_ne!(err.exit_code(), 0);
            assert_ne!(err.exit_code(), 2, "{:?}", err);
        }
    }

    #[test]
    fn test_messages_name_the_place() {
        let err = PlacesError::PlaceNotFound {
            place: "Atlantis".to_string(),
        };
        assert_eq!(err.to_string(), "Could not get coordinates for: Atlantis");
        assert!(err.user_friendly_message().contains("Atlantis"));
    }
}
