use serde::{Deserialize, Serialize};
use std::fmt;

/// A place name as read from the first field of an input row.
pub type PlaceName = String;

/// WGS84 latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Browser-side mapping library the rendered page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    #[default]
    Leaflet,
    Google,
}

impl std::str::FromStr for MapStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "leaflet" | "osm" => Ok(Self::Leaflet),
            "google" | "googlemaps" => Ok(Self::Google),
            _ => Err(format!("Unknown map style '{}'. Use 'leaflet' or 'google'.", s)),
        }
    }
}

pub const DEFAULT_ZOOM: u8 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub style: MapStyle,
    pub zoom: u8,
    /// Appended to the Google Maps script URL when set.
    pub api_key: Option<String>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            style: MapStyle::default(),
            zoom: DEFAULT_ZOOM,
            api_key: None,
        }
    }
}

/// Progress of a single pipeline run, delivered to a [`Reporter`](super::ports::Reporter).
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Reading { path: String },
    ReadPlaces { count: usize },
    Querying { count: usize },
    Resolved { place: PlaceName },
    Unresolved { place: PlaceName },
    Assembling { points: usize },
    Writing { path: String },
    Written { path: String },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reading { path } => write!(f, "Reading: {}", path),
            Self::ReadPlaces { count } => write!(f, "Read {} unique places.", count),
            Self::Querying { count } => write!(f, "Querying coordinates for {} places.", count),
            Self::Resolved { place } => write!(f, "Found coordinates for: {}", place),
            Self::Unresolved { place } => write!(f, "Could not get coordinates for: {}", place),
            Self::Assembling { points } => write!(f, "Assembling map with {} points.", points),
            Self::Writing { path } => write!(f, "Writing results to: {}", path),
            Self::Written { path } => write!(
                f,
                "Map written to: {}. Open it in a web browser to see the map.",
                path
            ),
        }
    }
}
