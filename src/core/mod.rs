pub mod etl;
pub mod geocoder;
pub mod map;
pub mod pipeline;
pub mod reader;

pub use crate::domain::model::{Coordinate, MapOptions, MapStyle, PlaceName, ProgressEvent};
pub use crate::domain::ports::{ConfigProvider, Geocoder, Pipeline, Reporter, Storage};
pub use crate::utils::error::Result;
