pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, RunConfig};
pub use core::{
    etl::{visualize, EtlEngine},
    map::MapDocument,
    pipeline::MapPipeline,
};
pub use domain::model::{Coordinate, MapOptions, MapStyle, PlaceName, ProgressEvent};
pub use utils::error::{PlacesError, Result};
pub use utils::logger::{CollectingReporter, TracingReporter};
