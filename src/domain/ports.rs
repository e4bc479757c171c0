use crate::domain::model::{Coordinate, MapOptions, PlaceName, ProgressEvent};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    /// `None` means the delimiter is sniffed from the file content.
    fn delimiter(&self) -> Option<u8>;
    fn has_headers(&self) -> bool;
    fn map_options(&self) -> &MapOptions;
}

/// External geocoding service.
///
/// Implementations return [`PlacesError::PlaceNotFound`](crate::utils::error::PlacesError::PlaceNotFound)
/// when the service answers but cannot resolve the place. Every other error is fatal to the run.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<Coordinate>;
}

/// Sink for pipeline progress.
pub trait Reporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<PlaceName>>;
    async fn transform(&self, places: Vec<PlaceName>) -> Result<Vec<Coordinate>>;
    async fn load(&self, points: Vec<Coordinate>) -> Result<String>;
}
