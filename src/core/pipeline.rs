use crate::core::geocoder::resolve;
use crate::core::map::MapDocument;
use crate::core::reader::{unique_sorted, PlaceReader};
use crate::core::{
    ConfigProvider, Coordinate, Geocoder, Pipeline, PlaceName, ProgressEvent, Reporter, Storage,
};
use crate::utils::error::{PlacesError, Result};

/// Reads places from a file, geocodes them one at a time and writes the map page.
pub struct MapPipeline<S: Storage, C: ConfigProvider, G: Geocoder, R: Reporter> {
    storage: S,
    config: C,
    geocoder: G,
    reporter: R,
}

impl<S: Storage, C: ConfigProvider, G: Geocoder, R: Reporter> MapPipeline<S, C, G, R> {
    pub fn new(storage: S, config: C, geocoder: G, reporter: R) -> Self {
        Self {
            storage,
            config,
            geocoder,
            reporter,
        }
    }
}

#[async_trait::async_trait]
impl<S, C, G, R> Pipeline for MapPipeline<S, C, G, R>
where
    S: Storage,
    C: ConfigProvider,
    G: Geocoder,
    R: Reporter,
{
    async fn extract(&self) -> Result<Vec<PlaceName>> {
        let path = self.config.input_path();
        self.reporter.report(ProgressEvent::Reading {
            path: path.to_string(),
        });

        let data = self.storage.read_file(path).await.map_err(|e| match e {
            PlacesError::IoError(source) => PlacesError::InputReadError {
                path: path.to_string(),
                source,
            },
            other => other,
        })?;
        tracing::debug!("Read {} bytes from {}", data.len(), path);

        let reader = PlaceReader::from_bytes(
            path,
            data,
            self.config.delimiter(),
            self.config.has_headers(),
        )?;
        let places = unique_sorted(reader.places().collect::<Result<Vec<_>>>()?);

        self.reporter.report(ProgressEvent::ReadPlaces {
            count: places.len(),
        });
        Ok(places)
    }

    async fn transform(&self, places: Vec<PlaceName>) -> Result<Vec<Coordinate>> {
        self.reporter.report(ProgressEvent::Querying {
            count: places.len(),
        });

        let mut points = Vec::with_capacity(places.len());
        for place in &places {
            if let Some(point) = resolve(&self.geocoder, &self.reporter, place).await? {
                points.push(point);
            }
        }

        tracing::debug!("Resolved {} of {} places", points.len(), places.len());
        Ok(points)
    }

    async fn load(&self, points: Vec<Coordinate>) -> Result<String> {
        self.reporter.report(ProgressEvent::Assembling {
            points: points.len(),
        });

        let mut document = MapDocument::new(self.config.map_options().clone());
        for point in points {
            document.add_point(point);
        }
        let html = document.render();

        let output_path = self.config.output_path();
        self.reporter.report(ProgressEvent::Writing {
            path: output_path.to_string(),
        });
        self.storage.write_file(output_path, html.as_bytes()).await?;

        self.reporter.report(ProgressEvent::Written {
            path: output_path.to_string(),
        });
        Ok(output_path.to_string())
    }
}
