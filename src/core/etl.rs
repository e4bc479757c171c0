use crate::config::cli::LocalStorage;
use crate::config::RunConfig;
use crate::core::pipeline::MapPipeline;
use crate::core::{Pipeline, Reporter};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load in sequence. Nothing is written unless all
    /// places were read and every geocoder call either resolved or reported "not found".
    pub async fn run(&self) -> Result<String> {
        tracing::debug!("Starting map pipeline");

        let places = self.pipeline.extract().await?;
        self.monitor.log_stats("Read places");

        let points = self.pipeline.transform(places).await?;
        self.monitor.log_stats("Geocoding");

        let output_path = self.pipeline.load(points).await?;
        self.monitor.log_stats("Write map");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}

/// Builds the default pipeline for `config` (local files, configured geocoder) and runs it.
pub async fn visualize<R: Reporter>(config: RunConfig, reporter: R, monitor: bool) -> Result<String> {
    let geocoder = config.geocoder.build()?;
    let pipeline = MapPipeline::new(LocalStorage::default(), config, geocoder, reporter);
    EtlEngine::new_with_monitoring(pipeline, monitor).run().await
}
