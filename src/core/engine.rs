use crate::core::{LoadOutcome, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

pub struct RecomposeEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> RecomposeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load in order. Any failure aborts the run
    /// before anything is emitted.
    pub async fn run(&self) -> Result<LoadOutcome> {
        let started = Instant::now();
        tracing::info!("Reading services from the cluster");

        // Extract
        let services = self.pipeline.extract().await?;
        tracing::info!("Fetched {} services", services.len());

        // Transform
        let document = self.pipeline.transform(services).await?;
        tracing::info!("Reconstructed {} services", document.services.len());

        // Load
        let outcome = self.pipeline.load(document).await?;
        if let LoadOutcome::Written { path } = &outcome {
            tracing::info!("Compose file written to {}", path);
        }

        tracing::debug!("Reconstruction took {:?}", started.elapsed());
        Ok(outcome)
    }
}
