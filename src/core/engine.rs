use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting requirement report");

        // Extract
        let input = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Loaded {} countries, {} requirements, {} vaccinations",
            input.reference.countries.len(),
            input.reference.requirements.len(),
            input.vaccinations.len()
        );

        // Transform
        let report = self.pipeline.transform(input).await?;
        tracing::info!(
            "🧮 Evaluated {} countries ({} requirement checks)",
            report.status.len(),
            report.checks.len()
        );

        // Load
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("💾 Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(output_path)
    }
}
