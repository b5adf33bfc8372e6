use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting embassy status run");

        // Extract
        let state = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Loaded {} embassies, {} cyber scores, {} RSS entries",
            state.embassies.len(),
            state.scores.len(),
            state.rss.len()
        );

        // Transform
        let site = self.pipeline.transform(state).await?;
        tracing::info!(
            "🛠️ Rendered {} embassies ({} online)",
            site.embassy_count,
            site.online_count
        );

        // Load
        let output_path = self.pipeline.load(site).await?;
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(output_path)
    }
}
