use crate::config::TomlConfig;
use crate::core::aggregator::Aggregator;
use crate::core::fetcher::ResilientFetcher;
use crate::domain::model::RenderedSite;
use crate::domain::ports::{Pipeline, Storage, Transport};
use crate::domain::state::ViewState;
use crate::render::Renderer;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::Utc;

/// Directory + scores + RSS in, `index.html` and `embassies.json` out.
pub struct EmbassyPipeline<S: Storage, T: Transport> {
    storage: S,
    aggregator: Aggregator<T>,
    renderer: Renderer,
    output_path: String,
    html_file: String,
    json_file: String,
}

impl<S: Storage, T: Transport> EmbassyPipeline<S, T> {
    pub fn new(storage: S, config: &TomlConfig, transport: T) -> Result<Self> {
        config.validate()?;

        let fetcher = ResilientFetcher::new(transport, config.fetch.retry_policy());
        let aggregator = Aggregator::new(
            fetcher,
            config.resolve_sources()?,
            config.fetch.concurrent_probes,
        );

        Ok(Self {
            storage,
            aggregator,
            renderer: Renderer::new(config.country_resolver(), config.map.clone()),
            output_path: config.output.path.clone(),
            html_file: config.output.html_file.clone(),
            json_file: config.output.json_file.clone(),
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, T: Transport> Pipeline for EmbassyPipeline<S, T> {
    async fn extract(&self) -> Result<ViewState> {
        Ok(self.aggregator.load().await)
    }

    async fn transform(&self, state: ViewState) -> Result<RenderedSite> {
        let html = self.renderer.render(&state, Utc::now())?.into_string();
        let records_json = serde_json::to_string_pretty(&state.embassies)?;

        Ok(RenderedSite {
            html,
            records_json,
            embassy_count: state.embassies.len(),
            online_count: state.online_count(),
        })
    }

    async fn load(&self, site: RenderedSite) -> Result<String> {
        tracing::debug!(
            "Writing {} and {} ({} bytes of HTML)",
            self.html_file,
            self.json_file,
            site.html.len()
        );

        self.storage
            .write_file(&self.html_file, site.html.as_bytes())
            .await?;
        self.storage
            .write_file(&self.json_file, site.records_json.as_bytes())
            .await?;

        Ok(format!("{}/{}", self.output_path, self.html_file))
    }
}
