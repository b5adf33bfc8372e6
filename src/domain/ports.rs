use crate::domain::model::{FetchResponse, RenderedSite};
use crate::domain::state::ViewState;
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

/// A single GET. Non-2xx responses are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResponse>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ViewState>;
    async fn transform(&self, state: ViewState) -> Result<RenderedSite>;
    async fn load(&self, site: RenderedSite) -> Result<String>;
}
