pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::HttpTransport;
pub use app::pipelines::EmbassyPipeline;
pub use config::{cli::LocalStorage, TomlConfig};
pub use core::etl::EtlEngine;
pub use utils::error::{Result, WatchError};
