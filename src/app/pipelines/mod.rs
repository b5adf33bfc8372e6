pub mod embassy_pipeline;

pub use embassy_pipeline::EmbassyPipeline;
