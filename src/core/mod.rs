pub mod aggregator;
pub mod country;
pub mod cyber_index;
pub mod etl;
pub mod fetcher;
pub mod score;
pub mod view;

pub use crate::domain::model::{EmbassyRecord, RenderedSite, WebsiteStatus};
pub use crate::domain::ports::{Pipeline, Storage, Transport};
pub use crate::domain::state::{Action, ViewState};
pub use crate::utils::error::Result;
