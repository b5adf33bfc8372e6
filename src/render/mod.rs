pub mod list;
pub mod map;
pub mod page;

use crate::core::country::CountryResolver;
use crate::core::view::build_views;
use crate::domain::state::ViewState;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use maud::{html, Markup};

pub use map::MapSettings;

#[derive(Debug, Clone)]
pub struct Renderer {
    resolver: CountryResolver,
    map: MapSettings,
}

impl Renderer {
    pub fn new(resolver: CountryResolver, map: MapSettings) -> Self {
        Self { resolver, map }
    }

    pub fn render(&self, state: &ViewState, now: DateTime<Utc>) -> Result<Markup> {
        if state.loading {
            return Ok(page::loading_page(&self.map));
        }

        let views = build_views(state, &self.resolver, now);
        let map_panel = map::map_panel(&views, &self.map)?;

        Ok(page::document(
            html! {
                div class="app-container" {
                    (list::list_panel(&views))
                    (map_panel)
                }
            },
            &self.map,
        ))
    }
}
