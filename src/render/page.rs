use crate::render::map::MapSettings;
use maud::{html, Markup, PreEscaped, DOCTYPE};

pub const PAGE_TITLE: &str = "Ambassades de France";
pub const LOADING_MESSAGE: &str = "Chargement...";

const STYLES: &str = r#"
:root { color-scheme: dark; }
body { margin: 0; font-family: system-ui, sans-serif; background: #121417; color: #e6e6e6; }
.app-container { display: flex; height: 100vh; gap: 16px; padding: 16px; box-sizing: border-box; }
.embassy-list { flex: 0 0 420px; overflow-y: auto; }
.embassy-list h1 { font-size: 1.4rem; }
.embassy-item { background: #1c1f24; border-radius: 12px; padding: 12px 16px; margin-bottom: 12px; }
.embassy-header h3 { margin: 0 0 8px; font-size: 1.05rem; }
.status-success { color: #4CAF50; }
.status-danger { color: #F44336; }
.status-success a, .status-danger a { color: inherit; word-break: break-all; }
.score-value { font-size: 1.6rem; font-weight: 700; }
.score-description, .health-score, .rss-date { font-size: 0.85rem; opacity: 0.8; }
.rss-title { font-weight: 600; }
.rss-error { font-style: italic; opacity: 0.7; }
.rss-link { color: #64b5f6; }
.map-container { flex: 1; border-radius: 12px; overflow: hidden; }
#map { height: 100%; width: 100%; }
.loading { display: flex; height: 100vh; align-items: center; justify-content: center; font-size: 1.5rem; }
"#;

pub fn document(body: Markup, map: &MapSettings) -> Markup {
    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (PAGE_TITLE) }
                link rel="stylesheet" href=(map.leaflet_css);
                style { (PreEscaped(STYLES)) }
            }
            body { (body) }
        }
    }
}

pub fn loading_page(map: &MapSettings) -> Markup {
    document(
        html! {
            div class="loading" { (LOADING_MESSAGE) }
        },
        map,
    )
}
