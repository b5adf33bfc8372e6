use crate::core::view::{EmbassyView, Headline};
use maud::{html, Markup, PreEscaped};
use serde::{Deserialize, Serialize};

pub const MARKER_ICON_SIZE: [u32; 2] = [25, 41];
pub const MARKER_ICON_ANCHOR: [u32; 2] = [12, 41];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// `[latitude, longitude]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub scroll_wheel_zoom: bool,
    pub tile_url: String,
    pub attribution: String,
    pub marker_online: String,
    pub marker_offline: String,
    pub leaflet_css: String,
    pub leaflet_js: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: [48.8566, 2.3522],
            zoom: 2,
            scroll_wheel_zoom: false,
            tile_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            marker_online: "/marker-icon-green.png".to_string(),
            marker_offline: "/marker-icon-red.png".to_string(),
            leaflet_css: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css".to_string(),
            leaflet_js: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MapBootstrap<'a> {
    center: [f64; 2],
    zoom: u8,
    scroll_wheel_zoom: bool,
    tile_url: &'a str,
    attribution: &'a str,
    icon_size: [u32; 2],
    icon_anchor: [u32; 2],
    markers: Vec<MarkerData<'a>>,
}

#[derive(Debug, Serialize)]
struct MarkerData<'a> {
    lat: f64,
    lng: f64,
    icon: &'a str,
    popup: String,
}

const MAP_SCRIPT: &str = r#"(function () {
  var config = __MAP_CONFIG__;
  var map = L.map('map', {
    center: config.center,
    zoom: config.zoom,
    scrollWheelZoom: config.scrollWheelZoom
  });
  L.tileLayer(config.tileUrl, { attribution: config.attribution }).addTo(map);
  config.markers.forEach(function (m) {
    var icon = L.icon({ iconUrl: m.icon, iconSize: config.iconSize, iconAnchor: config.iconAnchor });
    L.marker([m.lat, m.lng], { icon: icon }).addTo(map).bindPopup(m.popup);
  });
})();"#;

pub fn popup(view: &EmbassyView) -> Markup {
    let news = match &view.headline {
        Headline::Latest { title, date, .. } => Some((title, date)),
        Headline::Unavailable { .. } => None,
    };

    html! {
        div class="popup-content" {
            h3 { (view.name) }
            p { "Statut site : " (view.status_label) }
            @if let Some((title, date)) = news {
                div class="popup-rss" {
                    p { strong { "Dernière actualité :" } }
                    p { (title) }
                    @if let Some(date) = date {
                        p class="rss-date" { (date) }
                    }
                }
            }
        }
    }
}

/// Map configuration and markers as a JSON literal safe to inline in a
/// `<script>` element.
pub fn map_config_json(
    views: &[EmbassyView],
    settings: &MapSettings,
) -> serde_json::Result<String> {
    let markers = views
        .iter()
        .map(|view| MarkerData {
            lat: view.latitude,
            lng: view.longitude,
            icon: if view.online {
                settings.marker_online.as_str()
            } else {
                settings.marker_offline.as_str()
            },
            popup: popup(view).into_string(),
        })
        .collect();

    let bootstrap = MapBootstrap {
        center: settings.center,
        zoom: settings.zoom,
        scroll_wheel_zoom: settings.scroll_wheel_zoom,
        tile_url: &settings.tile_url,
        attribution: &settings.attribution,
        icon_size: MARKER_ICON_SIZE,
        icon_anchor: MARKER_ICON_ANCHOR,
        markers,
    };

    // '<' 只會出現在字串內，轉成 \u003c 以免提早結束 script
    Ok(serde_json::to_string(&bootstrap)?.replace('<', "\\u003c"))
}

pub fn map_panel(views: &[EmbassyView], settings: &MapSettings) -> serde_json::Result<Markup> {
    let config = map_config_json(views, settings)?;
    let script = MAP_SCRIPT.replace("__MAP_CONFIG__", &config);

    Ok(html! {
        div class="map-container" {
            div id="map" {}
        }
        script src=(settings.leaflet_js) {}
        script { (PreEscaped(script)) }
    })
}
