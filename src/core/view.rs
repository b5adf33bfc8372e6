use crate::core::country::CountryResolver;
use crate::core::score::{self, heuristic_score, parse_pub_date};
use crate::domain::state::ViewState;
use chrono::{DateTime, Utc};

pub const NO_NEWS_MESSAGE: &str = "Aucune actualité disponible pour le moment";

#[derive(Debug, Clone, PartialEq)]
pub enum Headline {
    Latest {
        title: String,
        date: Option<String>,
        link: Option<String>,
    },
    Unavailable {
        message: String,
    },
}

/// One embassy joined with its country's score and news.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbassyView {
    pub name: String,
    pub website: String,
    pub latitude: f64,
    pub longitude: f64,
    pub online: bool,
    pub status_label: &'static str,
    pub country: String,
    pub itu_score: f64,
    pub health_score: u8,
    pub headline: Headline,
}

impl EmbassyView {
    pub fn itu_score_display(&self) -> String {
        score::format_score(self.itu_score)
    }

    pub fn score_description(&self) -> &'static str {
        score::score_description(self.itu_score)
    }

    pub fn score_color(&self) -> &'static str {
        score::score_color(self.itu_score)
    }
}

/// `dd/mm/yyyy`, or `None` when the date cannot be parsed.
pub fn format_french_date(raw: &str) -> Option<String> {
    parse_pub_date(raw).map(|d| d.format("%d/%m/%Y").to_string())
}

/// Join the state into view rows, in directory order.
pub fn build_views(
    state: &ViewState,
    resolver: &CountryResolver,
    now: DateTime<Utc>,
) -> Vec<EmbassyView> {
    state
        .embassies
        .iter()
        .map(|embassy| {
            let country = resolver.resolve(&embassy.name);
            let rss = state.rss.get(&country);
            // 缺少分數時顯示 0
            let itu_score = state.scores.get(&country).copied().unwrap_or(0.0);

            let headline = match rss {
                Some(entry) if !entry.has_error() && entry.has_title() => Headline::Latest {
                    title: entry.title.clone().unwrap_or_default(),
                    date: entry.pub_date.as_deref().and_then(format_french_date),
                    link: entry.link.clone().filter(|l| !l.is_empty()),
                },
                Some(entry) => Headline::Unavailable {
                    message: entry
                        .error
                        .clone()
                        .unwrap_or_else(|| NO_NEWS_MESSAGE.to_string()),
                },
                None => Headline::Unavailable {
                    message: NO_NEWS_MESSAGE.to_string(),
                },
            };

            EmbassyView {
                name: embassy.name.clone(),
                website: embassy.website.clone(),
                latitude: embassy.latitude,
                longitude: embassy.longitude,
                online: embassy.is_online(),
                status_label: embassy.website_status.status.label(),
                health_score: heuristic_score(Some(&embassy.website_status), rss, now),
                country,
                itu_score,
                headline,
            }
        })
        .collect()
}
