use crate::core::view::{EmbassyView, Headline};
use maud::{html, Markup};

pub const EMPTY_LIST_MESSAGE: &str = "Aucune ambassade à afficher.";

fn headline_block(headline: &Headline) -> Markup {
    match headline {
        Headline::Latest { title, date, link } => html! {
            div class="rss-feed" {
                h4 { "🌐 Dernière actualité" }
                p class="rss-title" { (title) }
                @if let Some(date) = date {
                    p class="rss-date" { "Publié le : " (date) }
                }
                div class="rss-links" {
                    @if let Some(link) = link {
                        a class="rss-link" href=(link) target="_blank" rel="noopener noreferrer" {
                            "Lire l'article complet"
                        }
                    }
                }
            }
        },
        Headline::Unavailable { message } => html! {
            div class="rss-feed" {
                h4 { "🌐 Flux RSS" }
                p class="rss-error" { (message) }
            }
        },
    }
}

fn embassy_item(view: &EmbassyView) -> Markup {
    let (status_class, glyph) = if view.online {
        ("status-success", "✔")
    } else {
        ("status-danger", "⚠")
    };

    html! {
        div class="embassy-item" data-country=(view.country) {
            div class="embassy-header" {
                h3 { (view.name) }
            }
            div class="embassy-status" {
                p class=(status_class) {
                    span class="glyph" { (glyph) }
                    " Site internet : "
                    a href=(view.website) { (view.website) }
                }
            }
            div class="country-cyber-score" {
                h4 { "Score ITU Global Cybersecurity Index" }
                div class="score-container" {
                    span class="score-value" style=(format!("color: {}", view.score_color())) {
                        (view.itu_score_display())
                    }
                }
                p class="score-description" { (view.score_description()) }
                p class="health-score" { "Indice de disponibilité : " (view.health_score) "/100" }
            }
            (headline_block(&view.headline))
        }
    }
}

pub fn list_panel(views: &[EmbassyView]) -> Markup {
    html! {
        div class="embassy-list" {
            h1 { span class="icon" { "🗺" } " Ambassades de France" }
            @if views.is_empty() {
                p class="empty" { (EMPTY_LIST_MESSAGE) }
            } @else {
                @for view in views {
                    (embassy_item(view))
                }
            }
        }
    }
}
