use crate::domain::model::{RssEntry, WebsiteStatus};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

pub const BASE_SCORE: i32 = 50;
pub const FRESH_NEWS_DAYS: i64 = 7;

/// Heuristic health score in [0, 100] from site reachability and RSS
/// freshness.
pub fn heuristic_score(
    status: Option<&WebsiteStatus>,
    rss: Option<&RssEntry>,
    now: DateTime<Utc>,
) -> u8 {
    let mut score = BASE_SCORE;
    let site_ok = status.is_some_and(|s| s.is_ok());

    // 加分
    if site_ok {
        score += 10;
    }
    if let Some(entry) = rss {
        if !entry.has_error() {
            score += 15;
        }
        if entry
            .pub_date
            .as_deref()
            .and_then(parse_pub_date)
            .is_some_and(|published| now - published < Duration::days(FRESH_NEWS_DAYS))
        {
            score += 10;
        }
    }

    // 扣分
    if !site_ok {
        score -= 20;
    }
    if let Some(entry) = rss {
        if entry.has_error() {
            score -= 15;
        }
        if !entry.has_description() {
            score -= 5;
        }
    }

    score.clamp(0, 100) as u8
}

/// Parse the date formats found in RSS and Atom feeds.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(date.and_utc());
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

/// Band description for an ITU index value.
pub fn score_description(score: f64) -> &'static str {
    if score >= 90.0 {
        "Excellente cybersécurité - Pays très bien protégé"
    } else if score >= 80.0 {
        "Bonne cybersécurité - Protection efficace"
    } else if score >= 70.0 {
        "Cybersécurité moyenne - Protection correcte"
    } else if score >= 60.0 {
        "Cybersécurité faible - Besoin d'amélioration"
    } else {
        "Cybersécurité très faible - Risque important"
    }
}

pub fn score_color(score: f64) -> &'static str {
    if score >= 80.0 {
        "#4CAF50"
    } else if score >= 60.0 {
        "#FFC107"
    } else if score >= 40.0 {
        "#FF9800"
    } else {
        "#F44336"
    }
}

/// `97.49` -> `"97,49"`
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score).replace('.', ",")
}
