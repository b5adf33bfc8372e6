use crate::domain::model::CyberScores;

// ITU Global Cybersecurity Index 2023

/// Countries that have an RSS source, hence a snapshot entry.
pub const MONITORED_COUNTRIES: &[&str] = &[
    "United States",
    "Canada",
    "Germany",
    "United Kingdom",
    "Italy",
    "Spain",
    "France",
    "Japan",
    "Russia",
    "South Korea",
    "India",
    "Thailand",
    "Vietnam",
    "China",
    "Malaysia",
    "Egypt",
    "Saudi Arabia",
    "Iran",
    "Brazil",
    "Morocco",
    "Algeria",
    "Australia",
];

// 國名 -> ITU 名稱
const ITU_NAMES: &[(&str, &str)] = &[
    ("United States", "USA"),
    ("Germany", "Germany"),
    ("United Kingdom", "United Kingdom"),
    ("Japan", "Japan"),
    ("Russia", "Russian Federation"),
    ("Brazil", "Brazil"),
    ("Spain", "Spain"),
    ("Italy", "Italy"),
    ("Egypt", "Egypt"),
    ("South Korea", "Republic of Korea"),
    ("India", "India"),
    ("Canada", "Canada"),
    ("Thailand", "Thailand"),
    ("Vietnam", "Vietnam"),
];

const GCI_2023: &[(&str, f64)] = &[
    ("USA", 100.0),
    ("United Kingdom", 99.54),
    ("Germany", 98.52),
    ("Canada", 97.49),
    ("Japan", 97.49),
    ("Republic of Korea", 97.49),
    ("Spain", 96.46),
    ("Italy", 95.43),
    ("Brazil", 94.40),
    ("India", 93.37),
    ("Russian Federation", 92.34),
    ("Egypt", 91.31),
    ("Thailand", 90.28),
    ("Vietnam", 89.25),
];

pub fn itu_name(country: &str) -> Option<&'static str> {
    ITU_NAMES
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, itu)| *itu)
}

pub fn country_score(country: &str) -> Option<f64> {
    let Some(itu) = itu_name(country) else {
        tracing::warn!("Country not in the ITU mapping: {}", country);
        return None;
    };

    let score = GCI_2023
        .iter()
        .find(|(name, _)| *name == itu)
        .map(|(_, score)| *score);
    if score.is_none() {
        tracing::warn!("No GCI score for: {}", itu);
    }
    score
}

/// Score table for `countries`, skipping those without a score.
pub fn snapshot<'a, I>(countries: I) -> CyberScores
where
    I: IntoIterator<Item = &'a str>,
{
    countries
        .into_iter()
        .filter_map(|country| country_score(country).map(|score| (country.to_string(), score)))
        .collect()
}
