use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

const SPECIAL_CASES: &[(&str, &str)] = &[
    ("au Canada", "Canada"),
    ("en Australie", "Australia"),
    ("à Téhéran", "Iran"),
    ("à Kuala Lumpur", "Malaysia"),
    ("à Rabat", "Morocco"),
    ("à Alger", "Algeria"),
    ("en Italie", "Italy"),
    ("en Arabie Saoudite", "Saudi Arabia"),
    ("en Égypte", "Egypt"),
    ("en Chine", "China"),
    ("en Corée du Sud", "South Korea"),
    ("en Inde", "India"),
    ("en France", "France"),
];

const TRANSLATIONS: &[(&str, &str)] = &[
    ("États-Unis", "United States"),
    ("Allemagne", "Germany"),
    ("Royaume-Uni", "United Kingdom"),
    ("Japon", "Japan"),
    ("Russie", "Russia"),
    ("Brésil", "Brazil"),
    ("Espagne", "Spain"),
    ("Maroc", "Morocco"),
    ("Algérie", "Algeria"),
    ("Italie", "Italy"),
    ("Arabie Saoudite", "Saudi Arabia"),
    ("Égypte", "Egypt"),
    ("Chine", "China"),
    ("Corée du Sud", "South Korea"),
    ("Inde", "India"),
    ("Canada", "Canada"),
    ("Australie", "Australia"),
    ("Iran", "Iran"),
    ("Malaisie", "Malaysia"),
    ("Thaïlande", "Thailand"),
    ("Vietnam", "Vietnam"),
    ("France", "France"),
];

fn parenthesized() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\((.*?)\)").expect("parenthesis pattern compiles"))
}

/// Substring rule: a label containing `needle` resolves to `country`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialCase {
    pub needle: String,
    pub country: String,
}

impl SpecialCase {
    pub fn new(needle: &str, country: &str) -> Self {
        Self {
            needle: needle.to_string(),
            country: country.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CountryResolver {
    special_cases: Vec<SpecialCase>,
    translations: HashMap<String, String>,
}

impl Default for CountryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryResolver {
    pub fn new() -> Self {
        Self {
            special_cases: SPECIAL_CASES
                .iter()
                .map(|(needle, country)| SpecialCase::new(needle, country))
                .collect(),
            translations: TRANSLATIONS
                .iter()
                .map(|(fr, en)| (fr.to_string(), en.to_string()))
                .collect(),
        }
    }

    /// Append extra rules. Special cases run after the built-in ones;
    /// translations override built-in entries with the same key.
    pub fn with_rules<I, J>(mut self, special_cases: I, translations: J) -> Self
    where
        I: IntoIterator<Item = SpecialCase>,
        J: IntoIterator<Item = (String, String)>,
    {
        self.special_cases.extend(special_cases);
        self.translations.extend(translations);
        self
    }

    /// 特例 > 括號內國名 (翻譯) > 原字串，結果即分數與 RSS 表的鍵
    pub fn resolve(&self, label: &str) -> String {
        if let Some(rule) = self
            .special_cases
            .iter()
            .find(|rule| label.contains(rule.needle.as_str()))
        {
            return rule.country.clone();
        }

        if let Some(captures) = parenthesized().captures(label) {
            let raw = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            return self
                .translations
                .get(raw)
                .cloned()
                .unwrap_or_else(|| raw.to_string());
        }

        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_cases() {
        let resolver = CountryResolver::new();
        assert_eq!(resolver.resolve("Ambassade de France en Italie"), "Italy");
        assert_eq!(resolver.resolve("Ambassade de France au Canada"), "Canada");
        assert_eq!(resolver.resolve("Ambassade de France à Téhéran"), "Iran");
        assert_eq!(resolver.resolve("Ambassade de France en Corée du Sud"), "South Korea");
    }

    #[test]
    fn test_special_case_wins_over_parentheses() {
        let resolver = CountryResolver::new();
        assert_eq!(
            resolver.resolve("Ambassade de France au Canada (Allemagne)"),
            "Canada"
        );
        assert_eq!(resolver.resolve("Consulat (Japon) à Rabat"), "Morocco");
    }

    #[test]
    fn test_parenthesized_translation() {
        let resolver = CountryResolver::new();
        assert_eq!(resolver.resolve("Ambassade de France (Allemagne)"), "Germany");
        assert_eq!(resolver.resolve("Ambassade de France (États-Unis)"), "United States");
        assert_eq!(resolver.resolve("Ambassade (Thaïlande) - Bangkok"), "Thailand");
    }

    #[test]
    fn test_unknown_parenthesized_name_is_returned_raw() {
        let resolver = CountryResolver::new();
        assert_eq!(resolver.resolve("Ambassade de France (Pérou)"), "Pérou");
        // 只取第一組括號
        assert_eq!(resolver.resolve("Ambassade (Chili) (Japon)"), "Chili");
    }

    #[test]
    fn test_unmatched_label_is_returned_unchanged() {
        let resolver = CountryResolver::new();
        assert_eq!(
            resolver.resolve("Ambassade de France à Lima"),
            "Ambassade de France à Lima"
        );
        assert_eq!(resolver.resolve(""), "");
    }

    #[test]
    fn test_empty_parentheses_yield_empty_name() {
        let resolver = CountryResolver::new();
        assert_eq!(resolver.resolve("Ambassade ()"), "");
    }

    #[test]
    fn test_with_rules_extends_tables() {
        let resolver = CountryResolver::new().with_rules(
            vec![SpecialCase::new("à Lima", "Peru")],
            vec![("Pérou".to_string(), "Peru".to_string())],
        );
        assert_eq!(resolver.resolve("Ambassade de France à Lima"), "Peru");
        assert_eq!(resolver.resolve("Ambassade de France (Pérou)"), "Peru");
        // 內建規則仍然優先
        assert_eq!(resolver.resolve("Ambassade de France en Inde"), "India");
    }
}
