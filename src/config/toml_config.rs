use crate::adapters::http::{HttpTransport, DEFAULT_ACCEPT, DEFAULT_USER_AGENT};
use crate::core::aggregator::DEFAULT_CONCURRENT_PROBES;
use crate::core::country::{CountryResolver, SpecialCase};
use crate::core::fetcher::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RELAYS};
use crate::domain::model::{SourceLocation, Sources};
use crate::render::MapSettings;
use crate::utils::error::{Result, WatchError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

pub const DEFAULT_DIRECTORY_URL: &str =
    "https://rococo-florentine-06d544.netlify.app/embassies.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub sources: SourcesConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    pub map: MapSettings,
    pub countries: CountriesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Relative sources are resolved against this URL. Without it they are
    /// local file paths.
    pub base_url: Option<String>,
    pub directory: String,
    pub cyber_scores: String,
    pub rss_feeds: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            directory: DEFAULT_DIRECTORY_URL.to_string(),
            cyber_scores: "cyber_scores.json".to_string(),
            rss_feeds: "rss_feeds.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub timeout_seconds: u64,
    pub backoff_base_ms: u64,
    pub user_agent: String,
    pub accept: String,
    pub relays: Vec<String>,
    pub concurrent_probes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout_seconds: 5,
            backoff_base_ms: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            relays: DEFAULT_RELAYS.iter().map(|r| r.to_string()).collect(),
            concurrent_probes: DEFAULT_CONCURRENT_PROBES,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            relays: self.relays.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub html_file: String,
    pub json_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./public".to_string(),
            html_file: "index.html".to_string(),
            json_file: "embassies.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountriesConfig {
    pub special_cases: Vec<SpecialCase>,
    pub translations: BTreeMap<String, String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"))
}

fn resolve_source(field: &str, raw: &str, base: Option<&Url>) -> Result<SourceLocation> {
    if raw.trim().is_empty() {
        return Err(WatchError::MissingConfigError {
            field: field.to_string(),
        });
    }

    match Url::parse(raw) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(SourceLocation::Remote(url.to_string())),
            "file" => url
                .to_file_path()
                .map(SourceLocation::Local)
                .map_err(|_| WatchError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: raw.to_string(),
                    reason: "Invalid file URL".to_string(),
                }),
            scheme => Err(WatchError::InvalidConfigValueError {
                field: field.to_string(),
                value: raw.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        // 相對路徑
        Err(_) => match base {
            Some(base) => base
                .join(raw)
                .map(|url| SourceLocation::Remote(url.to_string()))
                .map_err(|e| WatchError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: raw.to_string(),
                    reason: format!("Cannot join with base URL: {}", e),
                }),
            None => Ok(SourceLocation::Local(PathBuf::from(raw))),
        },
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| WatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BASE_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn resolve_sources(&self) -> Result<Sources> {
        let base = match &self.sources.base_url {
            Some(raw) => Some(Url::parse(raw).map_err(|e| WatchError::InvalidConfigValueError {
                field: "sources.base_url".to_string(),
                value: raw.clone(),
                reason: format!("Invalid URL format: {}", e),
            })?),
            None => None,
        };

        Ok(Sources {
            directory: resolve_source("sources.directory", &self.sources.directory, base.as_ref())?,
            cyber_scores: resolve_source(
                "sources.cyber_scores",
                &self.sources.cyber_scores,
                base.as_ref(),
            )?,
            rss_feeds: resolve_source("sources.rss_feeds", &self.sources.rss_feeds, base.as_ref())?,
        })
    }

    pub fn http_transport(&self) -> Result<HttpTransport> {
        HttpTransport::new(self.fetch.timeout(), &self.fetch.user_agent, &self.fetch.accept)
    }

    pub fn country_resolver(&self) -> CountryResolver {
        CountryResolver::new().with_rules(
            self.countries.special_cases.iter().cloned(),
            self.countries
                .translations
                .iter()
                .map(|(fr, en)| (fr.clone(), en.clone())),
        )
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(base_url) = &self.sources.base_url {
            validation::validate_url("sources.base_url", base_url)?;
        }
        self.resolve_sources()?;

        validation::validate_positive_number(
            "fetch.max_attempts",
            self.fetch.max_attempts as usize,
            1,
        )?;
        validation::validate_positive_number(
            "fetch.timeout_seconds",
            self.fetch.timeout_seconds as usize,
            1,
        )?;
        validation::validate_positive_number(
            "fetch.concurrent_probes",
            self.fetch.concurrent_probes,
            1,
        )?;
        validation::validate_non_empty_string("fetch.user_agent", &self.fetch.user_agent)?;
        for relay in &self.fetch.relays {
            validation::validate_url("fetch.relays", relay)?;
        }

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_non_empty_string("output.html_file", &self.output.html_file)?;
        validation::validate_non_empty_string("output.json_file", &self.output.json_file)?;

        validation::validate_range("map.zoom", self.map.zoom, 0, 19)?;
        validation::validate_range("map.center.latitude", self.map.center[0], -90.0, 90.0)?;
        validation::validate_range("map.center.longitude", self.map.center[1], -180.0, 180.0)?;

        for rule in &self.countries.special_cases {
            validation::validate_non_empty_string("countries.special_cases.needle", &rule.needle)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.timeout(), Duration::from_secs(5));
        assert_eq!(config.fetch.relays.len(), 4);
        assert_eq!(config.map.zoom, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[sources]
base_url = "https://embassy-map.example/"
directory = "https://directory.example/embassies.json"
cyber_scores = "/cyber_scores.json"
rss_feeds = "data/rss_feeds.json"

[fetch]
max_attempts = 5
backoff_base_ms = 250
relays = ["https://corsproxy.io/?"]
concurrent_probes = 4

[output]
path = "./site"

[map]
zoom = 3
center = [45.0, 5.0]

[[countries.special_cases]]
needle = "à Lima"
country = "Peru"

[countries.translations]
"Pérou" = "Peru"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.fetch.max_attempts, 5);
        assert_eq!(config.fetch.timeout_seconds, 5);
        let policy = config.fetch.retry_policy();
        assert_eq!(policy.backoff_base, Duration::from_millis(250));
        assert_eq!(policy.relays, vec!["https://corsproxy.io/?".to_string()]);
        assert_eq!(config.output.path, "./site");
        assert_eq!(config.output.html_file, "index.html");
        assert_eq!(config.map.center, [45.0, 5.0]);
        assert!(config.validate().is_ok());

        let sources = config.resolve_sources().unwrap();
        assert_eq!(
            sources.directory,
            SourceLocation::Remote("https://directory.example/embassies.json".to_string())
        );
        assert_eq!(
            sources.cyber_scores,
            SourceLocation::Remote("https://embassy-map.example/cyber_scores.json".to_string())
        );
        assert_eq!(
            sources.rss_feeds,
            SourceLocation::Remote("https://embassy-map.example/data/rss_feeds.json".to_string())
        );

        let resolver = config.country_resolver();
        assert_eq!(resolver.resolve("Ambassade de France à Lima"), "Peru");
        assert_eq!(resolver.resolve("Ambassade de France (Pérou)"), "Peru");
    }

    #[test]
    fn test_relative_sources_without_base_are_local() {
        let config = TomlConfig::default();
        let sources = config.resolve_sources().unwrap();

        assert!(matches!(sources.directory, SourceLocation::Remote(_)));
        assert_eq!(
            sources.cyber_scores,
            SourceLocation::Local(PathBuf::from("cyber_scores.json"))
        );
        assert_eq!(sources.rss_feeds, SourceLocation::Local(PathBuf::from("rss_feeds.json")));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EMBASSY_WATCH_TEST_BASE", "https://mirror.example/");

        let toml_content = r#"
[sources]
base_url = "${EMBASSY_WATCH_TEST_BASE}"
directory = "${EMBASSY_WATCH_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.sources.base_url.as_deref(), Some("https://mirror.example/"));
        // 未設定的變數保持原樣
        assert_eq!(config.sources.directory, "${EMBASSY_WATCH_UNSET_VAR}");

        std::env::remove_var("EMBASSY_WATCH_TEST_BASE");
    }

    #[test]
    fn test_config_validation_failures() {
        let mut config = TomlConfig::default();
        config.fetch.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.fetch.relays.push("not a url".to_string());
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.map.zoom = 25;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.sources.directory = "ftp://directory.example/list.json".to_string();
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.sources.rss_feeds = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(WatchError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = TomlConfig::from_toml_str("[fetch]\nmax_attempts = \"three\"").unwrap_err();
        assert!(matches!(err, WatchError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_example_config_is_valid() {
        std::env::set_var("EMBASSY_DATA_URL", "https://embassy-map.example/");

        let config =
            TomlConfig::from_toml_str(include_str!("../../embassy-watch.example.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.resolve_sources().unwrap().rss_feeds,
            SourceLocation::Remote("https://embassy-map.example/rss_feeds.json".to_string())
        );
        assert_eq!(
            config.country_resolver().resolve("Ambassade de France (Pays-Bas)"),
            "Netherlands"
        );
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\npath = \"./from-file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.path, "./from-file");
    }
}
