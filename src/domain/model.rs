use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Embassy directory entry as published by the directory endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(rename = "Nom")]
    pub name: String,
    #[serde(rename = "Site internet", default, deserialize_with = "de_website")]
    pub website: String,
    #[serde(rename = "Latitude", deserialize_with = "de_coordinate")]
    pub latitude: f64,
    #[serde(rename = "Longitude", deserialize_with = "de_coordinate")]
    pub longitude: f64,
}

// null 視為沒有網站
fn de_website<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl DirectoryEntry {
    pub fn has_website(&self) -> bool {
        !self.website.trim().is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

// 目錄資料的座標有時是字串 ("48,85")
fn de_coordinate<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Coordinate::deserialize(deserializer)? {
        Coordinate::Number(n) => Ok(n),
        Coordinate::Text(s) => s
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map_err(serde::de::Error::custom),
    }
}

/// Why a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum FailureCause {
    Timeout,
    Connect,
    HttpStatus(u16),
    Body,
    Request,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Timeout => write!(f, "timeout"),
            FailureCause::Connect => write!(f, "connection failure"),
            FailureCause::HttpStatus(code) => write!(f, "HTTP {}", code),
            FailureCause::Body => write!(f, "unreadable body"),
            FailureCause::Request => write!(f, "request error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteState {
    Online,
    Offline,
}

impl SiteState {
    pub fn label(&self) -> &'static str {
        match self {
            SiteState::Online => "En ligne",
            SiteState::Offline => "Hors ligne",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteStatus {
    pub code: u16,
    pub status: SiteState,
    pub last_checked: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<FailureCause>,
}

impl WebsiteStatus {
    /// Code recorded for every failed probe, whatever the cause.
    pub const UNREACHABLE_CODE: u16 = 404;

    pub fn online(code: u16, checked_at: DateTime<Utc>) -> Self {
        Self {
            code,
            status: SiteState::Online,
            last_checked: checked_at,
            error: None,
            cause: None,
        }
    }

    pub fn offline(
        message: impl Into<String>,
        cause: Option<FailureCause>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code: Self::UNREACHABLE_CODE,
            status: SiteState::Offline,
            last_checked: checked_at,
            error: Some(message.into()),
            cause,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 200
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbassyRecord {
    pub name: String,
    pub website: String,
    pub latitude: f64,
    pub longitude: f64,
    pub website_status: WebsiteStatus,
}

impl EmbassyRecord {
    pub fn from_entry(entry: DirectoryEntry, website_status: WebsiteStatus) -> Self {
        Self {
            name: entry.name,
            website: entry.website,
            latitude: entry.latitude,
            longitude: entry.longitude,
            website_status,
        }
    }

    pub fn is_online(&self) -> bool {
        self.website_status.is_ok()
    }
}

/// Latest headline for one country, as stored in the RSS snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RssEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de_error_flag", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fetched: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cyber_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorFlag {
    Flag(bool),
    Message(String),
}

// error 欄位可能是布林值或錯誤訊息
fn de_error_flag<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ErrorFlag>::deserialize(deserializer)? {
        Some(ErrorFlag::Flag(true)) => Some("error".to_string()),
        Some(ErrorFlag::Message(message)) if !message.is_empty() => Some(message),
        _ => None,
    })
}

impl RssEntry {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn has_description(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.trim().is_empty())
    }

    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// RSS snapshot keyed by canonical country name.
pub type RssSnapshot = BTreeMap<String, RssEntry>;

/// Cyber index keyed by canonical country name.
pub type CyberScores = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

/// Where a dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(String),
    Local(PathBuf),
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Remote(url) => write!(f, "{}", url),
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub directory: SourceLocation,
    pub cyber_scores: SourceLocation,
    pub rss_feeds: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct RenderedSite {
    pub html: String,
    pub records_json: String,
    pub embassy_count: usize,
    pub online_count: usize,
}
