//! Build-time configuration
//!
//! Values are baked in through `GENESIS_*` environment variables when the
//! bundle is compiled; anything unset falls back to the defaults below.

use genesis_shared::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, SEARCH_DEBOUNCE_MS};
use tracing::level_filters::LevelFilter;

const DEFAULT_API_URL: &str = "/api";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("GENESIS_SEARCH_DEBOUNCE_MS must be a number of milliseconds, got {0:?}")]
    InvalidDebounce(String),
    #[error("GENESIS_PAGE_SIZE must be one of {PAGE_SIZE_OPTIONS:?}, got {0:?}")]
    InvalidPageSize(String),
}

/// Application configuration, fixed at build time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// REST base URL (`GENESIS_API_URL`)
    pub api_url: String,
    /// Max tracing level (`GENESIS_LOG_LEVEL`)
    pub log_level: LevelFilter,
    /// Search input debounce (`GENESIS_SEARCH_DEBOUNCE_MS`)
    pub search_debounce_ms: u32,
    /// Initial list page size (`GENESIS_PAGE_SIZE`)
    pub page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_level: parse_log_level(DEFAULT_LOG_LEVEL),
            search_debounce_ms: SEARCH_DEBOUNCE_MS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            option_env!("GENESIS_API_URL"),
            option_env!("GENESIS_LOG_LEVEL"),
            option_env!("GENESIS_SEARCH_DEBOUNCE_MS"),
            option_env!("GENESIS_PAGE_SIZE"),
        )
    }

    pub fn from_values(
        api_url: Option<&str>,
        log_level: Option<&str>,
        search_debounce_ms: Option<&str>,
        page_size: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = api_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let log_level = log_level
            .map(parse_log_level)
            .unwrap_or(defaults.log_level);

        let search_debounce_ms = match search_debounce_ms {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidDebounce(raw.to_string()))?,
            None => defaults.search_debounce_ms,
        };

        let page_size = match page_size {
            Some(raw) => raw
                .trim()
                .parse()
                .ok()
                .filter(|size| PAGE_SIZE_OPTIONS.contains(size))
                .ok_or_else(|| ConfigError::InvalidPageSize(raw.to_string()))?,
            None => defaults.page_size,
        };

        Ok(Self {
            api_url,
            log_level,
            search_debounce_ms,
            page_size,
        })
    }
}

/// Unknown names mean `info`; `off`/`none` disable logging.
fn parse_log_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn unset_values_use_defaults() {
        let config = AppConfig::from_values(None, None, None, None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_url, "/api");
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.page_size, 8);
        assert_eq!(config.log_level, LevelFilter::INFO);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_values(
            Some("https://lab.example/api/"),
            Some("DEBUG"),
            Some("150"),
            Some("20"),
        )
        .unwrap();
        assert_eq!(config.api_url, "https://lab.example/api");
        assert_eq!(config.log_level, LevelFilter::DEBUG);
        assert_eq!(config.search_debounce_ms, 150);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn rejects_page_sizes_outside_the_options() {
        assert_eq!(
            AppConfig::from_values(None, None, None, Some("7")),
            Err(ConfigError::InvalidPageSize("7".to_string()))
        );
        assert!(matches!(
            AppConfig::from_values(None, None, Some("soon"), None),
            Err(ConfigError::InvalidDebounce(_))
        ));
    }

    #[rstest]
    #[case("trace", LevelFilter::TRACE)]
    #[case("Warn", LevelFilter::WARN)]
    #[case("off", LevelFilter::OFF)]
    #[case("none", LevelFilter::OFF)]
    #[case("verbose", LevelFilter::INFO)]
    fn parses_log_levels(#[case] raw: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_log_level(raw), expected);
    }
}
