use std::str::FromStr;

pub const DEFAULT_APP_NAME: &str = "YouTube Shorts Finder";
pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const DEFAULT_MAX_SELECTED_CHANNELS: usize = 50;
pub const MAX_HISTORY_ENTRIES: usize = 10;
pub const CHANNEL_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const CHANNEL_SEARCH_MIN_CHARS: usize = 2;

/// Where preferences, history and categories live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    Local,
    Remote,
}

impl FromStr for PersistenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(PersistenceMode::Local),
            "remote" | "server" => Ok(PersistenceMode::Remote),
            other => Err(format!("unknown persistence mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Empty means same origin.
    pub backend_url: String,
    pub app_name: String,
    pub debug_mode: bool,
    pub persistence: PersistenceMode,
    pub max_selected_channels: usize,
    pub page_size: usize,
    /// Lowest accepted `min_views`; 0 disables the check.
    pub min_views_floor: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            app_name: DEFAULT_APP_NAME.to_string(),
            debug_mode: false,
            persistence: PersistenceMode::Remote,
            max_selected_channels: DEFAULT_MAX_SELECTED_CHANNELS,
            page_size: DEFAULT_PAGE_SIZE,
            min_views_floor: 0,
        }
    }
}

impl AppConfig {
    /// Builds the config from a key lookup, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend_url = lookup("BACKEND_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.backend_url);

        Self {
            backend_url,
            app_name: lookup("APP_NAME").unwrap_or(defaults.app_name),
            debug_mode: parse_or("DEBUG_MODE", &lookup, defaults.debug_mode),
            persistence: parse_or("PERSISTENCE_MODE", &lookup, defaults.persistence),
            max_selected_channels: parse_positive(
                "MAX_SELECTED_CHANNELS",
                &lookup,
                defaults.max_selected_channels,
            ),
            page_size: parse_positive("PAGE_SIZE", &lookup, defaults.page_size),
            min_views_floor: parse_or("MIN_VIEWS_FLOOR", &lookup, defaults.min_views_floor),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_url, path)
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid value '{}' for {}", raw, key);
            default
        }),
        None => default,
    }
}

fn parse_positive<F>(key: &str, lookup: &F, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(key, lookup, default) {
        0 => {
            log::warn!("{} must be positive, using {}", key, default);
            default
        }
        n => n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.page_size, 12);
        assert_eq!(config.persistence, PersistenceMode::Remote);
    }

    #[test]
    fn test_values_are_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BACKEND_URL", "http://localhost:5000/"),
            ("DEBUG_MODE", "true"),
            ("PERSISTENCE_MODE", "Local"),
            ("MAX_SELECTED_CHANNELS", "20"),
            ("MIN_VIEWS_FLOOR", "1000"),
        ]));
        assert_eq!(config.backend_url, "http://localhost:5000");
        assert!(config.debug_mode);
        assert_eq!(config.persistence, PersistenceMode::Local);
        assert_eq!(config.max_selected_channels, 20);
        assert_eq!(config.min_views_floor, 1000);
        assert_eq!(config.endpoint("/search"), "http://localhost:5000/search");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DEBUG_MODE", "maybe"),
            ("PERSISTENCE_MODE", "cloud"),
            ("PAGE_SIZE", "0"),
        ]));
        assert!(!config.debug_mode);
        assert_eq!(config.persistence, PersistenceMode::Remote);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }
}
