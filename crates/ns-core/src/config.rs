//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. environment variables (`NS_CALENDAR_*`)
//! 2. the `ns-calendar.toml` config file
//! 3. built-in defaults
//!
//! `${VAR_NAME}` inside the config file is replaced by the environment value.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::locale::{
    Locale, DEFAULT_DAYS, DEFAULT_EVENT_NONE, DEFAULT_EVENT_PLURAL, DEFAULT_EVENT_SINGULAR,
    DEFAULT_MONTHS,
};
use crate::{Error, Result};

/// Default config file looked up by [`WidgetConfig::load`]
pub const CONFIG_FILE: &str = "ns-calendar.toml";

const DEFAULT_NEXT: &str = "&#xe829;";
const DEFAULT_PREV: &str = "&#xe828;";
const DEFAULT_CLASS_NAME: &str = "nostrasponte-calendar-widget";

/// Calendar widget configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Base URL of the event API; `<url><year>/<month>` is requested
    pub url: Option<String>,

    /// Content of the "next month" button
    pub next: String,

    /// Content of the "previous month" button
    pub prev: String,

    /// Label for days with a single event
    pub event_string_singular: String,

    /// Label for days with several events, `$num` is replaced by the count
    pub event_string_plural: String,

    /// Label for days without events
    pub event_string_none: String,

    /// Base class name of the rendered table (BEM naming)
    pub class_name: String,

    /// Optional id of the rendered table
    pub id: Option<String>,

    /// Weekday names starting with Monday
    pub days: Vec<String>,

    /// Month names starting with January
    pub months: Vec<String>,

    /// HTTP timeout for event requests
    pub timeout_secs: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            url: None,
            next: DEFAULT_NEXT.to_string(),
            prev: DEFAULT_PREV.to_string(),
            event_string_singular: DEFAULT_EVENT_SINGULAR.to_string(),
            event_string_plural: DEFAULT_EVENT_PLURAL.to_string(),
            event_string_none: DEFAULT_EVENT_NONE.to_string(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
            id: None,
            days: to_strings(&DEFAULT_DAYS),
            months: to_strings(&DEFAULT_MONTHS),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// The value unless it is missing or blank, else the default
fn if_empty(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The names when there are exactly `expected` of them, else the defaults
fn names_or_default(
    field: &str,
    names: Option<Vec<String>>,
    expected: usize,
    default: &[&str],
) -> Vec<String> {
    match names {
        Some(names) if names.len() == expected => names,
        Some(names) => {
            warn!(
                "{} needs exactly {} entries, got {}; using defaults",
                field,
                expected,
                names.len()
            );
            to_strings(default)
        }
        None => to_strings(default),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).collect()
}

impl WidgetConfig {
    /// Replace `${VAR_NAME}` with the value of the environment variable
    ///
    /// Unknown variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file
    ///
    /// Environment variables take precedence over file values.
    ///
    /// # Errors
    /// `Error::Io` when the file cannot be read, `Error::Toml` when it is
    /// not valid TOML.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)?;

        let mut cfg = Self::from_toml_str(&Self::expand_env_vars(&toml_content))?;
        cfg.apply_env_overrides();

        debug!("Loaded configuration from {}", path.display());
        Ok(cfg)
    }

    /// Parse configuration from TOML text (no environment lookups)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let toml: TomlConfig = toml::from_str(content)?;
        Ok(Self::from_toml_config(toml))
    }

    /// Load from `ns-calendar.toml` when present, else from the environment
    pub fn load() -> Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Ok(Self::from_env())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    fn from_toml_config(toml: TomlConfig) -> Self {
        let api = toml.api.unwrap_or_default();
        let widget = toml.widget.unwrap_or_default();

        Self {
            url: non_empty(api.url),
            next: if_empty(widget.next, DEFAULT_NEXT),
            prev: if_empty(widget.prev, DEFAULT_PREV),
            event_string_singular: if_empty(widget.event_string_singular, DEFAULT_EVENT_SINGULAR),
            event_string_plural: if_empty(widget.event_string_plural, DEFAULT_EVENT_PLURAL),
            event_string_none: if_empty(widget.event_string_none, DEFAULT_EVENT_NONE),
            class_name: if_empty(widget.class_name, DEFAULT_CLASS_NAME),
            id: non_empty(widget.id),
            days: names_or_default("days", widget.days, 7, &DEFAULT_DAYS),
            months: names_or_default("months", widget.months, 12, &DEFAULT_MONTHS),
            timeout_secs: api.timeout_secs.unwrap_or_else(default_timeout_secs),
        }
    }

    /// Override settings from the process environment
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override settings from a key lookup; blank values are ignored
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("NS_CALENDAR_URL") {
            self.url = Some(url);
        }
        if let Some(next) = get("NS_CALENDAR_NEXT") {
            self.next = next;
        }
        if let Some(prev) = get("NS_CALENDAR_PREV") {
            self.prev = prev;
        }
        if let Some(label) = get("NS_CALENDAR_EVENT_SINGULAR") {
            self.event_string_singular = label;
        }
        if let Some(label) = get("NS_CALENDAR_EVENT_PLURAL") {
            self.event_string_plural = label;
        }
        if let Some(label) = get("NS_CALENDAR_EVENT_NONE") {
            self.event_string_none = label;
        }
        if let Some(class_name) = get("NS_CALENDAR_CLASS_NAME") {
            self.class_name = class_name;
        }
        if let Some(id) = get("NS_CALENDAR_ID") {
            self.id = Some(id);
        }
        if let Some(days) = get("NS_CALENDAR_DAYS") {
            self.days = names_or_default("NS_CALENDAR_DAYS", Some(split_list(&days)), 7, &DEFAULT_DAYS);
        }
        if let Some(months) = get("NS_CALENDAR_MONTHS") {
            self.months =
                names_or_default("NS_CALENDAR_MONTHS", Some(split_list(&months)), 12, &DEFAULT_MONTHS);
        }
        if let Some(timeout) = get("NS_CALENDAR_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid NS_CALENDAR_TIMEOUT_SECS: {}", timeout),
            }
        }
    }

    /// The event API base URL
    ///
    /// # Errors
    /// `Error::Config` when no URL is configured.
    pub fn require_url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| Error::Config("event API url not set (NS_CALENDAR_URL)".to_string()))
    }

    /// Names and labels derived from this configuration
    pub fn locale(&self) -> Locale {
        Locale {
            days: self.days.clone(),
            months: self.months.clone(),
            event_singular: self.event_string_singular.clone(),
            event_plural: self.event_string_plural.clone(),
            event_none: self.event_string_none.clone(),
        }
    }
}

// ============================================================================
// TOML file structure
// ============================================================================

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    api: Option<TomlApiConfig>,
    widget: Option<TomlWidgetConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlApiConfig {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlWidgetConfig {
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    prev: Option<String>,
    #[serde(default)]
    event_string_singular: Option<String>,
    #[serde(default)]
    event_string_plural: Option<String>,
    #[serde(default)]
    event_string_none: Option<String>,
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    days: Option<Vec<String>>,
    #[serde(default)]
    months: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_widget_config_default() {
        let config = WidgetConfig::default();
        assert!(config.url.is_none());
        assert_eq!(config.next, "&#xe829;");
        assert_eq!(config.prev, "&#xe828;");
        assert_eq!(config.event_string_singular, "Ein Termin");
        assert_eq!(config.event_string_plural, "$num Termine");
        assert_eq!(config.event_string_none, "Keine Termine");
        assert_eq!(config.class_name, "nostrasponte-calendar-widget");
        assert!(config.id.is_none());
        assert_eq!(config.days[0], "Montag");
        assert_eq!(config.months[11], "Dezember");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_toml_config_parsing() {
        let toml_content = r#"
[api]
url = "https://calendar.example.org/api/"
timeout_secs = 5

[widget]
next = ">"
prev = "<"
event_string_singular = "One event"
event_string_plural = "$num events"
event_string_none = "No events"
id = "calendar"
days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
months = ["January", "February", "March", "April", "May", "June", "July", "August", "September", "October", "November", "December"]
"#;

        let config = WidgetConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.url.as_deref(), Some("https://calendar.example.org/api/"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.next, ">");
        assert_eq!(config.event_string_plural, "$num events");
        assert_eq!(config.class_name, "nostrasponte-calendar-widget");
        assert_eq!(config.id.as_deref(), Some("calendar"));
        assert_eq!(config.days[6], "Sunday");
        assert_eq!(config.locale().month_name(2), "February");
    }

    #[test]
    fn test_wrong_name_counts_fall_back() {
        let toml_content = r#"
[widget]
days = ["Mo", "Di"]
months = []
next = ""
"#;
        let config = WidgetConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.days, to_strings(&DEFAULT_DAYS));
        assert_eq!(config.months, to_strings(&DEFAULT_MONTHS));
        assert_eq!(config.next, "&#xe829;");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(WidgetConfig::from_toml_str("").unwrap(), WidgetConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            WidgetConfig::from_toml_str("[api\nurl = 1"),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("NS_CALENDAR_URL", "https://override.example.org/"),
            ("NS_CALENDAR_DAYS", "Mo, Tu, We, Th, Fr, Sa, Su"),
            ("NS_CALENDAR_MONTHS", "Jan,Feb"),
            ("NS_CALENDAR_EVENT_NONE", "  "),
            ("NS_CALENDAR_TIMEOUT_SECS", "abc"),
        ]
        .into_iter()
        .collect();

        let mut config = WidgetConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.url.as_deref(), Some("https://override.example.org/"));
        assert_eq!(config.days[1], "Tu");
        assert_eq!(config.months, to_strings(&DEFAULT_MONTHS));
        assert_eq!(config.event_string_none, "Keine Termine");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_expand_env_vars() {
        unsafe {
            std::env::set_var("NS_CALENDAR_TEST_HOST", "calendar.example.org");
        }

        let result = WidgetConfig::expand_env_vars("https://${NS_CALENDAR_TEST_HOST}/api/");
        assert_eq!(result, "https://calendar.example.org/api/");

        let result = WidgetConfig::expand_env_vars("a_${NS_CALENDAR_TEST_MISSING}_b");
        assert_eq!(result, "a__b");

        assert_eq!(WidgetConfig::expand_env_vars("no_vars_here"), "no_vars_here");
        assert_eq!(WidgetConfig::expand_env_vars("${}_content"), "_content");

        unsafe {
            std::env::remove_var("NS_CALENDAR_TEST_HOST");
        }
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nurl = \"https://files.example.org/\"").unwrap();

        let config = WidgetConfig::from_toml_file(file.path()).unwrap();
        assert!(config.url.is_some());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            WidgetConfig::from_toml_file("/nonexistent/ns-calendar.toml"),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn test_require_url() {
        assert!(matches!(WidgetConfig::default().require_url(), Err(Error::Config(_))));

        let config = WidgetConfig {
            url: Some("https://x.example/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.require_url().unwrap(), "https://x.example/");
    }
}
