//! Runtime configuration for bindery applications.
//!
//! [`Settings`] holds the small set of knobs the engine itself cares about
//! (debug mode, log level, template directory) plus an escape hatch for
//! application-defined values. A globally-accessible [`LazySettings`]
//! instance is configured once at startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{BinderyError, BinderyResult};

/// The complete set of application settings.
///
/// All fields have sensible defaults, so a TOML file only needs to spell out
/// what it overrides.
///
/// # Examples
///
/// ```
/// use bindery_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether debug mode is enabled. Controls log formatting and the
    /// verbosity of error responses.
    pub debug: bool,
    /// The log level filter (e.g. "info", "debug", "bindery_views=trace").
    pub log_level: String,
    /// Directory searched by the template renderer, if one is configured.
    pub template_dir: Option<PathBuf>,
    /// Application-defined settings that don't fit the above.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            template_dir: None,
            extra: HashMap::new(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML string. Fields absent from the TOML keep
    /// their default values.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the TOML is malformed.
    pub fn from_toml_str(toml_str: &str) -> BinderyResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| BinderyError::Configuration(format!("failed to parse settings TOML: {e}")))
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> BinderyResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup, then read the
/// settings anywhere via [`get`](LazySettings::get).
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
///
/// Call `SETTINGS.configure(settings)` once at application startup, then
/// access settings via `SETTINGS.get()` anywhere.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert!(s.template_dir.is_none());
        assert!(s.extra.is_empty());
    }

    #[test]
    fn test_from_toml_str() {
        let s = Settings::from_toml_str(
            r#"
            debug = false
            log_level = "warn"
            template_dir = "templates"
            "#,
        )
        .expect("valid TOML");
        assert!(!s.debug);
        assert_eq!(s.log_level, "warn");
        assert_eq!(s.template_dir, Some(PathBuf::from("templates")));
    }

    #[test]
    fn test_from_toml_str_partial_keeps_defaults() {
        let s = Settings::from_toml_str("log_level = \"debug\"").expect("valid TOML");
        assert!(s.debug);
        assert_eq!(s.log_level, "debug");
    }

    #[test]
    fn test_from_toml_str_extra_table() {
        let s = Settings::from_toml_str(
            r#"
            [extra]
            renewal_window_weeks = 4
            "#,
        )
        .expect("valid TOML");
        assert_eq!(
            s.extra.get("renewal_window_weeks"),
            Some(&serde_json::json!(4))
        );
    }

    #[test]
    fn test_from_toml_str_malformed() {
        let err = Settings::from_toml_str("debug = ").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_lazy_settings_configure_and_get() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());

        lazy.configure(Settings {
            debug: false,
            ..Settings::default()
        });

        assert!(lazy.is_configured());
        assert!(!lazy.get().debug);
    }

    #[test]
    #[should_panic(expected = "already been configured")]
    fn test_lazy_settings_double_configure_panics() {
        let lazy = LazySettings::new();
        lazy.configure(Settings::default());
        lazy.configure(Settings::default());
    }

    #[test]
    #[should_panic(expected = "not been configured")]
    fn test_lazy_settings_get_before_configure_panics() {
        let lazy = LazySettings::new();
        let _ = lazy.get();
    }
}
