//! # Configuration
//!
//! Process-wide settings, with environment overrides.
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `RUNTIME_ISSUES_SUBSYSTEM` | `subsystem` | `com.apple.runtime-issues` |
//! | `RUNTIME_ISSUES_CATEGORY` | `default_category` | `Runtime issues` |
//! | `RUNTIME_ISSUES_TRUSTED_IMAGE` | `trusted_image` | `SwiftUI` (macOS), `libc` (elsewhere) |
//! | `RUNTIME_ISSUES_ENABLED` | `enabled` | `true` |
//!
//! Xcode only recognises runtime issues on the default subsystem, so
//! overriding it is mostly useful for filtering in Console.app.

use std::env;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::error::{IssueError, IssueResult};

/// Subsystem Xcode watches for runtime issues.
pub const RUNTIME_ISSUES_SUBSYSTEM: &str = "com.apple.runtime-issues";

/// Category of the shared default logger.
pub const DEFAULT_CATEGORY: &str = "Runtime issues";

/// Substring identifying the trusted image on this platform.
#[cfg(target_os = "macos")]
pub const DEFAULT_TRUSTED_IMAGE: &str = "SwiftUI";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_TRUSTED_IMAGE: &str = "libc";

const ENV_SUBSYSTEM: &str = "RUNTIME_ISSUES_SUBSYSTEM";
const ENV_CATEGORY: &str = "RUNTIME_ISSUES_CATEGORY";
const ENV_TRUSTED_IMAGE: &str = "RUNTIME_ISSUES_TRUSTED_IMAGE";
const ENV_ENABLED: &str = "RUNTIME_ISSUES_ENABLED";

static PROCESS_CONFIG: Lazy<Config> = Lazy::new(|| {
    Config::from_env().unwrap_or_else(|err| {
        warn!(error = %err, "Ignoring runtime issue environment overrides");
        Config::default()
    })
});

/// Runtime issue settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config
{
    /// Log subsystem every logger writes to
    pub subsystem: String,
    /// Category of [`crate::Logger::shared`]
    pub default_category: String,
    /// Substring of the trusted image name
    pub trusted_image: String,
    /// Initial enabled state of new loggers
    pub enabled: bool,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            subsystem: RUNTIME_ISSUES_SUBSYSTEM.to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
            trusted_image: DEFAULT_TRUSTED_IMAGE.to_string(),
            enabled: true,
        }
    }
}

impl Config
{
    /// Defaults with any `RUNTIME_ISSUES_*` overrides applied.
    ///
    /// Empty variables are treated as unset.
    ///
    /// ## Errors
    ///
    /// Returns [`IssueError::InvalidConfig`] if `RUNTIME_ISSUES_ENABLED` is
    /// not a recognised boolean.
    pub fn from_env() -> IssueResult<Self>
    {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    ///
    /// ## Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> IssueResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(subsystem) = lookup(ENV_SUBSYSTEM) {
            config.subsystem = subsystem;
        }
        if let Some(category) = lookup(ENV_CATEGORY) {
            config.default_category = category;
        }
        if let Some(trusted_image) = lookup(ENV_TRUSTED_IMAGE) {
            config.trusted_image = trusted_image;
        }
        if let Some(enabled) = lookup(ENV_ENABLED) {
            config.enabled = parse_bool(&enabled).ok_or(IssueError::InvalidConfig {
                key: ENV_ENABLED,
                value: enabled,
            })?;
        }

        Ok(config)
    }

    /// Configuration of this process, read from the environment once.
    pub fn process() -> &'static Config
    {
        &PROCESS_CONFIG
    }
}

fn parse_bool(value: &str) -> Option<bool>
{
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests
{
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String>
    {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults()
    {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.subsystem, "com.apple.runtime-issues");
        assert_eq!(config.default_category, "Runtime issues");
        assert!(config.enabled);
    }

    #[test]
    fn test_overrides()
    {
        let config = Config::from_lookup(lookup(&[
            ("RUNTIME_ISSUES_SUBSYSTEM", "com.example.issues"),
            ("RUNTIME_ISSUES_CATEGORY", "App"),
            ("RUNTIME_ISSUES_TRUSTED_IMAGE", "UIKitCore"),
            ("RUNTIME_ISSUES_ENABLED", "off"),
        ]))
        .unwrap();

        assert_eq!(config.subsystem, "com.example.issues");
        assert_eq!(config.default_category, "App");
        assert_eq!(config.trusted_image, "UIKitCore");
        assert!(!config.enabled);
    }

    #[test]
    fn test_empty_values_ignored()
    {
        let config = Config::from_lookup(lookup(&[("RUNTIME_ISSUES_TRUSTED_IMAGE", "  ")])).unwrap();
        assert_eq!(config.trusted_image, DEFAULT_TRUSTED_IMAGE);
    }

    #[test]
    fn test_invalid_bool()
    {
        let err = Config::from_lookup(lookup(&[("RUNTIME_ISSUES_ENABLED", "maybe")])).unwrap_err();
        assert_eq!(
            err,
            IssueError::InvalidConfig {
                key: "RUNTIME_ISSUES_ENABLED",
                value: "maybe".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_bool()
    {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("2"), None);
    }
}
