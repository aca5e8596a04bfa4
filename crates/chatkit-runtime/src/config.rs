#![forbid(unsafe_code)]

//! Controller configuration.
//!
//! [`ControllerConfig`] gathers every knob of the panel-avoiding controller.
//! With the `config-files` feature it can be loaded from TOML or JSON:
//!
//! ```toml
//! # chatkit.toml
//! platform = "android"
//! behavior = "height"
//! vertical_offset = 48.0
//! min_animation_duration_ms = 16
//! ```
//!
//! ```rust,ignore
//! let config = ControllerConfig::from_toml_file("chatkit.toml")?;
//! ```
//!
//! # Defaults
//!
//! `ControllerConfig::default()` targets iOS with the platform's default
//! behavior, a 66.5 unit vertical offset (the message input toolbar),
//! compensation enabled, and a 10 ms animation floor.

#[cfg(feature = "config-files")]
use std::path::Path;

#[cfg(feature = "config-files")]
use serde::{Deserialize, Serialize};

use chatkit_core::{LifecycleState, Platform};
use web_time::Duration;

use crate::behavior::BehaviorVariant;
use crate::scheduler::DEFAULT_MIN_ANIMATION_DURATION;

/// Default vertical offset: height of the message input toolbar.
pub const DEFAULT_VERTICAL_OFFSET: f64 = 66.5;

/// Configuration of a panel-avoiding controller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct ControllerConfig {
    /// Host platform flavour.
    pub platform: Platform,

    /// Layout behavior; `None` picks the platform default.
    pub behavior: Option<BehaviorVariant>,

    /// Extra clearance kept above the panel's top edge.
    pub vertical_offset: f64,

    /// When false the applied offset is 0, though tracking continues.
    pub enabled: bool,

    /// Floor for animated commits, in milliseconds.
    pub min_animation_duration_ms: u64,

    /// Lifecycle state at mount.
    pub initial_lifecycle: LifecycleState,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            behavior: None,
            vertical_offset: DEFAULT_VERTICAL_OFFSET,
            enabled: true,
            min_animation_duration_ms: DEFAULT_MIN_ANIMATION_DURATION.as_millis() as u64,
            initial_lifecycle: LifecycleState::Foreground,
        }
    }
}

impl ControllerConfig {
    /// Defaults for `platform`.
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    /// Set the layout behavior.
    #[must_use]
    pub fn behavior(mut self, behavior: BehaviorVariant) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Set the vertical offset.
    #[must_use]
    pub fn vertical_offset(mut self, offset: f64) -> Self {
        self.vertical_offset = offset;
        self
    }

    /// Enable or disable compensation.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the animation floor.
    #[must_use]
    pub fn min_animation_duration(mut self, floor: Duration) -> Self {
        self.min_animation_duration_ms = floor.as_millis() as u64;
        self
    }

    /// Set the lifecycle state at mount.
    #[must_use]
    pub fn initial_lifecycle(mut self, state: LifecycleState) -> Self {
        self.initial_lifecycle = state;
        self
    }

    /// Behavior after applying the platform default.
    #[must_use]
    pub fn resolved_behavior(&self) -> BehaviorVariant {
        self.behavior
            .unwrap_or_else(|| BehaviorVariant::default_for(self.platform))
    }

    /// Animation floor as a duration.
    #[must_use]
    pub fn min_animation_duration_value(&self) -> Duration {
        Duration::from_millis(self.min_animation_duration_ms)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.vertical_offset.is_finite() {
            errors.push(format!(
                "vertical_offset must be finite, got {}",
                self.vertical_offset
            ));
        }
        if self.min_animation_duration_ms > 60_000 {
            errors.push(format!(
                "min_animation_duration_ms must be at most 60000, got {}",
                self.min_animation_duration_ms
            ));
        }
        errors
    }

    /// Copy with invalid values replaced by defaults.
    ///
    /// Mounting never fails; it uses this instead of [`validate`](Self::validate).
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !self.vertical_offset.is_finite() {
            self.vertical_offset = DEFAULT_VERTICAL_OFFSET;
        }
        self.min_animation_duration_ms = self.min_animation_duration_ms.min(60_000);
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config-files")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSer)
    }

    #[cfg(feature = "config-files")]
    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a [`ControllerConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config-files")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::TomlSer(e) => write!(f, "TOML serialization error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_toolbar_and_floor() {
        let config = ControllerConfig::default();
        assert_eq!(config.platform, Platform::Ios);
        assert_eq!(config.vertical_offset, 66.5);
        assert!(config.enabled);
        assert_eq!(config.min_animation_duration_value(), Duration::from_millis(10));
        assert_eq!(config.initial_lifecycle, LifecycleState::Foreground);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn behavior_defaults_per_platform() {
        assert_eq!(
            ControllerConfig::new(Platform::Ios).resolved_behavior(),
            BehaviorVariant::Pad
        );
        assert_eq!(
            ControllerConfig::new(Platform::Android).resolved_behavior(),
            BehaviorVariant::Reposition
        );
        assert_eq!(
            ControllerConfig::new(Platform::Android)
                .behavior(BehaviorVariant::Resize)
                .resolved_behavior(),
            BehaviorVariant::Resize
        );
    }

    #[test]
    fn builder_sets_fields() {
        let config = ControllerConfig::new(Platform::Android)
            .vertical_offset(0.0)
            .enabled(false)
            .min_animation_duration(Duration::from_millis(16))
            .initial_lifecycle(LifecycleState::Background);
        assert_eq!(config.vertical_offset, 0.0);
        assert!(!config.enabled);
        assert_eq!(config.min_animation_duration_ms, 16);
        assert_eq!(config.initial_lifecycle, LifecycleState::Background);
    }

    #[test]
    fn validate_flags_non_finite_offset() {
        let config = ControllerConfig::default().vertical_offset(f64::INFINITY);
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("vertical_offset"));
        assert_eq!(config.sanitized().vertical_offset, DEFAULT_VERTICAL_OFFSET);
    }

    #[test]
    fn validation_error_display() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
    }
}
