//! Tool configuration module.
//!
//! Handles loading and validating `imgfit.toml`. All settings are optional;
//! a missing file means stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! format = "jpeg"           # jpeg | png | webp
//! quality = 80              # Lossy encoding quality (1-100)
//!
//! [search]
//! scale_step = 0.1          # Upscale search increment
//! scale_ceiling = 5.0       # Largest upscale factor tried
//!
//! [editor]
//! handle_hit_radius = 11.0  # On-screen handle grab distance (canvas px)
//! zoom_min = 0.2
//! zoom_max = 4.0
//! ```
//!
//! Config files are sparse — override just the values you want. Unknown
//! keys are rejected to catch typos early.

use crate::params::{OutputFormat, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `imgfit.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Output encoding settings (format, quality).
    pub output: OutputConfig,
    /// Target-size search settings.
    pub search: SearchConfig,
    /// Interactive editor settings.
    pub editor: EditorConfig,
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.quality == 0 || self.output.quality > 100 {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.search.scale_step <= 0.0 {
            return Err(ConfigError::Validation(
                "search.scale_step must be positive".into(),
            ));
        }
        if self.search.scale_ceiling <= 1.0 {
            return Err(ConfigError::Validation(
                "search.scale_ceiling must be greater than 1".into(),
            ));
        }
        if self.editor.handle_hit_radius <= 0.0 {
            return Err(ConfigError::Validation(
                "editor.handle_hit_radius must be positive".into(),
            ));
        }
        if self.editor.zoom_min <= 0.0 || self.editor.zoom_min > self.editor.zoom_max {
            return Err(ConfigError::Validation(
                "editor zoom bounds must satisfy 0 < zoom_min <= zoom_max".into(),
            ));
        }
        Ok(())
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format when the CLI does not specify one.
    pub format: OutputFormat,
    /// Lossy encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: Quality::default().value(),
        }
    }
}

impl OutputConfig {
    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }
}

/// Target-size search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Increment between upscale factors tried by the scale search.
    pub scale_step: f64,
    /// Largest upscale factor the scale search will try.
    pub scale_ceiling: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scale_step: 0.1,
            scale_ceiling: 5.0,
        }
    }
}

/// Interactive editor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// On-screen distance within which a pointer grabs a handle (canvas px).
    pub handle_hit_radius: f64,
    /// Zoom bounds applied on top of the fit-to-viewport scale.
    pub zoom_min: f64,
    pub zoom_max: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            handle_hit_radius: crate::interaction::HANDLE_HIT_RADIUS,
            zoom_min: crate::projector::ZOOM_MIN,
            zoom_max: crate::projector::ZOOM_MAX,
        }
    }
}

/// Load config from `imgfit.toml` in the given directory.
///
/// A missing file yields stock defaults; an invalid file is an error.
/// Unknown keys are rejected and the result is validated.
pub fn load_config(root: &Path) -> Result<ToolConfig, ConfigError> {
    let config_path = root.join("imgfit.toml");
    if !config_path.exists() {
        return Ok(ToolConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: ToolConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `imgfit.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgfit Configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output encoding
# ---------------------------------------------------------------------------
[output]
# Default output format: "jpeg", "png", or "webp".
# PNG and WebP are encoded losslessly; quality only affects JPEG.
format = "jpeg"

# Lossy encoding quality (1 = worst, 100 = best).
quality = 80

# ---------------------------------------------------------------------------
# Target-size search
# ---------------------------------------------------------------------------
[search]
# Increment between upscale factors tried when growing an image toward a
# minimum size target.
scale_step = 0.1

# Largest upscale factor the search will try before giving up.
scale_ceiling = 5.0

# ---------------------------------------------------------------------------
# Interactive editor
# ---------------------------------------------------------------------------
[editor]
# On-screen distance within which a pointer grabs a selection handle,
# in canvas pixels (independent of zoom).
handle_hit_radius = 11.0

# Zoom bounds applied on top of the fit-to-viewport scale.
zoom_min = 0.2
zoom_max = 4.0
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ToolConfig::default();
        assert_eq!(config.output.format, OutputFormat::Jpeg);
        assert_eq!(config.output.quality, 80);
        assert_eq!(config.search.scale_step, 0.1);
        assert_eq!(config.search.scale_ceiling, 5.0);
        assert_eq!(config.editor.handle_hit_radius, 11.0);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[output]
quality = 70
"#;
        let config: ToolConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.output.quality, 70);
        // Default values preserved
        assert_eq!(config.output.format, OutputFormat::Jpeg);
        assert_eq!(config.search.scale_ceiling, 5.0);
    }

    #[test]
    fn parse_format_names() {
        let toml = r#"
[output]
format = "webp"
"#;
        let config: ToolConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.output.format, OutputFormat::Webp);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.output.quality, 80);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("imgfit.toml"),
            r#"
[search]
scale_step = 0.25
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.search.scale_step, 0.25);
        // Unspecified values should be defaults
        assert_eq!(config.search.scale_ceiling, 5.0);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("imgfit.toml"), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("imgfit.toml"),
            r#"
[output]
quality = 200
"#,
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[output]
qualty = 90
"#;
        let result: Result<ToolConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = r#"
[outputs]
quality = 90
"#;
        let result: Result<ToolConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(ToolConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = ToolConfig::default();
        config.output.quality = 100;
        assert!(config.validate().is_ok());

        config.output.quality = 0;
        assert!(config.validate().is_err());

        config.output.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_scale_step_positive() {
        let mut config = ToolConfig::default();
        config.search.scale_step = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_scale_ceiling_above_one() {
        let mut config = ToolConfig::default();
        config.search.scale_ceiling = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zoom_bounds_ordered() {
        let mut config = ToolConfig::default();
        config.editor.zoom_min = 5.0;
        config.editor.zoom_max = 4.0;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let content = stock_config_toml();
        let config: ToolConfig = toml::from_str(content).unwrap();
        assert_eq!(config.output.quality, 80);
        assert_eq!(config.output.format, OutputFormat::Jpeg);
        assert_eq!(config.search.scale_step, 0.1);
        assert_eq!(config.search.scale_ceiling, 5.0);
        assert_eq!(config.editor.handle_hit_radius, 11.0);
        assert_eq!(config.editor.zoom_min, 0.2);
        assert_eq!(config.editor.zoom_max, 4.0);
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("[output]"));
        assert!(content.contains("[search]"));
        assert!(content.contains("[editor]"));
    }
}
