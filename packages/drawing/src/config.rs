//! Map configuration.
//!
//! Loaded from TOML. Every field has a default, so a partial file only
//! needs the values it changes. The defaults live in
//! `config/default.toml`, which is embedded as [`DEFAULT_CONFIG_TOML`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The default configuration file, embedded at compile time.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Errors that can occur when loading a [`MapConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid config value for {field}: {message}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        message: String,
    },
}

/// Corner of the map a control is anchored to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Placement of the map controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPositions {
    pub zoom: ControlPosition,
    pub base_layers: ControlPosition,
    /// Whether the base layer switcher starts collapsed.
    pub base_layers_collapsed: bool,
    pub geolocation: ControlPosition,
    pub scale: ControlPosition,
    pub zoom_viewer: ControlPosition,
}

impl Default for ControlPositions {
    fn default() -> Self {
        Self {
            zoom: ControlPosition::TopRight,
            base_layers: ControlPosition::TopRight,
            base_layers_collapsed: true,
            geolocation: ControlPosition::TopRight,
            scale: ControlPosition::BottomLeft,
            zoom_viewer: ControlPosition::BottomRight,
        }
    }
}

/// A marker image and where it is pinned.
///
/// `anchor` is the pixel of the image that sits on the coordinate,
/// measured from its top-left corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub url: String,
    pub size: [u32; 2],
    pub anchor: [u32; 2],
}

impl MarkerIcon {
    fn pin(url: &str) -> Self {
        Self {
            url: url.to_string(),
            size: [33, 42],
            anchor: [16, 42],
        }
    }
}

/// Marker icons by observation category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerIcons {
    /// The observation being drawn.
    pub new_observation: MarkerIcon,
    pub observation: MarkerIcon,
    /// Observations brought in from an external source.
    pub imported_observation: MarkerIcon,
}

impl Default for MarkerIcons {
    fn default() -> Self {
        Self {
            new_observation: MarkerIcon::pin("assets/pointer-blue2.png"),
            observation: MarkerIcon::pin("assets/pointer-green.png"),
            imported_observation: MarkerIcon::pin("assets/pointer-orange.png"),
        }
    }
}

/// Stroke styles for drawn shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingStyles {
    /// Color of the shape while it is being drawn.
    pub pending_color: String,
    /// Color of a finished shape.
    pub committed_color: String,
    pub imported_color: String,
    /// Dash length of the rubber band, in pixels.
    pub rubber_band_dash: u32,
    pub program_area_color: String,
    pub program_area_dash: u32,
}

impl Default for DrawingStyles {
    fn default() -> Self {
        Self {
            pending_color: "#11aa9e".to_string(),
            committed_color: "#60b15c".to_string(),
            imported_color: "#ff6600".to_string(),
            rubber_band_dash: 6,
            program_area_color: "red".to_string(),
            program_area_dash: 4,
        }
    }
}

/// Configuration of the observation map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Clicks below this zoom level are rejected.
    pub min_capture_zoom: f64,
    /// Snap tolerance, in screen pixels.
    pub snap_distance_px: f64,
    /// How long a zoom warning stays active.
    pub zoom_warning_timeout_ms: u64,
    pub geolocation_high_accuracy: bool,
    pub controls: ControlPositions,
    pub icons: MarkerIcons,
    pub styles: DrawingStyles,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            min_capture_zoom: 15.0,
            snap_distance_px: crate::snap::SNAP_DISTANCE_PX,
            zoom_warning_timeout_ms: 400,
            geolocation_high_accuracy: false,
            controls: ControlPositions::default(),
            icons: MarkerIcons::default(),
            styles: DrawingStyles::default(),
        }
    }
}

impl MapConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Toml`] if the text is not a valid configuration
    /// * [`ConfigError::Invalid`] if a value is out of range
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`MapConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded map config from {}", path.display());
        Ok(config)
    }

    /// Checks that values are in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.snap_distance_px.is_finite() || self.snap_distance_px <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "snap_distance_px",
                message: format!("must be a positive number, got {}", self.snap_distance_px),
            });
        }
        if !self.min_capture_zoom.is_finite() || self.min_capture_zoom < 0.0 {
            return Err(ConfigError::Invalid {
                field: "min_capture_zoom",
                message: format!("must be zero or more, got {}", self.min_capture_zoom),
            });
        }
        Ok(())
    }
}
