//! Configuration types for glyphview.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    #[error("Invalid size '{0}': expected WIDTHxHEIGHT")]
    InvalidSize(String),

    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Configuration error: {0}")]
    Invalid(String),
}

/// An RGB color written as `#RRGGBB` (the `#` is optional).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }
        let value =
            u32::from_str_radix(hex, 16).map_err(|_| ConfigError::InvalidColor(s.to_string()))?;
        Ok(Self([(value >> 16) as u8, (value >> 8) as u8, value as u8]))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Output size for resampled previews, written as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Size {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidSize(s.to_string());
        let (width, height) = s.split_once(|c: char| c == 'x' || c == 'X').ok_or_else(invalid)?;
        Ok(Self {
            width: width.trim().parse().map_err(|_| invalid())?,
            height: height.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Complete glyphview configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where and how previews are written.
    #[serde(default)]
    pub output: OutputConfig,
    /// How glyphs are decoded.
    #[serde(default)]
    pub render: RenderConfig,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one PNG per asset.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Color behind transparent pixels and around the glyph.
    #[serde(default = "default_background")]
    pub background: Rgb,
    /// Background border added on every side, in pixels.
    #[serde(default)]
    pub margin: u32,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_background() -> Rgb {
    Rgb([0xFF, 0xFF, 0xFF])
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            background: default_background(),
            margin: 0,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Use the selected (highlighted) palette.
    #[serde(default)]
    pub selected: bool,
    /// Resample every glyph to this size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Size>,
    /// Color treated as transparent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<Rgb>,
    /// Worker threads; 0 picks one per core.
    #[serde(default)]
    pub parallelism: usize,
}

/// Upper bound on worker threads.
pub const MAX_PARALLELISM: usize = 256;

/// Largest accepted output edge, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

impl Config {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Loads a configuration file. Missing sections take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "Output directory cannot be empty".to_string(),
            ));
        }

        if self.output.margin > MAX_DIMENSION {
            return Err(ConfigError::Invalid(format!(
                "Margin must be at most {MAX_DIMENSION}"
            )));
        }

        if let Some(size) = self.render.scale {
            if size.width == 0 || size.height == 0 {
                return Err(ConfigError::Invalid(
                    "Scale size cannot have a zero dimension".to_string(),
                ));
            }
            if size.width > MAX_DIMENSION || size.height > MAX_DIMENSION {
                return Err(ConfigError::Invalid(format!(
                    "Scale size must be at most {MAX_DIMENSION}x{MAX_DIMENSION}"
                )));
            }
        }

        if self.render.parallelism > MAX_PARALLELISM {
            return Err(ConfigError::Invalid(format!(
                "Parallelism must be at most {MAX_PARALLELISM}"
            )));
        }

        Ok(())
    }
}

/// Builder for creating a `Config`.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Starts from an existing configuration.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.output.directory = directory.into();
        self
    }

    #[must_use]
    pub fn background(mut self, background: Rgb) -> Self {
        self.config.output.background = background;
        self
    }

    #[must_use]
    pub fn margin(mut self, margin: u32) -> Self {
        self.config.output.margin = margin;
        self
    }

    #[must_use]
    pub fn selected(mut self, selected: bool) -> Self {
        self.config.render.selected = selected;
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: Size) -> Self {
        self.config.render.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn transparent(mut self, transparent: Rgb) -> Self {
        self.config.render.transparent = Some(transparent);
        self
    }

    #[must_use]
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        self.config.render.parallelism = parallelism;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
