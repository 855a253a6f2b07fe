//! Configuration file handling for bayer-bitmap.
//!
//! Loads configuration from `~/.config/bayer-bitmap/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bitmap::DEFAULT_MATRIX_SIZE;
use crate::image_io::{ResizeFilter, DEFAULT_MAX_HEIGHT};

/// Configuration file structure for bayer-bitmap.
/// Loaded from ~/.config/bayer-bitmap/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub dither: DitherConfig,
    #[serde(default)]
    pub resize: ResizeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct DitherConfig {
    #[serde(default = "default_matrix_size")]
    pub matrix_size: usize,
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            matrix_size: default_matrix_size(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ResizeConfig {
    #[serde(default = "default_max_height")]
    pub max_height: u32,
    #[serde(default)]
    pub filter: ResizeFilter,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            max_height: default_max_height(),
            filter: ResizeFilter::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub save_resized: bool,
}

fn default_matrix_size() -> usize {
    DEFAULT_MATRIX_SIZE
}

fn default_max_height() -> u32 {
    DEFAULT_MAX_HEIGHT
}

/// Effective conversion settings after merging file values and CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub matrix_size: usize,
    pub max_height: u32,
    pub filter: ResizeFilter,
    pub save_resized: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().settings()
    }
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            Self::load_explicit(&path)
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Load configuration from a path given on the command line.
    /// The file must exist.
    pub fn load_explicit(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::parse(&content, path)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML content. `path` is only used for error reporting.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn settings(&self) -> Settings {
        Settings {
            matrix_size: self.dither.matrix_size,
            max_height: self.resize.max_height,
            filter: self.resize.filter,
            save_resized: self.output.save_resized,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    AlreadyExists {
        path: PathBuf,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::AlreadyExists { path } => {
                write!(
                    f,
                    "Config file already exists: {}\nUse 'bayer-bitmap config show' to view current settings.",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::AlreadyExists { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("bayer-bitmap").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/bayer-bitmap/config.toml")
        })
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# bayer-bitmap configuration

[dither]
# Bayer matrix size, a power of two >= 2
matrix_size = 16

[resize]
# Output height in pixels (one bit per printer dot)
max_height = 384
# nearest | triangle | catmull-rom | gaussian | lanczos3
filter = "lanczos3"

[output]
# Save the resized input next to the source image as <name>resized.<ext>
save_resized = false
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Config::default().settings();
        assert_eq!(settings.matrix_size, 16);
        assert_eq!(settings.max_height, 384);
        assert_eq!(settings.filter, ResizeFilter::Lanczos3);
        assert!(!settings.save_resized);
    }

    #[test]
    fn test_default_config_template_parses_to_defaults() {
        let config = Config::parse(DEFAULT_CONFIG, Path::new("template.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse("[dither]\nmatrix_size = 4\n", Path::new("c.toml")).unwrap();
        assert_eq!(config.dither.matrix_size, 4);
        assert_eq!(config.resize.max_height, 384);
    }

    #[test]
    fn test_filter_names() {
        let config = Config::parse(
            "[resize]\nfilter = \"catmull-rom\"\nmax_height = 100\n",
            Path::new("c.toml"),
        )
        .unwrap();
        assert_eq!(config.resize.filter, ResizeFilter::CatmullRom);
        assert_eq!(config.resize.max_height, 100);
    }

    #[test]
    fn test_malformed_config() {
        let err = Config::parse("[dither\nmatrix_size = ", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_load_missing_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("missing.toml").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_explicit_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_explicit(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nsave_resized = true").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.output.save_resized);
    }
}
