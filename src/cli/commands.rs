//! Subcommand handlers and CLI/config merging.

use std::path::Path;

use super::args::{Args, ConfigAction};
use crate::config::{default_path, Config, ConfigError, Settings, DEFAULT_CONFIG};

/// Load the config file named on the command line, or the default one.
///
/// An explicit path must exist; a missing default file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_explicit(path),
        None => Config::load(None),
    }
}

/// Merge CLI flags over config file values.
pub fn resolve_settings(args: &Args, config: &Config) -> Settings {
    let base = config.settings();
    Settings {
        matrix_size: args.matrix_size.unwrap_or(base.matrix_size),
        max_height: args.max_height.unwrap_or(base.max_height),
        filter: args.filter.map(Into::into).unwrap_or(base.filter),
        save_resized: args.save_resized || base.save_resized,
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Show => {
            let config = load_config(path)?;
            let settings = config.settings();
            println!("Current configuration:");
            println!("  Matrix size:  {}", settings.matrix_size);
            println!("  Max height:   {}", settings.max_height);
            println!("  Filter:       {}", settings.filter);
            println!(
                "  Save resized: {}",
                if settings.save_resized { "yes" } else { "no" }
            );
            println!();

            let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_path);
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_path);
            init_config(&config_path)?;
            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}

/// Write the default config file, refusing to overwrite an existing one.
pub fn init_config(config_path: &Path) -> Result<(), ConfigError> {
    if config_path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: config_path.to_path_buf(),
        });
    }

    let io_err = |e: std::io::Error| ConfigError::IoError {
        path: config_path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG).map_err(io_err)?;
    log::debug!("Wrote default config to {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::BitmapError;
    use crate::image_io::ResizeFilter;
    use crate::pipeline::Converter;
    use clap::Parser;

    #[test]
    fn test_cli_overrides_config() {
        let config = Config::parse(
            "[dither]\nmatrix_size = 4\n[resize]\nmax_height = 100\n",
            Path::new("c.toml"),
        )
        .unwrap();
        let args = Args::parse_from([
            "bayer-bitmap", "-i", "a", "-o", "b", "-m", "8", "--filter", "nearest",
        ]);
        let settings = resolve_settings(&args, &config);
        assert_eq!(settings.matrix_size, 8);
        assert_eq!(settings.max_height, 100);
        assert_eq!(settings.filter, ResizeFilter::Nearest);
        assert!(!settings.save_resized);
    }

    #[test]
    fn test_config_save_resized_kept_without_flag() {
        let config = Config::parse("[output]\nsave_resized = true\n", Path::new("c.toml")).unwrap();
        let args = Args::parse_from(["bayer-bitmap", "-i", "a", "-o", "b"]);
        assert!(resolve_settings(&args, &config).save_resized);
    }

    #[test]
    fn test_oversized_matrix_from_config_is_rejected() {
        let config = Config::parse("[dither]\nmatrix_size = 131072\n", Path::new("c.toml")).unwrap();
        let args = Args::parse_from(["bayer-bitmap", "-i", "a", "-o", "b"]);
        let settings = resolve_settings(&args, &config);
        assert_eq!(settings.matrix_size, 131072);
        assert!(matches!(
            Converter::new(settings.matrix_size),
            Err(BitmapError::InvalidParameter { name: "matrix_size", .. })
        ));
    }

    #[test]
    fn test_init_config_writes_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        init_config(&path).unwrap();
        assert_eq!(Config::load_explicit(&path).unwrap(), Config::default());

        let err = init_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists { .. }));
    }

    #[test]
    fn test_load_config_explicit_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.toml");
        assert!(load_config(Some(missing.as_path())).is_err());
    }
}
