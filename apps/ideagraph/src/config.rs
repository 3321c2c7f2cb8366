//! # Configuration Loading
//!
//! Reads a [`CanvasConfig`] from a TOML file.
//!
//! The path comes from `--config`, else from `IDEAGRAPH_CONFIG`. With
//! neither set the built-in defaults apply. Keys absent from the file keep
//! their defaults:
//!
//! ```toml
//! default_input_mode = "ai"
//!
//! [layout]
//! gap = 32.0
//! max_row_width = 1200.0
//!
//! [duplicate_offset]
//! x = 24.0
//! y = 24.0
//! ```

use ideagraph_core::{CanvasConfig, CanvasError};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "IDEAGRAPH_CONFIG";

/// Pick the config file: explicit path first, then the environment.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Parse and validate a TOML config.
pub fn parse_config(text: &str) -> Result<CanvasConfig, CanvasError> {
    let config: CanvasConfig =
        toml::from_str(text).map_err(|e| CanvasError::InvalidConfig(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config.
pub fn load_config(explicit: Option<&Path>) -> Result<CanvasConfig, CanvasError> {
    let Some(path) = resolve_config_path(explicit) else {
        return Ok(CanvasConfig::default());
    };
    tracing::debug!(path = %path.display(), "loading config");
    let text = std::fs::read_to_string(&path).map_err(|e| {
        CanvasError::Io(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    parse_config(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideagraph_core::InputMode;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            default_input_mode = "ai"

            [layout]
            gap = 32.0
            "#,
        )
        .expect("valid config");

        assert_eq!(config.default_input_mode, InputMode::Ai);
        assert_eq!(config.layout.gap, 32.0);
        assert_eq!(config.layout.padding, CanvasConfig::default().layout.padding);
        assert_eq!(config.duplicate_offset, CanvasConfig::default().duplicate_offset);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = parse_config("[layout]\nmax_row_width = -5.0\n");
        assert!(matches!(err, Err(CanvasError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(matches!(
            parse_config("layout = ["),
            Err(CanvasError::InvalidConfig(_))
        ));
    }

    #[test]
    fn explicit_path_wins() {
        let explicit = Path::new("/tmp/explicit.toml");
        assert_eq!(
            resolve_config_path(Some(explicit)),
            Some(explicit.to_path_buf())
        );
    }
}
