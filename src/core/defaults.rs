use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Library manifest used when neither `--library` nor the config names one.
pub const DEFAULT_LIBRARY: &str = "media-library.json";

/// Root configuration structure for mediacase.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MediacaseConfig {
    /// Default media library manifest path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<PathBuf>,
}

/// Load the mediacase.json config, falling back to defaults on any error.
pub fn load_config() -> MediacaseConfig {
    paths::mediacase_json()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_default()
}

/// Attempt to load config from a specific file.
pub fn load_config_from(path: &Path) -> crate::Result<MediacaseConfig> {
    if !path.exists() {
        return Err(crate::Error::other(format!(
            "{} not found",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))
}

/// Pick the library manifest: explicit flag, then config, then the built-in default.
pub fn resolve_library(explicit: Option<&Path>, config: &MediacaseConfig) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.library.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LIBRARY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_explicit_flag() {
        let config = MediacaseConfig {
            library: Some(PathBuf::from("/srv/site/library.json")),
        };
        assert_eq!(
            resolve_library(Some(Path::new("./other.json")), &config),
            PathBuf::from("./other.json")
        );
    }

    #[test]
    fn resolve_falls_back_to_config_then_default() {
        let config = MediacaseConfig {
            library: Some(PathBuf::from("/srv/site/library.json")),
        };
        assert_eq!(
            resolve_library(None, &config),
            PathBuf::from("/srv/site/library.json")
        );
        assert_eq!(
            resolve_library(None, &MediacaseConfig::default()),
            PathBuf::from(DEFAULT_LIBRARY)
        );
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mediacase.json");
        fs::write(&path, r#"{"library": "/srv/uploads/library.json"}"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.library, Some(PathBuf::from("/srv/uploads/library.json")));
    }

    #[test]
    fn load_config_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mediacase.json");
        fs::write(&path, "{").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigInvalidJson);
    }

    #[test]
    fn load_config_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(&dir.path().join("absent.json")).is_err());
    }
}
