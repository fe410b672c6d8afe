use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base mediacase config directory (universal ~/.config/mediacase/ on all platforms)
pub fn mediacase() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("mediacase"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("mediacase"))
    }
}

/// Global mediacase.json config file path
pub fn mediacase_json() -> Result<PathBuf> {
    Ok(mediacase()?.join("mediacase.json"))
}
