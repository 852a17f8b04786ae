// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared by the file-backed sources.

use crate::domain::{ConfigError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed size for configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
pub(crate) const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

fn file_label(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

/// Canonicalizes `path`, checks its size and reads it.
///
/// Returns the canonical path together with the file content.
pub(crate) fn read_config_file(source_name: &str, path: &Path) -> Result<(PathBuf, String)> {
    // Canonicalize path to prevent directory traversal attacks
    let canonical_path = path.canonicalize().map_err(|e| ConfigError::SourceError {
        source_name: source_name.to_string(),
        message: format!("Invalid or inaccessible path: {}", file_label(path)),
        source: Some(Box::new(e)),
    })?;

    let content = read_canonical(source_name, &canonical_path)?;
    Ok((canonical_path, content))
}

/// Reads a file that was already canonicalized, enforcing the size limit.
pub(crate) fn read_canonical(source_name: &str, path: &Path) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| ConfigError::SourceError {
        source_name: source_name.to_string(),
        message: format!("Failed to read file metadata: {}", file_label(path)),
        source: Some(Box::new(e)),
    })?;

    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::SourceError {
            source_name: source_name.to_string(),
            message: format!(
                "Configuration file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            ),
            source: None,
        });
    }

    fs::read_to_string(path).map_err(|e| ConfigError::SourceError {
        source_name: source_name.to_string(),
        message: format!("Failed to read configuration file: {}", file_label(path)),
        source: Some(Box::new(e)),
    })
}

/// Resolves `filename` inside the OS-appropriate configuration directory.
pub(crate) fn default_config_path(
    source_name: &str,
    app_name: &str,
    qualifier: &str,
    filename: &str,
) -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
            source_name: source_name.to_string(),
            message: "Failed to determine project directories".to_string(),
            source: None,
        })?;

    Ok(proj_dirs.config_dir().join(filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a = 1").unwrap();

        let (path, content) = read_config_file("test", file.path()).unwrap();
        assert_eq!(content, "a = 1");
        assert!(path.is_absolute());
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_config_file("test", Path::new("/nonexistent/config.ini"));
        match result {
            Err(ConfigError::SourceError { source_name, .. }) => assert_eq!(source_name, "test"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path_ends_with_filename() {
        if let Ok(path) = default_config_path("test", "treecfg-test", "com.example", "config.ini") {
            assert!(path.ends_with("config.ini"));
        }
    }
}
