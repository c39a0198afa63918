//! Path management for envelope-rollover
//!
//! ## Path Resolution Order
//!
//! 1. `ROLLOVER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `envelope-rollover`
//!    (`~/.config/envelope-rollover` on Linux, `%APPDATA%` on Windows)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::RolloverError;
use crate::models::UserId;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "ROLLOVER_DATA_DIR";

/// Manages all paths used by envelope-rollover
#[derive(Debug, Clone)]
pub struct RolloverPaths {
    base_dir: PathBuf,
}

impl RolloverPaths {
    /// Resolve paths from the environment or the platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, RolloverError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "envelope-rollover")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    RolloverError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding per-user data (`<base>/data`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Directory holding one user's files (`<base>/data/<uid>`)
    pub fn user_dir(&self, uid: &UserId) -> PathBuf {
        self.data_dir().join(uid.as_str())
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Users that have a data directory, sorted
    ///
    /// Entries that are not valid user ids are skipped.
    pub fn user_ids(&self) -> Result<Vec<UserId>, RolloverError> {
        let entries = match std::fs::read_dir(self.data_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RolloverError::Io(format!(
                    "Failed to read data directory: {}",
                    e
                )))
            }
        };

        let mut users = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| RolloverError::Io(format!("Failed to read data directory: {}", e)))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(uid) = entry.file_name().to_str().and_then(|n| UserId::parse(n).ok()) {
                users.push(uid);
            }
        }
        users.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(users)
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), RolloverError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| RolloverError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| RolloverError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolloverPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_user_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolloverPaths::with_base_dir(temp_dir.path().to_path_buf());
        let uid = UserId::parse("alice").unwrap();

        assert_eq!(
            paths.user_dir(&uid),
            temp_dir.path().join("data").join("alice")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolloverPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_user_ids() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolloverPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert!(paths.user_ids().unwrap().is_empty());

        std::fs::create_dir_all(paths.data_dir().join("bob")).unwrap();
        std::fs::create_dir_all(paths.data_dir().join("alice")).unwrap();
        std::fs::write(paths.data_dir().join("notes.txt"), "x").unwrap();

        let users: Vec<String> = paths
            .user_ids()
            .unwrap()
            .iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(users, vec!["alice", "bob"]);
    }
}
