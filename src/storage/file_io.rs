//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::RolloverError;

fn store_err(msg: String) -> RolloverError {
    RolloverError::StoreUnavailable(msg)
}

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, RolloverError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    Ok(read_json_optional(path)?.unwrap_or_default())
}

/// Read JSON from a file, returning `None` if the file doesn't exist
pub fn read_json_optional<T, P>(path: P) -> Result<Option<T>, RolloverError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)
        .map_err(|e| store_err(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map(Some)
        .map_err(|e| store_err(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Serialize `data` into a uniquely named temp file next to `path`
///
/// Each writer gets its own temp file, so concurrent writers to the same
/// target never share one.
fn write_temp<T: Serialize>(path: &Path, data: &T) -> Result<NamedTempFile, RolloverError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| {
        store_err(format!(
            "Failed to create directory {}: {}",
            parent.display(),
            e
        ))
    })?;

    // Same directory as the target so persisting stays on one filesystem
    let temp = NamedTempFile::new_in(parent)
        .map_err(|e| store_err(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(temp.as_file());
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| store_err(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| store_err(format!("Failed to flush data: {}", e)))?;
    drop(writer);

    temp.as_file()
        .sync_all()
        .map_err(|e| store_err(format!("Failed to sync data: {}", e)))?;

    Ok(temp)
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), RolloverError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp = write_temp(path, data)?;

    // A failed persist drops the temp file, which removes it
    temp.persist(path)
        .map_err(|e| store_err(format!("Failed to rename temp file: {}", e.error)))?;

    Ok(())
}

/// Write JSON to a file only if it does not exist yet
///
/// Returns `Ok(false)` without touching the existing file when the target is
/// already present. The fully written temp file is moved into place with a
/// no-clobber persist, so of two writers racing for the same path exactly
/// one succeeds and the file holds that writer's data.
pub fn create_json_exclusive<T, P>(path: P, data: &T) -> Result<bool, RolloverError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }

    let temp = write_temp(path, data)?;
    match temp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(store_err(format!(
            "Failed to create {}: {}",
            path.display(),
            e.error
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample(value: i32) -> TestData {
        TestData {
            name: "test".to_string(),
            value,
        }
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: TestData = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(data, TestData::default());

        let none: Option<TestData> =
            read_json_optional(temp_dir.path().join("missing.json")).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_write_and_read_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("test.json");

        write_json_atomic(&path, &sample(42)).unwrap();

        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(loaded, sample(42));
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_invalid_json_is_store_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();

        let err = read_json::<TestData, _>(&path).unwrap_err();
        assert!(err.is_store_unavailable());
    }

    #[test]
    fn test_create_exclusive_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("record.json");

        assert!(create_json_exclusive(&path, &sample(1)).unwrap());
        assert!(!create_json_exclusive(&path, &sample(2)).unwrap());

        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(loaded.value, 1);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        values: Vec<u8>,
    }

    #[test]
    fn test_create_exclusive_race_has_one_winner() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        let temp_dir = TempDir::new().unwrap();

        for round in 0..50 {
            let path = temp_dir.path().join(format!("race-{}.json", round));
            let barrier = Arc::new(Barrier::new(2));

            let handles: Vec<_> = [1u8, 2u8]
                .into_iter()
                .map(|fill| {
                    let path = path.clone();
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        let payload = Payload {
                            values: vec![fill; 20_000],
                        };
                        barrier.wait();
                        (fill, create_json_exclusive(&path, &payload))
                    })
                })
                .collect();

            let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            let winners: Vec<u8> = results
                .iter()
                .filter_map(|(fill, result)| match result {
                    Ok(true) => Some(*fill),
                    Ok(false) => None,
                    Err(e) => panic!("writer failed: {}", e),
                })
                .collect();
            assert_eq!(winners.len(), 1, "round {}", round);

            let stored: Payload = read_json_optional(&path).unwrap().unwrap();
            assert_eq!(stored.values, vec![winners[0]; 20_000], "round {}", round);
        }

        // Only the target files remain; every temp file was cleaned up
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 50);
    }

    #[test]
    fn test_atomic_writes_from_two_threads_leave_one_whole_file() {
        use std::thread;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared.json");

        let handles: Vec<_> = [1u8, 2u8]
            .into_iter()
            .map(|fill| {
                let path = path.clone();
                thread::spawn(move || {
                    for _ in 0..20 {
                        write_json_atomic(
                            &path,
                            &Payload {
                                values: vec![fill; 5_000],
                            },
                        )
                        .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored: Payload = read_json_optional(&path).unwrap().unwrap();
        assert!(stored.values.iter().all(|v| *v == stored.values[0]));
        assert_eq!(stored.values.len(), 5_000);
    }
}
