//! Result store
//!
//! Holds term -> paper numbers in discovery order and rewrites the whole
//! snapshot on disk after every new match. The in-memory map is the source
//! of truth; a failed write is logged and the next successful one catches up.

use crate::config::SnapshotFormat;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Term -> paper numbers where it was found
pub type ResultSet = BTreeMap<String, Vec<u64>>;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to encode results: {0}")]
    Encode(String),

    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct ResultStore {
    results: ResultSet,
    path: PathBuf,
    format: SnapshotFormat,
}

impl ResultStore {
    /// Every term starts with an empty list so the snapshot always names the full term set.
    pub fn new<S: AsRef<str>>(terms: &[S], path: impl Into<PathBuf>, format: SnapshotFormat) -> Self {
        let results = terms
            .iter()
            .map(|t| (t.as_ref().to_string(), Vec::new()))
            .collect();

        Self {
            results,
            path: path.into(),
            format,
        }
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_recorded(&self, term: &str, id: u64) -> bool {
        self.results
            .get(term)
            .is_some_and(|ids| ids.contains(&id))
    }

    /// Append `id` under `term` unless already there, then persist.
    ///
    /// Returns whether anything was appended. Nothing is written for a repeat.
    pub fn record(&mut self, term: &str, id: u64) -> bool {
        let ids = self.results.entry(term.to_string()).or_default();
        if ids.contains(&id) {
            return false;
        }
        ids.push(id);

        self.save();
        true
    }

    /// Persist, logging instead of failing
    pub fn save(&self) -> bool {
        match self.persist() {
            Ok(()) => true,
            Err(e) => {
                log::error!("[ERROR]: Could not save results to {}: {}", self.path.display(), e);
                false
            }
        }
    }

    /// Overwrite the snapshot with the full current state.
    ///
    /// Written to a temporary file next to the target and renamed over it,
    /// so readers never see a half-written snapshot.
    pub fn persist(&self) -> Result<(), PersistError> {
        let bytes = encode(&self.results, self.format)?;
        let io_err = |source| PersistError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Same mode a plain create would get (0666 minus umask), not tempfile's 0600
        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }

        let mut tmp = builder.tempfile_in(dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        Ok(())
    }
}

pub fn encode(results: &ResultSet, format: SnapshotFormat) -> Result<Vec<u8>, PersistError> {
    match format {
        SnapshotFormat::Binary => {
            bincode::serialize(results).map_err(|e| PersistError::Encode(e.to_string()))
        }
        SnapshotFormat::Json => {
            serde_json::to_vec_pretty(results).map_err(|e| PersistError::Encode(e.to_string()))
        }
    }
}

/// Read a snapshot written by [`ResultStore::persist`]
pub fn load(path: &Path, format: SnapshotFormat) -> Result<ResultSet, PersistError> {
    let bytes = std::fs::read(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decode_err = |message: String| PersistError::Decode {
        path: path.to_path_buf(),
        message,
    };

    match format {
        SnapshotFormat::Binary => bincode::deserialize(&bytes).map_err(|e| decode_err(e.to_string())),
        SnapshotFormat::Json => serde_json::from_slice(&bytes).map_err(|e| decode_err(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_terms_start_empty() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(&["growth", "inflation"], dir.path().join("r.bin"), SnapshotFormat::Binary);

        assert_eq!(store.results().len(), 2);
        assert!(store.results().values().all(Vec::is_empty));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_record_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = ResultStore::new(&["growth"], dir.path().join("r.bin"), SnapshotFormat::Binary);

        assert!(store.record("growth", 100));
        assert!(!store.record("growth", 100));
        assert!(store.record("growth", 105));
        assert!(store.is_recorded("growth", 100));
        assert_eq!(store.results()["growth"], vec![100, 105]);
    }

    #[test]
    fn test_record_writes_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.bin");
        let mut store = ResultStore::new(&["growth", "inflation"], &path, SnapshotFormat::Binary);

        store.record("inflation", 7);
        let loaded = load(&path, SnapshotFormat::Binary).unwrap();
        assert_eq!(&loaded, store.results());
        assert_eq!(loaded["inflation"], vec![7]);
        assert!(loaded["growth"].is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.json");
        let mut store = ResultStore::new(&["growth", "wage gap"], &path, SnapshotFormat::Json);
        store.record("growth", 3);
        store.record("wage gap", 1);
        store.record("growth", 2);

        let loaded = load(&path, SnapshotFormat::Json).unwrap();
        assert_eq!(&loaded, store.results());
        assert_eq!(loaded["growth"], vec![3, 2]);
    }

    #[test]
    fn test_snapshot_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.bin");
        std::fs::write(&path, b"stale contents from an earlier run").unwrap();

        let mut store = ResultStore::new(&["growth"], &path, SnapshotFormat::Binary);
        store.record("growth", 1);
        assert_eq!(load(&path, SnapshotFormat::Binary).unwrap(), *store.results());
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        let missing_dir = dir.path().join("not-yet");
        let path = missing_dir.join("r.bin");
        let mut store = ResultStore::new(&["growth"], &path, SnapshotFormat::Binary);

        assert!(store.record("growth", 1));
        assert!(matches!(store.persist(), Err(PersistError::Io { .. })));
        assert_eq!(store.results()["growth"], vec![1]);

        std::fs::create_dir(&missing_dir).unwrap();
        assert!(store.record("growth", 2));
        assert_eq!(load(&path, SnapshotFormat::Binary).unwrap()["growth"], vec![1, 2]);
    }

    #[cfg(unix)]
    #[test]
    fn test_snapshot_mode_follows_umask() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("plain.txt");
        std::fs::write(&reference, b"x").unwrap();

        let path = dir.path().join("r.bin");
        let mut store = ResultStore::new(&["growth"], &path, SnapshotFormat::Binary);
        store.record("growth", 1);

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(path.as_path()), mode(reference.as_path()));
    }

    #[test]
    fn test_load_rejects_wrong_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.bin");
        std::fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(
            load(&path, SnapshotFormat::Json),
            Err(PersistError::Decode { .. })
        ));
    }
}
