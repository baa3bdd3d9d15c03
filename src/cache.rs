//! Persisted track store.
//!
//! The artifact is a short magic prefix followed by the bincode encoding of a
//! [`TrackStore`]. Any decoding or validation failure is reported as
//! [`Error::CorruptedCache`]; callers must not fall back to recomputation.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::tracks::TrackStore;

const MAGIC: &[u8; 4] = b"CTK1";

/// Encode a store into the artifact format.
pub fn encode(store: &TrackStore) -> Result<Vec<u8>> {
    let body = bincode::serde::encode_to_vec(store, bincode::config::standard())
        .map_err(|e| Error::Serialization(e.to_string()))?;
    let mut bytes = Vec::with_capacity(MAGIC.len() + body.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode and validate an artifact. `path` is only used for error reporting.
pub fn decode(bytes: &[u8], path: &Path) -> Result<TrackStore> {
    let corrupted = |reason: String| Error::CorruptedCache {
        path: path.to_path_buf(),
        reason,
    };

    let body = bytes
        .strip_prefix(MAGIC.as_slice())
        .ok_or_else(|| corrupted("missing header".to_string()))?;

    let (store, read): (TrackStore, usize) =
        bincode::serde::decode_from_slice(body, bincode::config::standard())
            .map_err(|e| corrupted(e.to_string()))?;
    if read != body.len() {
        return Err(corrupted(format!(
            "{} trailing bytes after track store",
            body.len() - read
        )));
    }

    store.validate().map_err(corrupted)?;
    Ok(store)
}

/// Write a store to `path`, creating parent directories.
pub fn save(store: &TrackStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let bytes = encode(store)?;
    fs::write(path, &bytes)?;
    info!(
        path = %path.display(),
        bytes = bytes.len(),
        frames = store.frame_count(),
        "Saved track cache"
    );
    Ok(())
}

/// Read a store from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<TrackStore> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    decode_loaded(&bytes, path)
}

/// Read a store from `path`, or `None` when no file exists there.
///
/// Any other read failure, such as missing permissions, is an error.
pub fn load_if_present(path: impl AsRef<Path>) -> Result<Option<TrackStore>> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No track cache");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    decode_loaded(&bytes, path).map(Some)
}

fn decode_loaded(bytes: &[u8], path: &Path) -> Result<TrackStore> {
    let store = decode(bytes, path)?;
    info!(path = %path.display(), frames = store.frame_count(), "Loaded track cache");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracks::{BoundingBox, ObjectKind, TrackRecord};

    fn sample() -> TrackStore {
        let mut store = TrackStore::new(2);
        store.insert(
            ObjectKind::Player,
            1,
            4,
            TrackRecord::new(BoundingBox::new(1.0, 2.0, 3.0, 4.0)),
        );
        store
    }

    #[test]
    fn test_decode_rejects_bad_header() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            decode(&bytes, Path::new("x.bin")),
            Err(Error::CorruptedCache { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncation_and_trailing_bytes() {
        let bytes = encode(&sample()).unwrap();
        assert!(decode(&bytes[..bytes.len() - 3], Path::new("x.bin")).is_err());

        let mut longer = bytes.clone();
        longer.push(0);
        assert!(decode(&longer, Path::new("x.bin")).is_err());

        assert_eq!(decode(&bytes, Path::new("x.bin")).unwrap(), sample());
    }

    #[test]
    fn test_missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bin");
        assert!(load_if_present(&path).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        // A directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_if_present(dir.path()), Err(Error::Io(_))));
    }

    #[test]
    fn test_decode_rejects_invalid_structure() {
        // A ball frame keyed by an id other than the ball id
        let mut store = TrackStore::new(1);
        store.insert(ObjectKind::Ball, 0, 9, TrackRecord::default());
        let bytes = encode(&store).unwrap();
        assert!(matches!(
            decode(&bytes, Path::new("x.bin")),
            Err(Error::CorruptedCache { .. })
        ));
    }
}
