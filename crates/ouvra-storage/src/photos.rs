// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device photo file area.
//!
//! Photos captured for an offline report are written here synchronously at
//! enqueue time, so the in-memory bytes do not have to survive a process
//! restart. Each file is read once during replay and may be purged after
//! the upload is acknowledged.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use ouvra_core::{OuvraError, PhotoRef};

/// File store for locally buffered photos.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    /// Open the photo area rooted at `root`, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, OuvraError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| photo_err("creating photo area", &root, e))?;
        Ok(Self { root })
    }

    /// Write raw photo bytes under `name`. Returns the reference stored in
    /// the queued action.
    pub fn save(&self, name: &str, bytes: &[u8]) -> Result<PhotoRef, OuvraError> {
        let path = self.path_for(name)?;
        fs::write(&path, bytes).map_err(|e| photo_err("writing photo", &path, e))?;
        debug!(name, size = bytes.len(), "photo buffered");
        Ok(PhotoRef(name.to_string()))
    }

    /// Write a photo delivered in the device capture encoding (base64).
    pub fn save_base64(&self, name: &str, data: &str) -> Result<PhotoRef, OuvraError> {
        let bytes = BASE64.decode(data).map_err(|e| OuvraError::Photo {
            message: format!("invalid base64 photo data for `{name}`"),
            source: Some(Box::new(e)),
        })?;
        self.save(name, &bytes)
    }

    /// Read a buffered photo back for replay.
    pub fn read(&self, photo: &PhotoRef) -> Result<Vec<u8>, OuvraError> {
        let path = self.path_for(&photo.0)?;
        fs::read(&path).map_err(|e| photo_err("reading photo", &path, e))
    }

    /// Delete a buffered photo after its upload was acknowledged.
    pub fn remove(&self, photo: &PhotoRef) -> Result<(), OuvraError> {
        let path = self.path_for(&photo.0)?;
        fs::remove_file(&path).map_err(|e| photo_err("removing photo", &path, e))?;
        debug!(name = %photo, "photo purged");
        Ok(())
    }

    /// Whether a buffered photo exists.
    pub fn contains(&self, photo: &PhotoRef) -> bool {
        self.path_for(&photo.0)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    /// Resolve a stored name inside the photo area.
    ///
    /// Names are flat filenames; separators and parent references are
    /// rejected so a corrupted queue payload cannot escape the area.
    fn path_for(&self, name: &str) -> Result<PathBuf, OuvraError> {
        if name.is_empty()
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(OuvraError::Photo {
                message: format!("invalid photo name `{name}`"),
                source: None,
            });
        }
        Ok(self.root.join(name))
    }
}

fn photo_err(what: &str, path: &Path, e: std::io::Error) -> OuvraError {
    OuvraError::Photo {
        message: format!("{what} at {}", path.display()),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = PhotoStore::open(dir.path().join("photos")).unwrap();

        let photo = store.save("rapport_1.jpg", b"\xff\xd8\xff\xe0jpeg").unwrap();
        assert!(store.contains(&photo));
        assert_eq!(store.read(&photo).unwrap(), b"\xff\xd8\xff\xe0jpeg");
    }

    #[test]
    fn save_base64_decodes_capture_payload() {
        let dir = tempdir().unwrap();
        let store = PhotoStore::open(dir.path()).unwrap();

        let photo = store.save_base64("p.jpg", "aGVsbG8=").unwrap();
        assert_eq!(store.read(&photo).unwrap(), b"hello");
    }

    #[test]
    fn save_base64_rejects_garbage() {
        let dir = tempdir().unwrap();
        let store = PhotoStore::open(dir.path()).unwrap();
        assert!(store.save_base64("p.jpg", "not base64 !!").is_err());
    }

    #[test]
    fn remove_purges_the_file() {
        let dir = tempdir().unwrap();
        let store = PhotoStore::open(dir.path()).unwrap();

        let photo = store.save("p.jpg", b"data").unwrap();
        store.remove(&photo).unwrap();
        assert!(!store.contains(&photo));
        assert!(store.read(&photo).is_err());
    }

    #[test]
    fn path_traversal_names_are_rejected() {
        let dir = tempdir().unwrap();
        let store = PhotoStore::open(dir.path()).unwrap();

        for name in ["../escape.jpg", "a/b.jpg", "a\\b.jpg", ""] {
            assert!(store.save(name, b"x").is_err(), "accepted `{name}`");
        }
    }

    #[test]
    fn missing_photo_read_is_an_error() {
        let dir = tempdir().unwrap();
        let store = PhotoStore::open(dir.path()).unwrap();
        let err = store.read(&PhotoRef("absent.jpg".into())).unwrap_err();
        assert!(matches!(err, OuvraError::Photo { .. }));
    }
}
