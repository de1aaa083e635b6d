//! Content-addressed blob store with hash-based deduplication
//!
//! Raw document bytes are persisted under a freshly allocated storage id;
//! the ledger entry written afterwards is the commit point. A blob orphaned
//! by a crash before the ledger write is harmless and cleanable; the reverse
//! (ledger entry without a blob) cannot happen.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};

use super::ledger::{IngestionLedger, LedgerPut};

/// Result of storing document bytes
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// SHA-256 hex digest of the bytes
    pub content_hash: String,
    /// Storage id the bytes live under; the existing one for duplicates
    pub storage_id: String,
    /// Whether the bytes were already known
    pub is_duplicate: bool,
}

/// Blob store keyed by storage id, deduplicated through the ledger
pub struct ContentStore {
    blob_dir: PathBuf,
    ledger: Arc<IngestionLedger>,
    max_bytes: usize,
}

impl ContentStore {
    /// Create a content store over the given blob directory and ledger
    pub fn new(blob_dir: impl Into<PathBuf>, ledger: Arc<IngestionLedger>, max_bytes: usize) -> Result<Self> {
        let blob_dir = blob_dir.into();
        std::fs::create_dir_all(&blob_dir)?;
        Ok(Self {
            blob_dir,
            ledger,
            max_bytes,
        })
    }

    /// Compute the SHA-256 hex digest of a byte sequence
    pub fn content_hash(bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(bytes))
    }

    /// Store document bytes, deduplicating by content hash
    ///
    /// Duplicates perform no write and return the existing storage id.
    pub fn put(&self, bytes: &[u8]) -> Result<StoredBlob> {
        if bytes.len() > self.max_bytes {
            return Err(Error::PayloadTooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }

        let content_hash = Self::content_hash(bytes);

        if let Some(existing) = self.ledger.get(&content_hash)? {
            return Ok(StoredBlob {
                content_hash,
                storage_id: existing,
                is_duplicate: true,
            });
        }

        let storage_id = Self::allocate_storage_id();
        let path = self.blob_path(&storage_id);
        std::fs::write(&path, bytes)?;

        match self.ledger.put(&content_hash, &storage_id)? {
            LedgerPut::Committed => Ok(StoredBlob {
                content_hash,
                storage_id,
                is_duplicate: false,
            }),
            LedgerPut::AlreadyPresent(winner) => {
                // Lost the race against a concurrent identical upload; our
                // blob is an orphan now.
                let _ = std::fs::remove_file(&path);
                Ok(StoredBlob {
                    content_hash,
                    storage_id: winner,
                    is_duplicate: true,
                })
            }
        }
    }

    /// Read back the raw bytes for a storage id
    pub fn get(&self, storage_id: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(storage_id);
        std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::DocumentNotFound(storage_id.to_string())
            } else {
                Error::Io(e)
            }
        })
    }

    /// Filesystem path a storage id maps to
    pub fn blob_path(&self, storage_id: &str) -> PathBuf {
        self.blob_dir.join(storage_id)
    }

    /// Blob directory root
    pub fn blob_dir(&self) -> &Path {
        &self.blob_dir
    }

    /// Allocate a fresh storage id: time-ordered prefix plus random suffix
    fn allocate_storage_id() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}_{}.pdf", Utc::now().timestamp(), &suffix[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(IngestionLedger::in_memory().unwrap());
        let store = ContentStore::new(dir.path().join("pdfs"), ledger, 1024).unwrap();
        (dir, store)
    }

    fn blob_count(store: &ContentStore) -> usize {
        std::fs::read_dir(store.blob_dir()).unwrap().count()
    }

    #[test]
    fn identical_bytes_deduplicate() {
        let (_dir, store) = store();

        let first = store.put(b"session record").unwrap();
        assert!(!first.is_duplicate);
        assert_eq!(blob_count(&store), 1);

        let second = store.put(b"session record").unwrap();
        assert!(second.is_duplicate);
        assert_eq!(second.storage_id, first.storage_id);
        assert_eq!(second.content_hash, first.content_hash);
        // No new blob written for the duplicate.
        assert_eq!(blob_count(&store), 1);
    }

    #[test]
    fn hash_is_stable_and_collision_sensitive() {
        assert_eq!(
            ContentStore::content_hash(b"same bytes"),
            ContentStore::content_hash(b"same bytes"),
        );
        assert_ne!(
            ContentStore::content_hash(b"same bytes"),
            ContentStore::content_hash(b"same byteS"),
        );
    }

    #[test]
    fn oversize_payload_rejected_before_write() {
        let (_dir, store) = store();
        let oversized = vec![0u8; 2048];

        let err = store.put(&oversized).unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { size: 2048, .. }));
        assert_eq!(blob_count(&store), 0);
    }

    #[test]
    fn stored_bytes_read_back() {
        let (_dir, store) = store();
        let blob = store.put(b"round trip").unwrap();
        assert_eq!(store.get(&blob.storage_id).unwrap(), b"round trip");
    }

    #[test]
    fn missing_blob_reports_not_found() {
        let (_dir, store) = store();
        let err = store.get("nope.pdf").unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(_)));
    }
}
