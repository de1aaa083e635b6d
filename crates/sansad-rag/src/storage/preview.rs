//! Chunk preview area: truncated chunk text persisted per chunk id
//!
//! Previews are a storage-cost bound only; the full chunk text is what gets
//! embedded and indexed.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Filesystem store for chunk text previews
pub struct PreviewStore {
    dir: PathBuf,
    max_chars: usize,
}

impl PreviewStore {
    /// Create a preview store in the given directory
    pub fn new(dir: impl Into<PathBuf>, max_chars: usize) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, max_chars })
    }

    /// Write the truncated preview for a chunk
    pub fn write(&self, chunk_id: &str, text: &str) -> Result<()> {
        let preview = truncate_chars(text, self.max_chars);
        std::fs::write(self.path(chunk_id), preview)?;
        Ok(())
    }

    /// Read a preview back, if present
    pub fn read(&self, chunk_id: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(chunk_id)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn path(&self, chunk_id: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", chunk_id))
    }

    /// Preview directory root
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Truncate to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previews_are_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreviewStore::new(dir.path(), 10).unwrap();

        store.write("doc.pdf.chunk0", "a very long chunk body").unwrap();
        let preview = store.read("doc.pdf.chunk0").unwrap().unwrap();
        assert_eq!(preview, "a very lon");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("नमस्ते दुनिया", 6), "नमस्ते");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn missing_preview_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreviewStore::new(dir.path(), 10).unwrap();
        assert!(store.read("absent.chunk0").unwrap().is_none());
    }
}
