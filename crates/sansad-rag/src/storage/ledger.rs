//! SQLite-backed ingestion ledger and document registry
//!
//! The ledger maps content hashes to storage ids and is the commit point of
//! ingestion: an entry is only written after the blob it references exists
//! on disk. Writes use a conflict-ignoring insert so concurrent ingestion of
//! identical bytes resolves to a single storage id.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::Document;

/// Outcome of a ledger put
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerPut {
    /// This caller's entry won; the mapping is now durable
    Committed,
    /// Another entry already holds this hash; contains the winning storage id
    AlreadyPresent(String),
}

/// Durable ledger keyed by content hash, plus the document registry
pub struct IngestionLedger {
    conn: Arc<Mutex<Connection>>,
}

impl IngestionLedger {
    /// Create or open the ledger database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| Error::Ledger(format!("Failed to open ledger: {}", e)))?;
        let ledger = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        ledger.migrate()?;
        Ok(ledger)
    }

    /// Create an in-memory ledger (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Ledger(format!("Failed to open in-memory ledger: {}", e)))?;
        let ledger = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        ledger.migrate()?;
        Ok(ledger)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        // WAL mode for concurrent readers during ingestion writes
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
        "#,
        )
        .map_err(|e| Error::Ledger(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS ledger (
                content_hash TEXT PRIMARY KEY,
                storage_id TEXT NOT NULL,
                committed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS documents (
                storage_id TEXT PRIMARY KEY,
                content_hash TEXT NOT NULL,
                source TEXT,
                language TEXT NOT NULL,
                needs_ocr INTEGER NOT NULL,
                num_chunks INTEGER NOT NULL,
                ingested_at TEXT NOT NULL,
                metadata TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_documents_content_hash
                ON documents(content_hash);
        "#,
        )
        .map_err(|e| Error::Ledger(format!("Failed to run migrations: {}", e)))?;

        Ok(())
    }

    /// Look up the storage id for a content hash
    pub fn get(&self, content_hash: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let storage_id = conn
            .query_row(
                "SELECT storage_id FROM ledger WHERE content_hash = ?1",
                params![content_hash],
                |row| row.get(0),
            )
            .optional()?;
        Ok(storage_id)
    }

    /// Record a content-hash -> storage-id mapping
    ///
    /// The insert ignores conflicts on the hash, so the first writer wins;
    /// a losing caller gets back the winning storage id and must treat its
    /// own blob as an orphan.
    pub fn put(&self, content_hash: &str, storage_id: &str) -> Result<LedgerPut> {
        let conn = self.conn.lock();
        let inserted = conn.execute(
            "INSERT INTO ledger (content_hash, storage_id, committed_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(content_hash) DO NOTHING",
            params![content_hash, storage_id, Utc::now().to_rfc3339()],
        )?;

        if inserted == 1 {
            return Ok(LedgerPut::Committed);
        }

        let existing: String = conn.query_row(
            "SELECT storage_id FROM ledger WHERE content_hash = ?1",
            params![content_hash],
            |row| row.get(0),
        )?;
        Ok(LedgerPut::AlreadyPresent(existing))
    }

    /// Persist a document record after its ledger entry is committed
    pub fn record_document(&self, document: &Document) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO documents
             (storage_id, content_hash, source, language, needs_ocr, num_chunks, ingested_at, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                document.storage_id,
                document.content_hash,
                document.source,
                document.language,
                document.needs_ocr as i64,
                document.num_chunks as i64,
                document.ingested_at.to_rfc3339(),
                serde_json::to_string(&document.metadata)?,
            ],
        )?;
        Ok(())
    }

    /// Fetch a document record by storage id
    pub fn get_document(&self, storage_id: &str) -> Result<Option<Document>> {
        let conn = self.conn.lock();
        let document = conn
            .query_row(
                "SELECT storage_id, content_hash, source, language, needs_ocr, num_chunks,
                        ingested_at, metadata
                 FROM documents WHERE storage_id = ?1",
                params![storage_id],
                row_to_document,
            )
            .optional()?;
        Ok(document)
    }

    /// List all document records, newest first
    pub fn list_documents(&self) -> Result<Vec<Document>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT storage_id, content_hash, source, language, needs_ocr, num_chunks,
                    ingested_at, metadata
             FROM documents ORDER BY ingested_at DESC",
        )?;
        let rows = stmt.query_map([], row_to_document)?;
        let mut documents = Vec::new();
        for row in rows {
            documents.push(row?);
        }
        Ok(documents)
    }
}

fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
    let ingested_at: String = row.get(6)?;
    let metadata: String = row.get(7)?;
    Ok(Document {
        storage_id: row.get(0)?,
        content_hash: row.get(1)?,
        source: row.get(2)?,
        language: row.get(3)?,
        needs_ocr: row.get::<_, i64>(4)? != 0,
        num_chunks: row.get::<_, i64>(5)? as u32,
        ingested_at: ingested_at
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
        metadata: serde_json::from_str::<HashMap<String, String>>(&metadata)
            .unwrap_or_default(),
    })
}
