//! Durable storage: ingestion ledger, blob store and chunk previews

mod content_store;
mod ledger;
mod preview;

pub use content_store::{ContentStore, StoredBlob};
pub use ledger::{IngestionLedger, LedgerPut};
pub use preview::PreviewStore;
