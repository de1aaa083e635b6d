//! Provider abstractions for embeddings, generation and the vector index
//!
//! The pipeline depends on these traits only; any local or remote model can
//! be substituted behind the same contract, which is also how the tests
//! inject deterministic stubs.

pub mod embedding;
pub mod generation;
pub mod memory;
pub mod ollama;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use generation::GenerationProvider;
pub use memory::InMemoryVectorIndex;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaGenerator};
pub use vector_index::{IndexEntry, ScoredEntry, VectorIndexProvider};
