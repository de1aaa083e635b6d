//! Query-time retrieval and answer orchestration

mod orchestrator;

pub use orchestrator::{Retrieval, RetrievalOrchestrator, SupportingChunk};
