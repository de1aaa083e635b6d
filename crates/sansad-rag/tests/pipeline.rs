//! End-to-end pipeline tests with deterministic stub ports

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as PdfDocument, Object, Stream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sansad_rag::config::RagConfig;
use sansad_rag::error::{Error, Result};
use sansad_rag::pipeline::RagPipeline;
use sansad_rag::providers::{
    EmbeddingProvider, GenerationProvider, InMemoryVectorIndex, VectorIndexProvider,
};
use sansad_rag::types::{AnswerStatus, IngestStatus};

/// Deterministic embedder: folds bytes into a fixed-length vector
struct StubEmbedder;

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; 8];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % 8] += byte as f32 / 255.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        8
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Generator that counts invocations and returns a canned answer
struct CountingGenerator {
    calls: AtomicUsize,
}

impl CountingGenerator {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for CountingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("- the session discussed the budget\n- date not specified".to_string())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "counting"
    }

    fn model(&self) -> &str {
        "stub"
    }
}

/// Generator that always fails, for the generation-error path
struct FailingGenerator;

#[async_trait]
impl GenerationProvider for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::Generation("model quota exhausted".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "stub"
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    pipeline: RagPipeline,
    index: Arc<InMemoryVectorIndex>,
    generator: Arc<CountingGenerator>,
}

fn harness() -> Harness {
    harness_with(CountingGenerator::new())
}

fn harness_with(generator: Arc<CountingGenerator>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let mut config = RagConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();

    let index = Arc::new(InMemoryVectorIndex::new());
    let pipeline = RagPipeline::new(
        &config,
        Arc::new(StubEmbedder),
        index.clone(),
        generator.clone(),
    )
    .unwrap();

    Harness {
        _dir: dir,
        pipeline,
        index,
        generator,
    }
}

/// Build a PDF with one text page per entry in `pages`
fn build_pdf(pages: &[String]) -> Vec<u8> {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// `total` numbered words split across three pages
fn three_page_pdf(total: usize) -> Vec<u8> {
    let per_page = total.div_ceil(3);
    let words: Vec<String> = (0..total).map(|i| format!("word{}", i)).collect();
    let pages: Vec<String> = words
        .chunks(per_page)
        .map(|page| page.join(" "))
        .collect();
    build_pdf(&pages)
}

fn blob_count(data_dir: &std::path::Path) -> usize {
    std::fs::read_dir(data_dir.join("pdfs")).unwrap().count()
}

#[tokio::test]
async fn reingesting_identical_bytes_is_idempotent() {
    let h = harness();
    let bytes = three_page_pdf(500);

    let first = h
        .pipeline
        .ingest(bytes.clone(), Some("sansad.in".to_string()))
        .await
        .unwrap();
    assert_eq!(first.status, IngestStatus::Ingested);

    let second = h
        .pipeline
        .ingest(bytes, Some("another label".to_string()))
        .await
        .unwrap();
    assert_eq!(second.status, IngestStatus::Duplicate);
    assert_eq!(second.storage_id, first.storage_id);
    assert_eq!(second.content_hash, first.content_hash);

    // No second blob, no extra index entries.
    assert_eq!(blob_count(h._dir.path()), 1);
    assert_eq!(
        h.index.len().await.unwrap(),
        first.num_chunks,
        "duplicate ingestion must not re-index chunks"
    );
}

#[tokio::test]
async fn three_page_document_chunks_into_four_windows() {
    let h = harness();
    let bytes = three_page_pdf(1000);

    let summary = h.pipeline.ingest(bytes, None).await.unwrap();

    assert_eq!(summary.status, IngestStatus::Ingested);
    assert!(!summary.needs_ocr);
    assert_eq!(summary.next_step, "ready_for_embedding");
    // 1000 words, windows of 400 at stride 320: offsets 0/320/640/960.
    assert_eq!(summary.num_chunks, 4);
    assert_eq!(
        summary.chunk_ids,
        (0..4)
            .map(|i| format!("{}.chunk{}", summary.storage_id, i))
            .collect::<Vec<_>>()
    );
    assert_eq!(h.pipeline.indexed_chunks().await.unwrap(), 4);
}

#[tokio::test]
async fn empty_extraction_flags_document_for_ocr() {
    let h = harness();
    // A page with no text at all.
    let bytes = build_pdf(&[String::new()]);

    let summary = h.pipeline.ingest(bytes, None).await.unwrap();

    assert_eq!(summary.status, IngestStatus::Ingested);
    assert!(summary.needs_ocr);
    assert_eq!(summary.next_step, "ocr_required");
    assert_eq!(summary.num_chunks, 0);
    assert!(summary.chunk_ids.is_empty());
    assert_eq!(h.pipeline.indexed_chunks().await.unwrap(), 0);
}

#[tokio::test]
async fn unparseable_bytes_flag_document_for_ocr() {
    let h = harness();

    let summary = h
        .pipeline
        .ingest(b"definitely not a pdf".to_vec(), None)
        .await
        .unwrap();

    assert_eq!(summary.status, IngestStatus::Ingested);
    assert!(summary.needs_ocr);
    assert_eq!(summary.next_step, "ocr_required");
    assert_eq!(summary.num_chunks, 0);
}

#[tokio::test]
async fn oversize_upload_rejected_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = RagConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();
    config.storage.max_document_size = 64;

    let pipeline = RagPipeline::new(
        &config,
        Arc::new(StubEmbedder),
        Arc::new(InMemoryVectorIndex::new()),
        CountingGenerator::new(),
    )
    .unwrap();

    let err = pipeline.ingest(vec![0u8; 128], None).await.unwrap_err();
    assert!(matches!(err, Error::PayloadTooLarge { size: 128, .. }));
    assert_eq!(blob_count(dir.path()), 0);
}

#[tokio::test]
async fn query_with_empty_index_never_invokes_generation() {
    let h = harness();

    let summary = h
        .pipeline
        .ask("what was discussed in the session?", 5)
        .await
        .unwrap();

    assert_eq!(summary.status, AnswerStatus::NoContext);
    assert!(summary.answer.is_none());
    assert!(summary.supporting_chunk_ids.is_empty());
    assert_eq!(h.generator.call_count(), 0);
}

#[tokio::test]
async fn answered_query_is_grounded_in_ingested_chunks() {
    let h = harness();
    let bytes = three_page_pdf(1300);
    let ingest = h.pipeline.ingest(bytes, None).await.unwrap();

    let summary = h
        .pipeline
        .ask("what was discussed in the session?", 3)
        .await
        .unwrap();

    assert_eq!(summary.status, AnswerStatus::Answered);
    assert!(summary.answer.is_some());
    assert_eq!(h.generator.call_count(), 1);

    // Supporting chunks are a subset of the one ingested document's chunks.
    assert!(!summary.supporting_chunk_ids.is_empty());
    assert!(summary.supporting_chunk_ids.len() <= 3);
    for chunk_id in &summary.supporting_chunk_ids {
        assert!(ingest.chunk_ids.contains(chunk_id));
    }
}

#[tokio::test]
async fn empty_question_is_a_validation_error() {
    let h = harness();

    let err = h.pipeline.ask("   ", 5).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(h.generator.call_count(), 0);
}

#[tokio::test]
async fn generation_failure_is_distinct_from_no_context() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = RagConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();

    let pipeline = RagPipeline::new(
        &config,
        Arc::new(StubEmbedder),
        Arc::new(InMemoryVectorIndex::new()),
        Arc::new(FailingGenerator),
    )
    .unwrap();

    pipeline.ingest(three_page_pdf(500), None).await.unwrap();

    let err = pipeline
        .ask("what was discussed in the session?", 5)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Generation(_)));
}

#[tokio::test]
async fn document_registry_records_ingested_documents() {
    let h = harness();
    let summary = h
        .pipeline
        .ingest(three_page_pdf(500), Some("lok sabha".to_string()))
        .await
        .unwrap();

    let documents = h.pipeline.list_documents().await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].storage_id, summary.storage_id);
    assert_eq!(documents[0].source.as_deref(), Some("lok sabha"));

    let document = h.pipeline.get_document(&summary.storage_id).await.unwrap();
    assert_eq!(document.content_hash, summary.content_hash);
    assert_eq!(document.num_chunks as usize, summary.num_chunks);

    let err = h.pipeline.get_document("missing.pdf").await.unwrap_err();
    assert!(matches!(err, Error::DocumentNotFound(_)));
}

#[tokio::test]
async fn chunk_previews_are_written_per_chunk() {
    let h = harness();
    let summary = h.pipeline.ingest(three_page_pdf(1300), None).await.unwrap();

    let preview_dir = h._dir.path().join("chunks");
    for chunk_id in &summary.chunk_ids {
        let path = preview_dir.join(format!("{}.txt", chunk_id));
        assert!(path.exists(), "missing preview for {}", chunk_id);
        let preview = std::fs::read_to_string(&path).unwrap();
        assert!(preview.chars().count() <= 2000);
    }
}
