//! End-to-end ingestion into an on-disk collection.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use std::cell::Cell;
use std::path::Path;

use pdf_ingest::ingestion::parse_pdf;
use pdf_ingest::providers::local::load_collection;
use pdf_ingest::providers::{EmbeddingProvider, LocalVectorStore, VectorStoreProvider};
use pdf_ingest::{Error, IngestPipeline, PdfReader, Result, TextChunker, TextCleaner};

/// Build a PDF whose pages hold the given lines; an empty slice is a page
/// without text. The document info dictionary carries padded title and author.
fn write_pdf(path: &Path, pages: &[&[&str]]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", "Font".into()),
        ("Subtype", "Type1".into()),
        ("BaseFont", "Courier".into()),
        ("Encoding", "WinAnsiEncoding".into()),
    ]));

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new(
                "Td",
                vec![72.into(), (700 - 14 * i as i64).into()],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
        let resources = Dictionary::from_iter(vec![(
            "Font",
            Dictionary::from_iter(vec![("F1", font_id.into())]).into(),
        )]);
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", "Page".into()),
            ("Parent", pages_id.into()),
            ("Contents", content_id.into()),
            ("Resources", resources.into()),
            ("MediaBox", vec![0.into(), 0.into(), 612.into(), 792.into()].into()),
        ]));
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", "Pages".into()),
            ("Kids", kids.into()),
            ("Count", count.into()),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", "Catalog".into()),
        ("Pages", pages_id.into()),
    ]));
    let info_id = doc.add_object(Dictionary::from_iter(vec![
        ("Title", Object::string_literal("  Operator Manual  ")),
        ("Author", Object::string_literal("Field Team ")),
        ("CreationDate", Object::string_literal("D:20240105093000Z")),
    ]));
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.save(path).unwrap();
}

/// Deterministic embedder: vector derived from text length
struct LengthEmbedder {
    calls: Cell<usize>,
}

impl LengthEmbedder {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
        }
    }
}

impl EmbeddingProvider for LengthEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.set(self.calls.get() + 1);
        Ok(texts
            .iter()
            .map(|t| vec![t.len() as f32, 1.0, 0.0])
            .collect())
    }

    fn name(&self) -> &str {
        "length"
    }

    fn model(&self) -> &str {
        "length-v1"
    }
}

#[test]
fn test_parse_reads_metadata_and_skips_empty_pages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manual.pdf");
    write_pdf(&path, &[&["Hello World!"], &[]]);

    let document = parse_pdf(&path).unwrap();

    assert_eq!(document.title, "Operator Manual");
    assert_eq!(document.author, "Field Team");
    assert_eq!(document.creation_date, "D:20240105093000Z");
    assert_eq!(document.pages.len(), 1);
    assert_eq!(document.pages[0].num, 0);
    assert!(document.pages[0].text.contains("Hello World!"));
    assert_eq!(PdfReader::page_count(&path).unwrap(), 2);
}

#[test]
fn test_ingest_persists_collection_with_page_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("manual.pdf");
    write_pdf(
        &pdf,
        &[
            &["Hello World!"],
            &[],
            &["Safety first. Always wear gloves.", "Check the valve before use."],
        ],
    );
    let store_dir = dir.path().join("vector_store");

    let embedder = LengthEmbedder::new();
    let mut store = LocalVectorStore::new(&store_dir, "manuals");
    let pipeline = IngestPipeline::new(TextCleaner::default(), TextChunker::new(1000, 200));
    let report = pipeline.run(&pdf, &embedder, &mut store).unwrap();

    assert_eq!(report.title, "Operator Manual");
    assert_eq!(report.total_pages, 3);
    assert_eq!(report.pages, 2);
    assert_eq!(report.chunks, 2);
    assert_eq!(report.dimensions, 3);
    assert_eq!(report.collection, "manuals");
    assert_eq!(report.persisted_to, Some(store_dir.join("manuals.json")));
    assert_eq!(embedder.calls.get(), 1);

    let collection = load_collection(&store_dir, "manuals").unwrap().unwrap();
    assert_eq!(collection.dimensions, 3);
    assert_eq!(collection.records.len(), 2);

    let first = &collection.records[0];
    assert!(first.content.contains("Hello World!"));
    assert_eq!(first.metadata["page_number"], serde_json::json!(0));
    assert_eq!(first.metadata["title"], serde_json::json!("Operator Manual"));
    assert_eq!(first.metadata["author"], serde_json::json!("Field Team"));
    assert_eq!(first.metadata["source"], serde_json::json!("p0-0"));

    let second = &collection.records[1];
    assert_eq!(second.metadata["page_number"], serde_json::json!(2));
    assert!(second.content.contains("Safety first."));
    assert!(!second.content.contains('\n'));
}

#[test]
fn test_second_run_appends_to_collection() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("manual.pdf");
    write_pdf(&pdf, &[&["Hello World!"]]);
    let store_dir = dir.path().join("vector_store");
    let pipeline = IngestPipeline::default();

    for _ in 0..2 {
        let mut store = LocalVectorStore::new(&store_dir, "manuals");
        pipeline.run(&pdf, &LengthEmbedder::new(), &mut store).unwrap();
    }

    let collection = load_collection(&store_dir, "manuals").unwrap().unwrap();
    assert_eq!(collection.records.len(), 2);
    assert_ne!(collection.records[0].id, collection.records[1].id);
}

#[test]
fn test_missing_pdf_calls_no_provider() {
    let dir = tempfile::tempdir().unwrap();
    let store_dir = dir.path().join("vector_store");
    let embedder = LengthEmbedder::new();
    let mut store = LocalVectorStore::new(&store_dir, "manuals");

    let err = IngestPipeline::default()
        .run(&dir.path().join("absent.pdf"), &embedder, &mut store)
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(embedder.calls.get(), 0);
    assert!(store.is_empty());
    assert!(!store_dir.exists());
}

#[test]
fn test_textless_pdf_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("scan.pdf");
    write_pdf(&pdf, &[&[], &[]]);
    let store_dir = dir.path().join("vector_store");

    let embedder = LengthEmbedder::new();
    let mut store = LocalVectorStore::new(&store_dir, "manuals");
    let report = IngestPipeline::default()
        .run(&pdf, &embedder, &mut store)
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(embedder.calls.get(), 0);
    assert!(!store_dir.exists());
}

struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
    fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::embedding("HTTP 401 Unauthorized"))
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "none"
    }
}

#[test]
fn test_failed_embedding_leaves_no_collection() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("manual.pdf");
    write_pdf(&pdf, &[&["Hello World!"]]);
    let store_dir = dir.path().join("vector_store");

    let mut store = LocalVectorStore::new(&store_dir, "manuals");
    let err = IngestPipeline::default()
        .run(&pdf, &FailingEmbedder, &mut store)
        .unwrap_err();

    assert!(matches!(err, Error::Embedding(_)));
    assert!(load_collection(&store_dir, "manuals").unwrap().is_none());
}
