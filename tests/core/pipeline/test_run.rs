// Pipeline runs end to end
//
// Isolation of corrupt files, reproducibility, the knowledge base
// round trip and the directory setup cases.

use crate::common::{assert_valid_kb, test_config, TestInput, GUIDE_MD, NOTES_MD};
use ragprep::core::drivers::{Driver, DriverRegistry, MarkdownDriver};
use ragprep::core::error::ExtractionError;
use ragprep::core::pipeline::{Pipeline, RunStatus};
use ragprep::core::storage::read_knowledge_base;
use ragprep::core::types::{Document, FileOutcome, FileType};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Panics the way parser crates do on malformed fonts
struct PanickingPdfDriver;

impl Driver for PanickingPdfDriver {
    fn file_type(&self) -> FileType {
        FileType::Pdf
    }

    fn extract(&self, _path: &Path) -> Result<Document, ExtractionError> {
        panic!("unexpected encoding")
    }
}

/// Markdown driver that counts how often it is called
struct CountingDriver {
    calls: Arc<AtomicUsize>,
}

impl Driver for CountingDriver {
    fn file_type(&self) -> FileType {
        FileType::Markdown
    }

    fn extract(&self, path: &Path) -> Result<Document, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        MarkdownDriver.extract(path)
    }
}

#[test]
fn test_corrupt_file_is_isolated() {
    let input = TestInput::with_corrupt_middle();
    let output = TempDir::new().unwrap();

    let pipeline = Pipeline::new(&test_config(input.path(), output.path())).unwrap();
    let report = pipeline.run().unwrap();
    assert_eq!(report.status, RunStatus::Completed);

    let kb = read_knowledge_base(report.output_file.as_deref().unwrap()).unwrap();
    assert_valid_kb(&kb);

    let stats = &kb.metadata.statistics;
    assert_eq!(stats.total_files_found, 3);
    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.files_errored, 1);

    let names: Vec<&str> = kb
        .metadata
        .file_summaries
        .iter()
        .map(|s| s.filename.as_str())
        .collect();
    assert_eq!(names, vec!["a_guide.md", "b_budget.xlsx", "c_notes.md"]);

    let broken = &kb.metadata.file_summaries[1];
    assert_eq!(broken.file_type, Some(FileType::Excel));
    assert!(matches!(broken.outcome, FileOutcome::Error { .. }));

    assert!(kb.chunks.iter().all(|c| c.filename != "b_budget.xlsx"));
    assert!(kb.chunks.iter().any(|c| c.filename == "a_guide.md"));
    assert!(kb.chunks.iter().any(|c| c.filename == "c_notes.md"));
}

#[test]
fn test_chunks_follow_file_then_chunk_order() {
    let input = TestInput::with_files(&[("a.md", GUIDE_MD), ("b.md", NOTES_MD)]);
    let pipeline = Pipeline::new(&test_config(input.path(), input.path())).unwrap();

    let kb = pipeline.build_knowledge_base(input.path(), &input.files);
    assert_valid_kb(&kb);

    let first_b = kb.chunks.iter().position(|c| c.filename == "b.md").unwrap();
    assert!(kb.chunks[..first_b].iter().all(|c| c.filename == "a.md"));
    assert!(kb.chunks[first_b..].iter().all(|c| c.filename == "b.md"));

    for (i, chunk) in kb.chunks[..first_b].iter().enumerate() {
        assert_eq!(chunk.chunk_index, i);
    }
}

#[test]
fn test_rerun_is_identical_except_timestamp() {
    let input = TestInput::with_corrupt_middle();
    let pipeline = Pipeline::new(&test_config(input.path(), input.path())).unwrap();

    let first = pipeline.build_knowledge_base(input.path(), &input.files);
    let mut second = pipeline.build_knowledge_base(input.path(), &input.files);
    second.metadata.created_at = first.metadata.created_at;

    assert_eq!(first, second);
}

#[test]
fn test_markdown_metadata_reaches_chunks() {
    let input = TestInput::with_files(&[("guide.md", GUIDE_MD)]);
    let pipeline = Pipeline::new(&test_config(input.path(), input.path())).unwrap();

    let kb = pipeline.build_knowledge_base(input.path(), &input.files);
    let chunk = &kb.chunks[0];

    assert_eq!(chunk.file_type, FileType::Markdown);
    assert_eq!(chunk.metadata["custom_metadata"]["kind"], "parsed");
    assert_eq!(chunk.metadata["custom_metadata"]["value"]["topic"], "hearing care");
    assert_eq!(chunk.metadata["section_count"], 3);
    assert_eq!(chunk.metadata["chunk_size"], 120);
    assert!(chunk.content.starts_with("[Section: Hearing Aid Guide]"));
    assert!(kb.chunks.iter().all(|c| !c.content.contains("METADATA")));
}

#[test]
fn test_knowledge_base_round_trip() {
    let input = TestInput::with_files(&[("guide.md", GUIDE_MD), ("notes.md", NOTES_MD)]);
    let output = TempDir::new().unwrap();

    let mut config = test_config(input.path(), output.path());
    config.pipeline.output_filename = "kb.json".to_string();

    let report = Pipeline::new(&config).unwrap().run().unwrap();
    let path = report.output_file.unwrap();
    assert_eq!(path, output.path().join("kb.json"));

    let kb = read_knowledge_base(&path).unwrap();
    assert_valid_kb(&kb);
    assert_eq!(kb.metadata.chunk_config.chunk_size, 120);
    assert_eq!(kb.metadata.chunk_config.chunk_overlap, 30);
    assert_eq!(kb.metadata.statistics, report.statistics);
    assert_eq!(kb.metadata.source_directory, input.path().display().to_string());
}

#[test]
fn test_no_recursive_ignores_subdirectories() {
    let input = TestInput::with_files(&[("top.md", NOTES_MD), ("nested/deep.md", GUIDE_MD)]);
    let output = TempDir::new().unwrap();

    let mut config = test_config(input.path(), output.path());
    config.pipeline.recursive = false;

    let report = Pipeline::new(&config).unwrap().run().unwrap();
    assert_eq!(report.statistics.total_files_found, 1);
    assert_eq!(report.file_summaries[0].filename, "top.md");
}

#[test]
fn test_output_directory_created() {
    let input = TestInput::with_files(&[("notes.md", NOTES_MD)]);
    let root = TempDir::new().unwrap();
    let output = root.path().join("processed").join("today");

    let report = Pipeline::new(&test_config(input.path(), &output))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    assert!(output.join("knowledge_base.json").is_file());
}

#[test]
fn test_empty_markdown_is_success_with_no_chunks() {
    let input = TestInput::with_files(&[("empty.md", ""), ("notes.md", NOTES_MD)]);
    let pipeline = Pipeline::new(&test_config(input.path(), input.path())).unwrap();

    let kb = pipeline.build_knowledge_base(input.path(), &input.files);
    assert_valid_kb(&kb);
    assert_eq!(
        kb.metadata.file_summaries[0].outcome,
        FileOutcome::Success { chunks_created: 0 }
    );
    assert_eq!(kb.metadata.statistics.files_processed, 2);
}

#[cfg(unix)]
#[test]
fn test_uncreatable_output_is_setup_error() {
    let input = TestInput::with_files(&[("notes.md", NOTES_MD)]);
    // A regular file where the output directory should go
    let blocker = input.write_bytes("blocker", b"");

    let err = Pipeline::new(&test_config(input.path(), &blocker.join("out")))
        .unwrap()
        .run()
        .unwrap_err();
    assert!(err.is_setup_error());
}

#[test]
fn test_driver_panic_is_isolated() {
    let input = TestInput::with_files(&[("a.md", GUIDE_MD), ("b.pdf", "%PDF-1.4"), ("c.md", NOTES_MD)]);
    let output = TempDir::new().unwrap();

    let mut drivers = DriverRegistry::new();
    drivers.register(Box::new(MarkdownDriver));
    drivers.register(Box::new(PanickingPdfDriver));

    let config = test_config(input.path(), output.path());
    let report = Pipeline::with_drivers(&config, drivers).unwrap().run().unwrap();
    assert_eq!(report.status, RunStatus::Completed);

    let kb = read_knowledge_base(report.output_file.as_deref().unwrap()).unwrap();
    assert_valid_kb(&kb);
    assert_eq!(kb.metadata.statistics.files_processed, 2);
    assert_eq!(kb.metadata.statistics.files_errored, 1);

    match &kb.metadata.file_summaries[1].outcome {
        FileOutcome::Error { error } => assert!(error.contains("unexpected encoding"), "{error}"),
        other => panic!("expected error outcome, got {other:?}"),
    }
}

#[test]
fn test_output_path_is_directory_fails_before_processing() {
    let input = TestInput::with_files(&[("a.md", GUIDE_MD), ("b.md", NOTES_MD)]);
    let output = TempDir::new().unwrap();
    std::fs::create_dir(output.path().join("knowledge_base.json")).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let mut drivers = DriverRegistry::new();
    drivers.register(Box::new(CountingDriver {
        calls: Arc::clone(&calls),
    }));

    let config = test_config(input.path(), output.path());
    let err = Pipeline::with_drivers(&config, drivers)
        .unwrap()
        .run()
        .unwrap_err();

    assert!(err.is_setup_error(), "{err}");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
