// Chunking properties
//
// Concatenation, size bound, overlap and index contiguity over
// realistic documents, plus the degenerate inputs.

use crate::common::{chunker, document, GUIDE_MD, NOTES_MD};
use ragprep::core::chunker::{merger, splitter};
use ragprep::core::config::ChunkingConfig;

const SEPARATORS: [&str; 7] = ["\n\n---\n\n", "\n\n", "\n", ". ", ", ", " ", ""];

fn long_text() -> String {
    let mut text = String::new();
    for section in 0..4 {
        text.push_str(&format!("Section {section}\n\n"));
        for para in 0..3 {
            text.push_str(&format!(
                "Paragraph {para} of section {section} talks about fitting, cleaning, \
                 and maintaining devices. It has two sentences.\n\n"
            ));
        }
        text.push_str("---\n\n");
    }
    text
}

#[test]
fn test_concatenation_without_overlap() {
    let text = long_text();

    for size in [10, 37, 80, 200, 1000] {
        let c = chunker(size, 0, &SEPARATORS);
        let chunks = c.chunk_document(&document("long.md", &text));
        let joined: String = chunks.iter().map(|ch| ch.content.as_str()).collect();
        assert_eq!(joined, text, "chunk_size {size}");
    }
}

#[test]
fn test_size_bound() {
    let text = long_text();

    for (size, overlap) in [(20, 5), (50, 10), (100, 30), (250, 100)] {
        let c = chunker(size, overlap, &SEPARATORS);
        for chunk in c.chunk_document(&document("long.md", &text)) {
            let count = chunk.content.chars().count();
            assert!(count <= size, "{count} > {size} in {}", chunk.chunk_id);
            assert_eq!(chunk.metadata["char_count"], count);
        }
    }
}

#[test]
fn test_consecutive_chunks_share_a_unit() {
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
    let units = splitter::split(text, &[" ", ""], 24);
    let chunks = merger::merge(&units, 24, 12);

    assert!(chunks.len() > 1);
    for pair in chunks.windows(2) {
        // Longest head of the next chunk that is also the tail of
        // the previous one
        let shared = (1..=pair[1].len())
            .filter(|&k| pair[1].is_char_boundary(k) && pair[0].ends_with(&pair[1][..k]))
            .max()
            .unwrap_or(0);

        assert!(shared > 0, "{:?} shares nothing with {:?}", pair[1], pair[0]);
        assert!(shared <= 12, "overlap of {shared} chars exceeds budget");
    }
}

#[test]
fn test_no_overlap_shares_nothing() {
    let units = splitter::split("one two three four five six", &[" ", ""], 10);
    let chunks = merger::merge(&units, 10, 0);

    let total: usize = chunks.iter().map(|c| c.len()).sum();
    assert_eq!(total, "one two three four five six".len());
}

#[test]
fn test_index_contiguity() {
    let c = chunker(60, 15, &SEPARATORS);
    let chunks = c.chunk_document(&document("guide.md", GUIDE_MD));
    let n = chunks.len();

    assert!(n > 1);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_index, i);
        assert_eq!(chunk.total_chunks, n);
        assert_eq!(chunk.chunk_id, format!("guide.md_{i}"));
    }
}

#[test]
fn test_chunk_metadata_overrides_document() {
    let c = chunker(50, 10, &SEPARATORS);
    let mut doc = document("notes.md", NOTES_MD);
    doc.metadata.insert("chunk_size".into(), "driver value".into());
    doc.metadata.insert("section_count".into(), 0.into());

    for chunk in c.chunk_document(&doc) {
        assert_eq!(chunk.metadata["chunk_size"], 50);
        assert_eq!(chunk.metadata["chunk_overlap"], 10);
        assert_eq!(chunk.metadata["section_count"], 0);
        assert_eq!(chunk.source, "data/raw/notes.md");
    }
}

#[test]
fn test_empty_document_yields_no_chunks() {
    let c = chunker(100, 10, &SEPARATORS);
    assert!(c.chunk_document(&document("empty.md", "")).is_empty());
    assert!(c.chunk_document(&document("blank.md", " \n\t\n")).is_empty());
}

#[test]
fn test_short_document_is_one_chunk() {
    let c = chunker(1000, 200, &SEPARATORS);
    let chunks = c.chunk_document(&document("notes.md", NOTES_MD));

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, NOTES_MD);
    assert_eq!(chunks[0].total_chunks, 1);
}

#[test]
fn test_twenty_five_scenario() {
    let text = "abcde fghij klmno pqrst";
    let c = chunker(20, 5, &["\n\n", " ", ""]);

    let units = splitter::split(text, &["\n\n", " ", ""], 20);
    assert_eq!(units, vec!["abcde ", "fghij ", "klmno ", "pqrst"]);

    // Every word unit is 6 chars, over the 5-char overlap budget, so
    // nothing is carried
    let chunks = c.split_text(text);
    assert_eq!(chunks, vec!["abcde fghij klmno ", "pqrst"]);
    assert!(chunks.iter().all(|ch| ch.chars().count() <= 20));
}

#[test]
fn test_twenty_six_scenario_carries_word() {
    let c = chunker(20, 6, &["\n\n", " ", ""]);
    let chunks = c.split_text("abcde fghij klmno pqrst");

    assert_eq!(chunks, vec!["abcde fghij klmno ", "klmno pqrst"]);
}

#[test]
fn test_irreducible_unit_stands_alone() {
    let units = ["tiny ", "a-unit-far-longer-than-the-limit", " end"];
    let chunks = merger::merge(&units, 10, 3);

    assert_eq!(
        chunks,
        vec!["tiny ", "a-unit-far-longer-than-the-limit", " end"]
    );
}

#[test]
fn test_rechunking_is_stable() {
    let text = long_text();
    let c = chunker(90, 20, &SEPARATORS);

    let first = c.chunk_document(&document("long.md", &text));
    let second = c.chunk_document(&document("long.md", &text));
    assert_eq!(first, second);
}

#[test]
fn test_invalid_config_rejected() {
    let zero = ChunkingConfig {
        chunk_size: 0,
        chunk_overlap: 0,
        ..ChunkingConfig::default()
    };
    assert!(ragprep::core::chunker::DocumentChunker::new(zero).is_err());

    let overlap = ChunkingConfig {
        chunk_size: 100,
        chunk_overlap: 100,
        ..ChunkingConfig::default()
    };
    assert!(ragprep::core::chunker::DocumentChunker::new(overlap).is_err());
}
