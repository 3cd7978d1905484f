//! Tests for CLI output formatting helpers
//!
//! Tests the output formatting utilities:
//! - Byte formatting (KB, MB, GB)
//! - Duration formatting (ms, s, m)
//! - Chunk previews
//! - Color helpers (respects NO_COLOR)

use ragprep::cli::output::{colors, format_bytes, format_duration, preview};

/// Test byte formatting across unit boundaries
#[test]
fn test_format_bytes_boundaries() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(1048576 - 1), "1024.0 KB");
    assert_eq!(format_bytes(1572864), "1.5 MB");
    assert_eq!(format_bytes(10737418240), "10.0 GB");
}

/// Test duration formatting across unit boundaries
#[test]
fn test_format_duration_boundaries() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.999), "999ms");
    assert_eq!(format_duration(1.0), "1.00s");
    assert_eq!(format_duration(59.99), "59.99s");
    assert_eq!(format_duration(60.0), "1m 0.0s");
    assert_eq!(format_duration(125.5), "2m 5.5s");
}

/// Test previews collapse whitespace and cut on characters
#[test]
fn test_preview() {
    assert_eq!(preview("", 10), "");
    assert_eq!(preview("a\n\nb\tc", 10), "a b c");
    assert_eq!(preview("abcdefghij", 10), "abcdefghij");
    assert_eq!(preview("abcdefghijk", 10), "abcdefghij...");
    assert_eq!(preview("中文测试中文测试", 4), "中文测试...");
}

/// Test that colors preserve the original text
#[test]
fn test_colors_preserve_text() {
    assert!(colors::label("important").to_string().contains("important"));
    assert!(colors::file_type("excel").to_string().contains("excel"));
    assert!(colors::file_path("data/raw/a.md").to_string().contains("data/raw/a.md"));
    assert!(colors::number("42").to_string().contains("42"));
    assert!(colors::success("ok").to_string().contains("ok"));
    assert!(colors::warning("skipped").to_string().contains("skipped"));
    assert!(colors::error("error").to_string().contains("error"));
    assert!(colors::dim("(3 chunks)").to_string().contains("(3 chunks)"));
}
