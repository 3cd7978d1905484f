//! Separator-hierarchy text splitting.
//!
//! Decomposes a string into units of at most `chunk_size`
//! characters, preferring the coarsest separator that occurs in the
//! text and recursing into finer separators only for pieces that are
//! still too long. The empty separator means "split between
//! characters" and always succeeds.
//!
//! Lengths are counted in `char`s and every cut lands on a character
//! boundary, so multi-byte input never panics.
//!
//! # Example
//!
//! ```
//! use ragprep::core::chunker::splitter::split;
//!
//! let units = split("abcde fghij klmno", &[" ", ""], 8);
//! assert_eq!(units, vec!["abcde ", "fghij ", "klmno"]);
//! assert_eq!(units.concat(), "abcde fghij klmno");
//! ```

/// Split `text` into order-preserving units of at most `chunk_size`
/// characters.
///
/// `separators` runs from coarsest to finest. Separators are kept as
/// the trailing part of the piece they end, so concatenating the
/// result reproduces `text` exactly.
pub fn split<'a, S: AsRef<str>>(text: &'a str, separators: &[S], chunk_size: usize) -> Vec<&'a str> {
    let mut units = Vec::new();
    split_into(text, separators, chunk_size.max(1), &mut units);
    units
}

fn split_into<'a, S: AsRef<str>>(
    text: &'a str,
    separators: &[S],
    chunk_size: usize,
    units: &mut Vec<&'a str>,
) {
    if text.is_empty() {
        return;
    }

    // First separator that occurs in the text; the empty separator
    // always matches.
    let selected = separators
        .iter()
        .position(|s| s.as_ref().is_empty() || text.contains(s.as_ref()));

    let Some(idx) = selected else {
        // No separator left at all: fall back to characters
        split_chars(text, chunk_size, units);
        return;
    };

    let separator = separators[idx].as_ref();
    if separator.is_empty() {
        split_chars(text, chunk_size, units);
        return;
    }

    let finer = &separators[idx + 1..];
    for piece in text.split_inclusive(separator) {
        if char_len(piece) <= chunk_size {
            units.push(piece);
        } else {
            split_into(piece, finer, chunk_size, units);
        }
    }
}

/// Slice `text` into pieces of exactly `chunk_size` characters (the
/// last one may be shorter).
fn split_chars<'a>(text: &'a str, chunk_size: usize, units: &mut Vec<&'a str>) {
    let mut start = 0;
    let mut count = 0;

    for (byte_idx, _) in text.char_indices() {
        if count == chunk_size {
            units.push(&text[start..byte_idx]);
            start = byte_idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        units.push(&text[start..]);
    }
}

/// Length in characters, the unit every size in the chunker uses
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
