//! Greedy chunk packing with whole-unit overlap.
//!
//! Units coming out of the splitter are packed in order into chunks
//! of at most `chunk_size` characters. When a chunk is flushed, the
//! trailing units whose combined length fits in `chunk_overlap` are
//! carried into the next chunk. Overlap is measured in whole units,
//! never as a character slice, so a unit the splitter kept intact is
//! never cut in half.

use std::collections::VecDeque;

use super::splitter::char_len;

/// Pack `units` into chunks of at most `chunk_size` characters with
/// up to `chunk_overlap` characters of carried-forward units.
///
/// A unit that is longer than `chunk_size` on its own is emitted as
/// its own chunk, unmodified.
pub fn merge<S: AsRef<str>>(units: &[S], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer: VecDeque<(&str, usize)> = VecDeque::new();
    let mut buffer_len = 0usize;

    for unit in units {
        let unit = unit.as_ref();
        let len = char_len(unit);

        if len > chunk_size {
            // Irreducible overflow
            if !buffer.is_empty() {
                chunks.push(concat(&buffer));
                buffer.clear();
                buffer_len = 0;
            }
            chunks.push(unit.to_string());
            continue;
        }

        if buffer_len + len > chunk_size && !buffer.is_empty() {
            chunks.push(concat(&buffer));

            let dropped = buffer.len() - carried_units(&buffer, chunk_overlap);
            buffer.drain(..dropped);
            buffer_len = buffer.iter().map(|(_, l)| l).sum();

            // Carried units must leave room for the current one
            while buffer_len + len > chunk_size {
                match buffer.pop_front() {
                    Some((_, l)) => buffer_len -= l,
                    None => break,
                }
            }
        }

        buffer.push_back((unit, len));
        buffer_len += len;
    }

    if !buffer.is_empty() {
        chunks.push(concat(&buffer));
    }

    chunks
}

/// Number of trailing units whose cumulative length fits in `budget`
fn carried_units(buffer: &VecDeque<(&str, usize)>, budget: usize) -> usize {
    let mut total = 0;
    let mut count = 0;

    for (_, len) in buffer.iter().rev() {
        if total + len > budget {
            break;
        }
        total += len;
        count += 1;
    }

    count
}

fn concat(buffer: &VecDeque<(&str, usize)>) -> String {
    buffer.iter().map(|(unit, _)| *unit).collect()
}
