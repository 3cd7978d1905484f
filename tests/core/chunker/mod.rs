//! Chunker layer tests
//!
//! Chunking properties over realistic documents and UTF-8 safety
//! with multi-byte characters.

mod test_properties;
