//! Pipeline layer tests
//!
//! Full runs over temporary input directories.

mod test_run;
