//! Pipeline entry points for watcher operations.
//!
//! - `scan`: the dedupe/filter decision core
//! - `run_scan`: one full batch run (load, scan, persist, notify)

mod scan;

pub use scan::{ListingSource, run_scan, scan};
