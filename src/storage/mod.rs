// src/storage/mod.rs

//! Persistence for the seen-set of notified fingerprints.

mod seen;

pub use seen::{SeenSet, SeenStore};
