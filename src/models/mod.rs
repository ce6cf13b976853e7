// src/models/mod.rs

//! Domain models for the watcher application.

mod listing;

pub use listing::Listing;
