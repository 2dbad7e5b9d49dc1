//! Card Grader Adapters - External adapters for card-grader.
//!
//! This crate provides the filesystem card source.

pub mod fs;

pub use fs::FsCardSource;
