//! Flat-file JSON storage
//!
//! The pipelines persist nothing beyond indented JSON arrays at configured
//! paths. Checkpoint writes are full overwrites; atomicity comes from writing
//! to a temp file and renaming over the target.

pub mod checkpoint;

pub use checkpoint::{read_records, write_json_atomic, CheckpointSink};
