//! Processor module for the migration pipeline.
//!
//! Transforms source records into destination records, one at a time.

mod transformer;

pub use transformer::{MapTransformer, PassThrough, RecordTransformer};
