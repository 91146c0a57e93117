//! Error types for the migration repository.

mod source_error;
mod transform_error;
mod write_error;

pub use source_error::SourceError;
pub use transform_error::TransformError;
pub use write_error::WriteError;
