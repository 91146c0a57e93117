//! # Migration Repository
//!
//! This crate provides the traits the migration pipeline reads from and
//! writes to, the error taxonomy shared by every stage, and concrete
//! implementations for the two systems the tools talk to:
//!
//! - **Vidispine**: paginated item and collection searches over REST
//! - **PostgreSQL**: the legacy asset-folder table, the project-id lookup and
//!   the destination writers

pub mod errors;
pub mod interfaces;
pub mod postgres;
pub mod vidispine;

pub use errors::{SourceError, TransformError, WriteError};
pub use interfaces::{PageSource, ProjectIdLookup, RecordWriter};
pub use vidispine::VidispineClient;
