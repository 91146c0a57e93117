//! Interface definitions for migration sources and destinations.
//!
//! The pipeline only ever talks to these traits, so the Vidispine and
//! PostgreSQL backends can be swapped for in-memory mocks in tests.

mod page_source;
mod project_lookup;
mod record_writer;

pub use page_source::PageSource;
pub use project_lookup::ProjectIdLookup;
pub use record_writer::RecordWriter;
