//! Save support
//!
//! Records handed to the host's save system.

pub mod record;

pub use record::{read_records, write_records, ItemRecord, RecordError, RECORD_VERSION};
