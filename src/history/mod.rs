pub mod storage;
pub mod types;

pub use storage::{append_entry, export_log, read_log, LogError};
pub use types::{LogEntry, LOG_HEADER, LOG_SCHEMA_VERSION};
