pub mod journal_dto;
pub mod naming;

pub use journal_dto::{ErrorRecord, ErrorReport, StatusRecord, StatusUpdate};
pub use naming::{is_safe_file_name, normalized_file_name, segment_stem};
