//! Cross-crate conversion tests.

pub mod end_to_end;
pub mod file_logs;
