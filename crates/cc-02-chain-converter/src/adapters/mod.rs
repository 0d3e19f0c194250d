//! Port implementations over the cc-01 block logs.

pub mod block_log;

pub use block_log::{LogSink, LogSource};
