//! Record framing and error types.

pub mod errors;
pub mod record;
