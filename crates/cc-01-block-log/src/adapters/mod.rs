//! Block log implementations.

pub mod file;
pub mod memory;
