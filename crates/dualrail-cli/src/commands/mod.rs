//! CLI command implementations.

pub mod catalog;
pub mod common;
pub mod convert;
pub mod simulate;
pub mod version;
