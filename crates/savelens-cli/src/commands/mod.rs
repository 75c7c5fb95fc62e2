//! CLI command implementations.

pub mod analyze;
pub mod rewrite;
pub mod validate;
