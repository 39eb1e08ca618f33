//! CLI command handlers.

/// Rule listing and inspection.
pub mod rules;
/// Directory scanning and report writing.
pub mod scan;

/// Convenience alias for command return types.
pub type Result<T = ()> = anyhow::Result<T>;
