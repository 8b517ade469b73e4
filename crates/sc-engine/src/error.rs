//! Error types for shortcode processing.

/// Errors returned by [`Processor::process`](crate::Processor::process).
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// `process` was called without a preceding `set_environment`.
    #[error("no environment set: call set_environment before every process call")]
    MissingEnvironment,
}
