use crate::types::Language;
use thiserror::Error;

/// Failure kinds surfaced by the judging pipeline.
///
/// Compilation and spawn failures are global: they abort a run before any
/// outcome is produced. A non-zero exit of the candidate program is local —
/// it is recorded in the fixture's outcome and the run continues.
#[derive(Debug, Error)]
pub enum GavelError {
    #[error("unsupported file extension: {0}")]
    UnsupportedLanguage(String),

    #[error("no profile configured for language: {0}")]
    MissingLanguageConfig(Language),

    #[error("compilation failed:\n{0}")]
    CompilationFailure(String),

    #[error("failed to start candidate process: {0}")]
    ProcessSpawnFailure(String),

    #[error("candidate program failed: {0}")]
    RuntimeFailure(String),

    #[error("fixture store unreadable: {0}")]
    ParseFailure(String),

    #[error("no example fixtures found in the given text")]
    ExtractionFailure,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GavelError>;
