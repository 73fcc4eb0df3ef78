use thiserror::Error;

/// Errors from loading or validating reference data.
///
/// Classification and method selection never fail: out-of-spec gas and bad
/// readings are reported as values. Only the reference dataset can be
/// rejected.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid reference table {table}: {detail}")]
    InvalidTable { table: String, detail: String },

    #[error("duplicate limit entry for {component} in {table} table")]
    DuplicateEntry { table: String, component: String },

    #[error(transparent)]
    UnknownComponent(#[from] gasval_types::UnknownComponent),

    #[error("unsupported reference table format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience type alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
