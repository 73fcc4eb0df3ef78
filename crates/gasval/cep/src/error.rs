use thiserror::Error;

use crate::sample::SampleId;

/// Errors from the historical store and the edit workflow.
///
/// "No statistics available" is not an error: it is `None` from the monitor.
#[derive(Debug, Error)]
pub enum CepError {
    #[error("edit rejected: a non-empty reason is required")]
    MissingReason,

    #[error("edit rejected: no field changes supplied")]
    NoChanges,

    #[error("sample not found: {0}")]
    SampleNotFound(SampleId),

    #[error("sample already stored: {0}")]
    DuplicateSample(SampleId),

    #[error("invalid sample: {0}")]
    InvalidSample(String),

    #[error("invalid value for {field}: {detail}")]
    InvalidValue { field: String, detail: String },

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for CepError {
    fn from(e: std::io::Error) -> Self {
        CepError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for CepError {
    fn from(e: serde_json::Error) -> Self {
        CepError::Persistence(format!("corrupt store document: {}", e))
    }
}

/// Convenience type alias for CEP results.
pub type CepResult<T> = Result<T, CepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert!(CepError::MissingReason.to_string().contains("reason"));
        assert!(CepError::NoChanges.to_string().contains("no field changes"));

        let id = SampleId::new();
        assert!(CepError::SampleNotFound(id).to_string().contains(&id.to_string()));

        let e = CepError::InvalidValue {
            field: "methane".into(),
            detail: "-1 is negative".into(),
        };
        assert_eq!(e.to_string(), "invalid value for methane: -1 is negative");
    }

    #[test]
    fn io_error_becomes_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e: CepError = io.into();
        assert!(matches!(e, CepError::Persistence(msg) if msg.contains("denied")));
    }
}
