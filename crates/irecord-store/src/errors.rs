//! Typed service errors.
//!
//! Each failure carries a stable `ErrorCode` so that callers (CLI today, an
//! HTTP boundary elsewhere) can map errors without string matching. The
//! variants mirror how a boundary would classify them: not found,
//! unprocessable, forbidden, conflict. Schema rule violations are *not*
//! errors; they travel as `ValidationReport` data.

use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Stable error codes, one per distinct failure condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InnovationNotFound,
    DocumentNotFound,
    DraftNotFound,
    ExportRequestNotFound,
    SchemaVersionNotFound,
    SectionNotFound,
    SupportNotFound,
    InnovationNotCreatedState,
    InnovationAlreadySubmitted,
    InnovationArchived,
    InnovationWithdrawn,
    InnovationSectionsIncomplete,
    InnovationNotShared,
    ExportRequestNotPending,
    ExportRequestRejectReasonRequired,
    ExportRequestWrongRequester,
    DocumentVersionMismatch,
    SchemaVersionDuplicated,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InnovationNotFound => "I.0001",
            Self::DocumentNotFound => "I.0002",
            Self::DraftNotFound => "I.0003",
            Self::ExportRequestNotFound => "IE.0001",
            Self::SchemaVersionNotFound => "IS.0001",
            Self::SectionNotFound => "I.0004",
            Self::SupportNotFound => "I.0005",
            Self::InnovationNotCreatedState => "I.0101",
            Self::InnovationAlreadySubmitted => "I.0102",
            Self::InnovationArchived => "I.0103",
            Self::InnovationWithdrawn => "I.0104",
            Self::InnovationSectionsIncomplete => "I.0105",
            Self::InnovationNotShared => "I.0106",
            Self::ExportRequestNotPending => "IE.0101",
            Self::ExportRequestRejectReasonRequired => "IE.0102",
            Self::ExportRequestWrongRequester => "IE.0103",
            Self::DocumentVersionMismatch => "I.0107",
            Self::SchemaVersionDuplicated => "IS.0101",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found ({0})")]
    NotFound(ErrorCode),

    #[error("unprocessable ({0})")]
    UnprocessableEntity(ErrorCode),

    #[error("forbidden ({0})")]
    Forbidden(ErrorCode),

    #[error("conflict ({0})")]
    Conflict(ErrorCode),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid stored value: {0}")]
    InvalidStoredValue(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("core error: {0}")]
    Core(#[from] irecord_core::CoreError),
}

impl ServiceError {
    /// The stable code, when the error has one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::NotFound(c)
            | Self::UnprocessableEntity(c)
            | Self::Forbidden(c)
            | Self::Conflict(c) => Some(*c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_and_unique() {
        let all = [
            ErrorCode::InnovationNotFound,
            ErrorCode::DocumentNotFound,
            ErrorCode::DraftNotFound,
            ErrorCode::ExportRequestNotFound,
            ErrorCode::SchemaVersionNotFound,
            ErrorCode::SectionNotFound,
            ErrorCode::SupportNotFound,
            ErrorCode::InnovationNotCreatedState,
            ErrorCode::InnovationAlreadySubmitted,
            ErrorCode::InnovationArchived,
            ErrorCode::InnovationWithdrawn,
            ErrorCode::InnovationSectionsIncomplete,
            ErrorCode::InnovationNotShared,
            ErrorCode::ExportRequestNotPending,
            ErrorCode::ExportRequestRejectReasonRequired,
            ErrorCode::ExportRequestWrongRequester,
            ErrorCode::DocumentVersionMismatch,
            ErrorCode::SchemaVersionDuplicated,
        ];
        let mut seen = std::collections::BTreeSet::new();
        for code in all {
            assert!(seen.insert(code.as_str()), "duplicate code {code}");
        }
    }

    #[test]
    fn typed_errors_expose_their_code() {
        let e = ServiceError::NotFound(ErrorCode::InnovationNotFound);
        assert_eq!(e.code(), Some(ErrorCode::InnovationNotFound));
        assert!(e.to_string().contains("I.0001"));

        let e = ServiceError::Serialization(serde_json::from_str::<i32>("x").unwrap_err());
        assert_eq!(e.code(), None);
    }
}
