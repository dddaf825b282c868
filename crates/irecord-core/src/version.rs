//! Record version helpers.
//!
//! This module centralizes version parsing and validation for Innovation
//! Record documents and schema definitions. Version labels select which
//! built-in schema and which strict cleanup rules apply to a document.

use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};

/// Known Innovation Record versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentVersion {
    V202209,
    V202304,
}

impl DocumentVersion {
    /// Parse a version label (e.g. "202304").
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "202209" => Ok(Self::V202209),
            "202304" => Ok(Self::V202304),
            _ => Err(CoreError::unsupported_version(s)),
        }
    }

    /// Return the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V202209 => "202209",
            Self::V202304 => "202304",
        }
    }

    /// The latest published version.
    pub fn latest() -> Self {
        Self::V202304
    }
}

/// Read the `version` field from a document JSON object.
pub fn document_version(doc: &serde_json::Value) -> CoreResult<DocumentVersion> {
    let ver = doc
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CoreError::invalid_argument("document is missing a version string"))?;
    DocumentVersion::parse(ver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_versions() {
        assert_eq!(DocumentVersion::parse("202209").unwrap(), DocumentVersion::V202209);
        assert_eq!(DocumentVersion::parse("202304").unwrap(), DocumentVersion::V202304);
    }

    #[test]
    fn parse_unknown_version() {
        let e = DocumentVersion::parse("199901").unwrap_err();
        assert!(e.to_string().contains("unsupported record version"));
    }

    #[test]
    fn latest_is_newest() {
        assert!(DocumentVersion::latest() >= DocumentVersion::V202209);
        assert_eq!(DocumentVersion::latest().as_str(), crate::LATEST_VERSION);
    }

    #[test]
    fn version_from_document() {
        let doc = serde_json::json!({ "version": "202304" });
        assert_eq!(document_version(&doc).unwrap(), DocumentVersion::V202304);

        let doc = serde_json::json!({ "version": 202304 });
        assert!(document_version(&doc).is_err());
    }
}
