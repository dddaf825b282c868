//! Row types and status machines.
//!
//! Statuses are stored as TEXT and parsed on read; an unknown stored value is
//! a corruption error, not a silent default. Timestamps are RFC 3339 TEXT.

use serde::Serialize;
use serde_json::Value;

use crate::errors::{ServiceError, ServiceResult};

macro_rules! status_enum {
    ($name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            pub fn parse(s: &str) -> ServiceResult<Self> {
                match s {
                    $($code => Ok(Self::$variant),)+
                    other => Err(ServiceError::InvalidStoredValue(format!(
                        "{}: {other}", stringify!($name)
                    ))),
                }
            }
        }
    };
}

status_enum!(InnovationStatus {
    Created => "CREATED",
    WaitingNeedsAssessment => "WAITING_NEEDS_ASSESSMENT",
    NeedsAssessment => "NEEDS_ASSESSMENT",
    InProgress => "IN_PROGRESS",
    Paused => "PAUSED",
    Archived => "ARCHIVED",
    Withdrawn => "WITHDRAWN",
});

status_enum!(SectionStatus {
    NotStarted => "NOT_STARTED",
    Draft => "DRAFT",
    Submitted => "SUBMITTED",
});

status_enum!(SupportStatus {
    Engaging => "ENGAGING",
    Waiting => "WAITING",
    Unsuitable => "UNSUITABLE",
    Closed => "CLOSED",
});

status_enum!(ExportRequestStatus {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
    Cancelled => "CANCELLED",
});

status_enum!(ActivityType {
    InnovationCreation => "INNOVATION_CREATION",
    InnovationSubmission => "INNOVATION_SUBMISSION",
    InnovationArchive => "INNOVATION_ARCHIVE",
    InnovationWithdrawal => "INNOVATION_WITHDRAWAL",
    SectionDraftUpdate => "SECTION_DRAFT_UPDATE",
    SectionSubmission => "SECTION_SUBMISSION",
    SharesUpdate => "SHARES_UPDATE",
    SupportStatusUpdate => "SUPPORT_STATUS_UPDATE",
    ExportRequestCreation => "EXPORT_REQUEST_CREATION",
    ExportRequestStatusUpdate => "EXPORT_REQUEST_STATUS_UPDATE",
    DocumentMigration => "DOCUMENT_MIGRATION",
});

#[derive(Debug, Clone, Serialize)]
pub struct InnovationRow {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub status: InnovationStatus,
    /// Status before archiving, restored if the archive is reverted.
    pub previous_status: Option<InnovationStatus>,
    pub created_at: String,
    pub updated_at: String,
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentRow {
    pub innovation_id: String,
    pub version: String,
    pub document: Value,
    /// True once the document is a submitted snapshot rather than a seed.
    pub is_snapshot: bool,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftRow {
    pub innovation_id: String,
    pub version: String,
    pub document: Value,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionRow {
    pub innovation_id: String,
    pub section: String,
    pub status: SectionStatus,
    pub submitted_at: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupportRow {
    pub id: String,
    pub innovation_id: String,
    pub organisation_unit: String,
    pub status: SupportStatus,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportRequestRow {
    pub id: String,
    pub innovation_id: String,
    pub organisation_id: String,
    pub created_by: String,
    pub status: ExportRequestStatus,
    pub request_reason: String,
    pub reject_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityLogRow {
    pub seq: i64,
    pub innovation_id: String,
    pub activity: ActivityType,
    pub params: Value,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaRow {
    pub id: String,
    pub version_label: String,
    pub schema: Value,
    /// sha-256 over the stored schema JSON, hex-encoded.
    pub digest: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_round_trip() {
        for status in [
            InnovationStatus::Created,
            InnovationStatus::WaitingNeedsAssessment,
            InnovationStatus::Withdrawn,
        ] {
            assert_eq!(InnovationStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(InnovationStatus::parse("NOPE").is_err());
    }

    #[test]
    fn activity_types_round_trip() {
        assert_eq!(
            ActivityType::parse("EXPORT_REQUEST_CREATION").unwrap(),
            ActivityType::ExportRequestCreation
        );
    }
}
