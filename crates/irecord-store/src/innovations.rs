//! Innovation lifecycle operations.
//!
//! Every operation validates its preconditions with direct queries, fails
//! with a typed error, and performs the mutation inside one transaction when
//! more than one table is touched. An activity-log entry is written inside
//! the same transaction, so the log only ever reflects committed state.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use irecord_core::schemas;
use irecord_core::version::DocumentVersion;

use crate::activity_log;
use crate::db::{now_rfc3339, Store};
use crate::entities::{ActivityType, InnovationRow, InnovationStatus, SupportRow, SupportStatus};
use crate::errors::{ErrorCode, ServiceError, ServiceResult};

impl Store {
    /// Create an innovation, seeding its document and draft at the latest
    /// record version. A seed document (e.g. survey answers) goes through the
    /// strict per-version cleanup before being stored.
    pub fn create_innovation(
        &self,
        name: &str,
        owner_id: &str,
        seed: Option<&serde_json::Value>,
    ) -> ServiceResult<InnovationRow> {
        let version = DocumentVersion::latest();
        let document = match seed {
            Some(seed) => schemas::cleanup(version, seed),
            None => schemas::new_document(version),
        };
        let document_text = serde_json::to_string(&document)?;

        let now = now_rfc3339();
        let row = InnovationRow {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            owner_id: owner_id.to_string(),
            status: InnovationStatus::Created,
            previous_status: None,
            created_at: now.clone(),
            updated_at: now.clone(),
            submitted_at: None,
        };

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO innovation (id, name, owner_id, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![row.id, row.name, row.owner_id, row.status.as_str(), now, now],
        )?;
        tx.execute(
            "INSERT INTO innovation_document (innovation_id, version, document, is_snapshot, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![row.id, version.as_str(), document_text, now],
        )?;
        tx.execute(
            "INSERT INTO innovation_document_draft (innovation_id, version, document, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![row.id, version.as_str(), document_text, now],
        )?;
        activity_log::record(&tx, &row.id, ActivityType::InnovationCreation, json!({ "name": name }))?;
        tx.commit()?;

        info!(innovation = %row.id, name, "innovation created");
        Ok(row)
    }

    pub fn get_innovation(&self, id: &str) -> ServiceResult<InnovationRow> {
        let conn = self.lock();
        get_innovation_conn(&conn, id)
    }

    /// Submit for needs assessment. Requires status CREATED and every
    /// *existing* section row to be SUBMITTED; a section that never got a row
    /// does not block submission. The draft becomes the submitted snapshot.
    pub fn submit_innovation(&self, id: &str) -> ServiceResult<InnovationRow> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let mut row = get_innovation_conn(&tx, id)?;
        match row.status {
            InnovationStatus::Created => {}
            InnovationStatus::Archived => {
                return Err(ServiceError::UnprocessableEntity(ErrorCode::InnovationArchived))
            }
            InnovationStatus::Withdrawn => {
                return Err(ServiceError::UnprocessableEntity(ErrorCode::InnovationWithdrawn))
            }
            _ => {
                return Err(ServiceError::UnprocessableEntity(
                    ErrorCode::InnovationAlreadySubmitted,
                ))
            }
        }

        let incomplete: i64 = tx.query_row(
            "SELECT count(*) FROM innovation_section
             WHERE innovation_id = ?1 AND status <> 'SUBMITTED'",
            params![id],
            |r| r.get(0),
        )?;
        if incomplete > 0 {
            return Err(ServiceError::UnprocessableEntity(
                ErrorCode::InnovationSectionsIncomplete,
            ));
        }

        let draft: Option<(String, String)> = tx
            .query_row(
                "SELECT version, document FROM innovation_document_draft WHERE innovation_id = ?1",
                params![id],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        let Some((version, document)) = draft else {
            return Err(ServiceError::NotFound(ErrorCode::DraftNotFound));
        };

        let now = now_rfc3339();
        let updated = tx.execute(
            "UPDATE innovation_document
             SET version = ?2, document = ?3, is_snapshot = 1, updated_at = ?4
             WHERE innovation_id = ?1",
            params![id, version, document, now],
        )?;
        if updated == 0 {
            return Err(ServiceError::NotFound(ErrorCode::DocumentNotFound));
        }

        row.status = InnovationStatus::WaitingNeedsAssessment;
        row.submitted_at = Some(now.clone());
        row.updated_at = now.clone();
        tx.execute(
            "UPDATE innovation SET status = ?2, submitted_at = ?3, updated_at = ?3 WHERE id = ?1",
            params![id, row.status.as_str(), now],
        )?;
        activity_log::record(&tx, id, ActivityType::InnovationSubmission, json!({}))?;
        tx.commit()?;

        info!(innovation = %id, "innovation submitted for needs assessment");
        Ok(row)
    }

    /// Withdraw an innovation: close supports, cancel pending export
    /// requests, mark WITHDRAWN. Allowed from any status but WITHDRAWN.
    pub fn withdraw_innovation(&self, id: &str, reason: &str) -> ServiceResult<InnovationRow> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let mut row = get_innovation_conn(&tx, id)?;
        if row.status == InnovationStatus::Withdrawn {
            return Err(ServiceError::UnprocessableEntity(ErrorCode::InnovationWithdrawn));
        }

        let now = now_rfc3339();
        let closed = tx.execute(
            "UPDATE innovation_support SET status = 'CLOSED', updated_at = ?2
             WHERE innovation_id = ?1 AND status <> 'CLOSED'",
            params![id, now],
        )?;
        let cancelled = tx.execute(
            "UPDATE innovation_export_request SET status = 'CANCELLED', updated_at = ?2
             WHERE innovation_id = ?1 AND status = 'PENDING'",
            params![id, now],
        )?;

        row.previous_status = Some(row.status);
        row.status = InnovationStatus::Withdrawn;
        row.updated_at = now.clone();
        tx.execute(
            "UPDATE innovation SET status = 'WITHDRAWN', previous_status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, row.previous_status.map(|s| s.as_str()), now],
        )?;
        activity_log::record(
            &tx,
            id,
            ActivityType::InnovationWithdrawal,
            json!({ "reason": reason, "closedSupports": closed, "cancelledExportRequests": cancelled }),
        )?;
        tx.commit()?;

        info!(innovation = %id, closed, cancelled, "innovation withdrawn");
        Ok(row)
    }

    /// Archive an innovation: close supports, reject pending export requests,
    /// keep the prior status so the archive can be reverted elsewhere.
    pub fn archive_innovation(&self, id: &str) -> ServiceResult<InnovationRow> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let mut row = get_innovation_conn(&tx, id)?;
        match row.status {
            InnovationStatus::Archived => {
                return Err(ServiceError::UnprocessableEntity(ErrorCode::InnovationArchived))
            }
            InnovationStatus::Withdrawn => {
                return Err(ServiceError::UnprocessableEntity(ErrorCode::InnovationWithdrawn))
            }
            _ => {}
        }

        let now = now_rfc3339();
        tx.execute(
            "UPDATE innovation_support SET status = 'CLOSED', updated_at = ?2
             WHERE innovation_id = ?1 AND status <> 'CLOSED'",
            params![id, now],
        )?;
        tx.execute(
            "UPDATE innovation_export_request
             SET status = 'REJECTED', reject_reason = ?2, updated_at = ?3
             WHERE innovation_id = ?1 AND status = 'PENDING'",
            params![id, "Innovation was archived by its owner", now],
        )?;

        row.previous_status = Some(row.status);
        row.status = InnovationStatus::Archived;
        row.updated_at = now.clone();
        tx.execute(
            "UPDATE innovation SET status = 'ARCHIVED', previous_status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, row.previous_status.map(|s| s.as_str()), now],
        )?;
        activity_log::record(&tx, id, ActivityType::InnovationArchive, json!({}))?;
        tx.commit()?;

        info!(innovation = %id, "innovation archived");
        Ok(row)
    }

    /// Replace the set of organisations the innovation is shared with.
    /// Removed organisations lose their supports and have their pending
    /// export requests rejected, atomically with the share change.
    pub fn update_innovation_shares(
        &self,
        id: &str,
        organisation_ids: &[String],
    ) -> ServiceResult<Vec<String>> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        get_innovation_conn(&tx, id)?;

        let current: Vec<String> = {
            let mut stmt = tx.prepare(
                "SELECT organisation_id FROM innovation_share WHERE innovation_id = ?1",
            )?;
            let rows = stmt
                .query_map(params![id], |r| r.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            rows
        };

        let removed: Vec<&String> =
            current.iter().filter(|org| !organisation_ids.contains(org)).collect();
        let added: Vec<&String> =
            organisation_ids.iter().filter(|org| !current.contains(org)).collect();

        let now = now_rfc3339();
        for org in &removed {
            tx.execute(
                "DELETE FROM innovation_share WHERE innovation_id = ?1 AND organisation_id = ?2",
                params![id, org],
            )?;
            tx.execute(
                "UPDATE innovation_export_request
                 SET status = 'REJECTED', reject_reason = ?3, updated_at = ?4
                 WHERE innovation_id = ?1 AND organisation_id = ?2 AND status = 'PENDING'",
                params![id, org, "Innovation stopped sharing with this organisation", now],
            )?;
            tx.execute(
                "UPDATE innovation_support SET status = 'CLOSED', updated_at = ?3
                 WHERE innovation_id = ?1 AND organisation_unit = ?2 AND status <> 'CLOSED'",
                params![id, org, now],
            )?;
        }
        for org in &added {
            tx.execute(
                "INSERT INTO innovation_share (innovation_id, organisation_id) VALUES (?1, ?2)",
                params![id, org],
            )?;
        }

        let (added_count, removed_count) = (added.len(), removed.len());
        activity_log::record(
            &tx,
            id,
            ActivityType::SharesUpdate,
            json!({ "added": added, "removed": removed }),
        )?;
        tx.commit()?;

        debug!(innovation = %id, added = added_count, removed = removed_count, "shares updated");
        Ok(organisation_ids.to_vec())
    }

    /// Organisations the innovation is currently shared with.
    pub fn innovation_shares(&self, id: &str) -> ServiceResult<Vec<String>> {
        let conn = self.lock();
        get_innovation_conn(&conn, id)?;
        let mut stmt = conn.prepare(
            "SELECT organisation_id FROM innovation_share
             WHERE innovation_id = ?1 ORDER BY organisation_id",
        )?;
        let rows = stmt
            .query_map(params![id], |r| r.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }

    /// Register a support relationship from an accessor organisation unit.
    pub fn add_support(&self, innovation_id: &str, organisation_unit: &str) -> ServiceResult<SupportRow> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        get_innovation_conn(&tx, innovation_id)?;

        let now = now_rfc3339();
        let row = SupportRow {
            id: Uuid::new_v4().to_string(),
            innovation_id: innovation_id.to_string(),
            organisation_unit: organisation_unit.to_string(),
            status: SupportStatus::Waiting,
            updated_at: now.clone(),
        };
        tx.execute(
            "INSERT INTO innovation_support (id, innovation_id, organisation_unit, status, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row.id, row.innovation_id, row.organisation_unit, row.status.as_str(), now],
        )?;
        activity_log::record(
            &tx,
            innovation_id,
            ActivityType::SupportStatusUpdate,
            json!({ "organisationUnit": organisation_unit, "status": row.status.as_str() }),
        )?;
        tx.commit()?;
        Ok(row)
    }

    pub fn update_support_status(&self, support_id: &str, status: SupportStatus) -> ServiceResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let innovation_id: Option<String> = tx
            .query_row(
                "SELECT innovation_id FROM innovation_support WHERE id = ?1",
                params![support_id],
                |r| r.get(0),
            )
            .optional()?;
        let Some(innovation_id) = innovation_id else {
            return Err(ServiceError::NotFound(ErrorCode::SupportNotFound));
        };

        tx.execute(
            "UPDATE innovation_support SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![support_id, status.as_str(), now_rfc3339()],
        )?;
        activity_log::record(
            &tx,
            &innovation_id,
            ActivityType::SupportStatusUpdate,
            json!({ "supportId": support_id, "status": status.as_str() }),
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Innovations waiting for needs assessment whose submission is older
    /// than the caller-provided RFC 3339 cutoff.
    pub fn count_assessment_overdue(&self, submitted_before: &str) -> ServiceResult<u64> {
        let conn = self.lock();
        let count: i64 = conn.query_row(
            "SELECT count(*) FROM innovation
             WHERE status = 'WAITING_NEEDS_ASSESSMENT'
               AND submitted_at IS NOT NULL AND submitted_at < ?1",
            params![submitted_before],
            |r| r.get(0),
        )?;
        Ok(count as u64)
    }

    /// Supports of an innovation, newest first.
    pub fn list_supports(&self, innovation_id: &str) -> ServiceResult<Vec<SupportRow>> {
        let conn = self.lock();
        get_innovation_conn(&conn, innovation_id)?;
        let mut stmt = conn.prepare(
            "SELECT id, innovation_id, organisation_unit, status, updated_at
             FROM innovation_support WHERE innovation_id = ?1 ORDER BY updated_at DESC, id",
        )?;
        let raw: Vec<(String, String, String, String, String)> = stmt
            .query_map(params![innovation_id], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
            })?
            .collect::<Result<_, _>>()?;
        drop(stmt);
        drop(conn);

        raw.into_iter()
            .map(|(id, innovation_id, organisation_unit, status, updated_at)| {
                Ok(SupportRow {
                    id,
                    innovation_id,
                    organisation_unit,
                    status: SupportStatus::parse(&status)?,
                    updated_at,
                })
            })
            .collect()
    }
}

/// Fetch an innovation through any connection-like handle (plain connection
/// or open transaction).
pub(crate) fn get_innovation_conn(conn: &Connection, id: &str) -> ServiceResult<InnovationRow> {
    let raw: Option<(String, String, String, Option<String>, String, String, Option<String>)> = conn
        .query_row(
            "SELECT name, owner_id, status, previous_status, created_at, updated_at, submitted_at
             FROM innovation WHERE id = ?1",
            params![id],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                ))
            },
        )
        .optional()?;

    let Some((name, owner_id, status, previous_status, created_at, updated_at, submitted_at)) = raw
    else {
        return Err(ServiceError::NotFound(ErrorCode::InnovationNotFound));
    };

    Ok(InnovationRow {
        id: id.to_string(),
        name,
        owner_id,
        status: InnovationStatus::parse(&status)?,
        previous_status: previous_status
            .as_deref()
            .map(InnovationStatus::parse)
            .transpose()?,
        created_at,
        updated_at,
        submitted_at,
    })
}
