//! Export requests.
//!
//! An accessor organisation asks the innovator for permission to export the
//! innovation record. Requests start PENDING; the innovator approves or
//! rejects (a rejection must carry a reason), and the requesting side may
//! cancel its own pending request.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::activity_log;
use crate::db::{now_rfc3339, Store};
use crate::entities::{ActivityType, ExportRequestRow, ExportRequestStatus};
use crate::errors::{ErrorCode, ServiceError, ServiceResult};
use crate::innovations::get_innovation_conn;

impl Store {
    /// File a new export request. The innovation must currently be shared
    /// with the requesting organisation.
    pub fn create_export_request(
        &self,
        innovation_id: &str,
        organisation_id: &str,
        created_by: &str,
        request_reason: &str,
    ) -> ServiceResult<ExportRequestRow> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        get_innovation_conn(&tx, innovation_id)?;

        let shared: Option<String> = tx
            .query_row(
                "SELECT organisation_id FROM innovation_share
                 WHERE innovation_id = ?1 AND organisation_id = ?2",
                params![innovation_id, organisation_id],
                |r| r.get(0),
            )
            .optional()?;
        if shared.is_none() {
            return Err(ServiceError::Forbidden(ErrorCode::InnovationNotShared));
        }

        let now = now_rfc3339();
        let row = ExportRequestRow {
            id: Uuid::new_v4().to_string(),
            innovation_id: innovation_id.to_string(),
            organisation_id: organisation_id.to_string(),
            created_by: created_by.to_string(),
            status: ExportRequestStatus::Pending,
            request_reason: request_reason.to_string(),
            reject_reason: None,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        tx.execute(
            "INSERT INTO innovation_export_request
               (id, innovation_id, organisation_id, created_by, status, request_reason, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                row.id,
                row.innovation_id,
                row.organisation_id,
                row.created_by,
                row.status.as_str(),
                row.request_reason,
                now,
                now
            ],
        )?;
        activity_log::record(
            &tx,
            innovation_id,
            ActivityType::ExportRequestCreation,
            json!({ "requestId": &row.id, "organisation": organisation_id }),
        )?;
        tx.commit()?;

        info!(innovation = %innovation_id, request = %row.id, "export request created");
        Ok(row)
    }

    pub fn get_export_request(&self, id: &str) -> ServiceResult<ExportRequestRow> {
        let conn = self.lock();
        get_export_request_conn(&conn, id)
    }

    /// Requests for an innovation, newest first, optionally filtered by status.
    pub fn list_export_requests(
        &self,
        innovation_id: &str,
        status: Option<ExportRequestStatus>,
    ) -> ServiceResult<Vec<ExportRequestRow>> {
        let conn = self.lock();
        get_innovation_conn(&conn, innovation_id)?;

        let mut sql = String::from(
            "SELECT id, organisation_id, created_by, status, request_reason, reject_reason, created_at, updated_at
             FROM innovation_export_request WHERE innovation_id = ?1",
        );
        if status.is_some() {
            sql.push_str(" AND status = ?2");
        }
        sql.push_str(" ORDER BY created_at DESC, id");

        let mut stmt = conn.prepare(&sql)?;
        let map_row = |r: &rusqlite::Row<'_>| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
                r.get::<_, Option<String>>(5)?,
                r.get::<_, String>(6)?,
                r.get::<_, String>(7)?,
            ))
        };
        let raw: Vec<_> = match status {
            Some(s) => stmt
                .query_map(params![innovation_id, s.as_str()], map_row)?
                .collect::<Result<_, _>>()?,
            None => stmt
                .query_map(params![innovation_id], map_row)?
                .collect::<Result<_, _>>()?,
        };
        drop(stmt);
        drop(conn);

        raw.into_iter()
            .map(
                |(id, organisation_id, created_by, status, request_reason, reject_reason, created_at, updated_at)| {
                    Ok(ExportRequestRow {
                        id,
                        innovation_id: innovation_id.to_string(),
                        organisation_id,
                        created_by,
                        status: ExportRequestStatus::parse(&status)?,
                        request_reason,
                        reject_reason,
                        created_at,
                        updated_at,
                    })
                },
            )
            .collect()
    }

    /// Resolve a pending request. APPROVED and REJECTED are the innovator's
    /// decisions (a rejection must carry a reason); CANCELLED is only
    /// available to whoever filed the request.
    pub fn update_export_request_status(
        &self,
        id: &str,
        status: ExportRequestStatus,
        actor: &str,
        reject_reason: Option<&str>,
    ) -> ServiceResult<ExportRequestRow> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let mut row = get_export_request_conn(&tx, id)?;
        if row.status != ExportRequestStatus::Pending {
            return Err(ServiceError::UnprocessableEntity(ErrorCode::ExportRequestNotPending));
        }

        match status {
            ExportRequestStatus::Pending => {
                return Err(ServiceError::UnprocessableEntity(ErrorCode::ExportRequestNotPending))
            }
            ExportRequestStatus::Rejected => {
                if reject_reason.map(str::trim).filter(|r| !r.is_empty()).is_none() {
                    return Err(ServiceError::UnprocessableEntity(
                        ErrorCode::ExportRequestRejectReasonRequired,
                    ));
                }
            }
            ExportRequestStatus::Cancelled => {
                if row.created_by != actor {
                    return Err(ServiceError::Forbidden(ErrorCode::ExportRequestWrongRequester));
                }
            }
            ExportRequestStatus::Approved => {}
        }

        let now = now_rfc3339();
        row.status = status;
        row.reject_reason = reject_reason.map(str::to_string);
        row.updated_at = now.clone();
        tx.execute(
            "UPDATE innovation_export_request
             SET status = ?2, reject_reason = ?3, updated_at = ?4 WHERE id = ?1",
            params![id, status.as_str(), row.reject_reason, now],
        )?;
        activity_log::record(
            &tx,
            &row.innovation_id,
            ActivityType::ExportRequestStatusUpdate,
            json!({ "requestId": id, "status": status.as_str() }),
        )?;
        tx.commit()?;

        info!(request = %id, status = status.as_str(), "export request resolved");
        Ok(row)
    }
}

fn get_export_request_conn(conn: &Connection, id: &str) -> ServiceResult<ExportRequestRow> {
    let raw: Option<(String, String, String, String, String, Option<String>, String, String)> = conn
        .query_row(
            "SELECT innovation_id, organisation_id, created_by, status, request_reason, reject_reason, created_at, updated_at
             FROM innovation_export_request WHERE id = ?1",
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
                    r.get(7)?,
                ))
            },
        )
        .optional()?;

    let Some((innovation_id, organisation_id, created_by, status, request_reason, reject_reason, created_at, updated_at)) =
        raw
    else {
        return Err(ServiceError::NotFound(ErrorCode::ExportRequestNotFound));
    };

    Ok(ExportRequestRow {
        id: id.to_string(),
        innovation_id,
        organisation_id,
        created_by,
        status: ExportRequestStatus::parse(&status)?,
        request_reason,
        reject_reason,
        created_at,
        updated_at,
    })
}
