//! Record document operations.
//!
//! Each innovation owns one current document (the last submitted state) and
//! one draft (in-progress edits). Section edits land in the draft through the
//! strict per-version cleanup; submitting a section copies its draft answers
//! into the current document and tracks the section row's status.

use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use irecord_core::version::DocumentVersion;
use irecord_core::{migrate, schemas};

use crate::activity_log;
use crate::db::{now_rfc3339, Store};
use crate::entities::{ActivityType, DocumentRow, DraftRow, SectionRow, SectionStatus};
use crate::errors::{ErrorCode, ServiceError, ServiceResult};
use crate::innovations::get_innovation_conn;

impl Store {
    pub fn get_document(&self, innovation_id: &str) -> ServiceResult<DocumentRow> {
        let conn = self.lock();
        get_document_conn(&conn, innovation_id)
    }

    pub fn get_document_draft(&self, innovation_id: &str) -> ServiceResult<DraftRow> {
        let conn = self.lock();
        get_draft_conn(&conn, innovation_id)
    }

    /// Save in-progress answers for one subsection into the draft. The whole
    /// draft goes through the strict cleanup for its version, so mistyped or
    /// out-of-catalog values are dropped rather than stored.
    pub fn save_section_draft(
        &self,
        innovation_id: &str,
        section_id: &str,
        answers: &Value,
    ) -> ServiceResult<DraftRow> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        get_innovation_conn(&tx, innovation_id)?;

        let draft = get_draft_conn(&tx, innovation_id)?;
        let version = DocumentVersion::parse(&draft.version)?;
        if schemas::model_for(version).subsection(section_id).is_none() {
            return Err(ServiceError::NotFound(ErrorCode::SectionNotFound));
        }

        let mut candidate = match draft.document {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        candidate.insert(section_id.to_string(), answers.clone());
        let cleaned = schemas::cleanup(version, &Value::Object(candidate));
        let document_text = serde_json::to_string(&cleaned)?;

        let now = now_rfc3339();
        tx.execute(
            "UPDATE innovation_document_draft SET document = ?2, updated_at = ?3 WHERE innovation_id = ?1",
            params![innovation_id, document_text, now],
        )?;
        upsert_section(&tx, innovation_id, section_id, SectionStatus::Draft, None, &now)?;
        activity_log::record(
            &tx,
            innovation_id,
            ActivityType::SectionDraftUpdate,
            json!({ "section": section_id }),
        )?;
        tx.commit()?;

        debug!(innovation = %innovation_id, section = section_id, "section draft saved");
        Ok(DraftRow {
            innovation_id: innovation_id.to_string(),
            version: draft.version,
            document: cleaned,
            updated_at: now,
        })
    }

    /// Submit one section: its draft answers become part of the current
    /// document and the section row moves to SUBMITTED.
    pub fn submit_section(&self, innovation_id: &str, section_id: &str) -> ServiceResult<SectionRow> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        get_innovation_conn(&tx, innovation_id)?;

        let draft = get_draft_conn(&tx, innovation_id)?;
        let mut document = get_document_conn(&tx, innovation_id)?;
        if draft.version != document.version {
            return Err(ServiceError::UnprocessableEntity(ErrorCode::DocumentVersionMismatch));
        }

        let version = DocumentVersion::parse(&draft.version)?;
        if schemas::model_for(version).subsection(section_id).is_none() {
            return Err(ServiceError::NotFound(ErrorCode::SectionNotFound));
        }

        let answers = draft
            .document
            .get(section_id)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        if let Some(fields) = document.document.as_object_mut() {
            fields.insert(section_id.to_string(), answers);
        }
        let document_text = serde_json::to_string(&document.document)?;

        let now = now_rfc3339();
        tx.execute(
            "UPDATE innovation_document SET document = ?2, updated_at = ?3 WHERE innovation_id = ?1",
            params![innovation_id, document_text, now],
        )?;
        upsert_section(
            &tx,
            innovation_id,
            section_id,
            SectionStatus::Submitted,
            Some(&now),
            &now,
        )?;
        activity_log::record(
            &tx,
            innovation_id,
            ActivityType::SectionSubmission,
            json!({ "section": section_id }),
        )?;
        tx.commit()?;

        info!(innovation = %innovation_id, section = section_id, "section submitted");
        Ok(SectionRow {
            innovation_id: innovation_id.to_string(),
            section: section_id.to_string(),
            status: SectionStatus::Submitted,
            submitted_at: Some(now.clone()),
            updated_at: now,
        })
    }

    /// Section status rows for an innovation. Sections never edited have no
    /// row; callers decide how to present those.
    pub fn list_sections(&self, innovation_id: &str) -> ServiceResult<Vec<SectionRow>> {
        let conn = self.lock();
        get_innovation_conn(&conn, innovation_id)?;
        let mut stmt = conn.prepare(
            "SELECT section, status, submitted_at, updated_at
             FROM innovation_section WHERE innovation_id = ?1 ORDER BY section",
        )?;
        let raw: Vec<(String, String, Option<String>, String)> = stmt
            .query_map(params![innovation_id], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
            })?
            .collect::<Result<_, _>>()?;
        drop(stmt);
        drop(conn);

        raw.into_iter()
            .map(|(section, status, submitted_at, updated_at)| {
                Ok(SectionRow {
                    innovation_id: innovation_id.to_string(),
                    section,
                    status: SectionStatus::parse(&status)?,
                    submitted_at,
                    updated_at,
                })
            })
            .collect()
    }

    /// Lift both document and draft to the latest record version.
    pub fn migrate_document(&self, innovation_id: &str) -> ServiceResult<DocumentRow> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        get_innovation_conn(&tx, innovation_id)?;

        let mut document = get_document_conn(&tx, innovation_id)?;
        let draft = get_draft_conn(&tx, innovation_id)?;

        let target = DocumentVersion::latest();
        if document.version == target.as_str() && draft.version == target.as_str() {
            return Ok(document);
        }
        let from = document.version.clone();

        let upgraded_document = migrate::upgrade(&document.document)?;
        let upgraded_draft = migrate::upgrade(&draft.document)?;

        let now = now_rfc3339();
        tx.execute(
            "UPDATE innovation_document SET version = ?2, document = ?3, updated_at = ?4
             WHERE innovation_id = ?1",
            params![
                innovation_id,
                target.as_str(),
                serde_json::to_string(&upgraded_document)?,
                now
            ],
        )?;
        tx.execute(
            "UPDATE innovation_document_draft SET version = ?2, document = ?3, updated_at = ?4
             WHERE innovation_id = ?1",
            params![
                innovation_id,
                target.as_str(),
                serde_json::to_string(&upgraded_draft)?,
                now
            ],
        )?;
        activity_log::record(
            &tx,
            innovation_id,
            ActivityType::DocumentMigration,
            json!({ "from": &from, "to": target.as_str() }),
        )?;
        tx.commit()?;

        info!(innovation = %innovation_id, from = %from, to = target.as_str(), "document migrated");
        document.version = target.as_str().to_string();
        document.document = upgraded_document;
        document.updated_at = now;
        Ok(document)
    }
}

fn upsert_section(
    tx: &Transaction<'_>,
    innovation_id: &str,
    section_id: &str,
    status: SectionStatus,
    submitted_at: Option<&str>,
    now: &str,
) -> ServiceResult<()> {
    tx.execute(
        "INSERT INTO innovation_section (innovation_id, section, status, submitted_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (innovation_id, section)
         DO UPDATE SET status = ?3, submitted_at = COALESCE(?4, submitted_at), updated_at = ?5",
        params![innovation_id, section_id, status.as_str(), submitted_at, now],
    )?;
    Ok(())
}

pub(crate) fn get_document_conn(conn: &Connection, innovation_id: &str) -> ServiceResult<DocumentRow> {
    let raw: Option<(String, String, i64, String)> = conn
        .query_row(
            "SELECT version, document, is_snapshot, updated_at
             FROM innovation_document WHERE innovation_id = ?1",
            params![innovation_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .optional()?;

    let Some((version, document_text, is_snapshot, updated_at)) = raw else {
        return Err(ServiceError::NotFound(ErrorCode::DocumentNotFound));
    };
    Ok(DocumentRow {
        innovation_id: innovation_id.to_string(),
        version,
        document: serde_json::from_str(&document_text)?,
        is_snapshot: is_snapshot != 0,
        updated_at,
    })
}

pub(crate) fn get_draft_conn(conn: &Connection, innovation_id: &str) -> ServiceResult<DraftRow> {
    let raw: Option<(String, String, String)> = conn
        .query_row(
            "SELECT version, document, updated_at
             FROM innovation_document_draft WHERE innovation_id = ?1",
            params![innovation_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;

    let Some((version, document_text, updated_at)) = raw else {
        return Err(ServiceError::NotFound(ErrorCode::DraftNotFound));
    };
    Ok(DraftRow {
        innovation_id: innovation_id.to_string(),
        version,
        document: serde_json::from_str(&document_text)?,
        updated_at,
    })
}
