//! Append-only registry of published record definitions.
//!
//! One row per published revision: version label, the schema JSON exactly as
//! published, and a sha-256 digest over those stored bytes. Publishing runs
//! the full rule engine first; a candidate with violations is refused, and
//! the violations come back as data rather than as an error.

use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use irecord_core::rules::{load_schema, LoadedSchema, ValidationReport};

use crate::db::{now_rfc3339, Store};
use crate::entities::SchemaRow;
use crate::errors::{ErrorCode, ServiceError, ServiceResult};

/// The result of a publish attempt. Rule violations are not errors.
#[derive(Debug)]
pub enum PublishOutcome {
    Published(SchemaRow),
    Rejected(ValidationReport),
}

impl Store {
    /// Validate and append a new schema revision.
    pub fn publish_schema(&self, version_label: &str, schema: &Value) -> ServiceResult<PublishOutcome> {
        if let Err(report) = load_schema(schema) {
            return Ok(PublishOutcome::Rejected(report));
        }

        let conn = self.lock();
        let exists: Option<String> = conn
            .query_row(
                "SELECT id FROM innovation_record_schema WHERE version_label = ?1",
                params![version_label],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(ServiceError::Conflict(ErrorCode::SchemaVersionDuplicated));
        }

        let schema_text = serde_json::to_string(schema)?;
        let digest = hex::encode(Sha256::digest(schema_text.as_bytes()));
        let row = SchemaRow {
            id: Uuid::new_v4().to_string(),
            version_label: version_label.to_string(),
            schema: schema.clone(),
            digest,
            created_at: now_rfc3339(),
        };

        conn.execute(
            "INSERT INTO innovation_record_schema (id, version_label, schema, digest, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row.id, row.version_label, schema_text, row.digest, row.created_at],
        )?;

        info!(version = version_label, digest = %row.digest, "schema revision published");
        Ok(PublishOutcome::Published(row))
    }

    /// The most recently published revision, loaded and validated.
    pub fn load_active_schema(&self) -> ServiceResult<(SchemaRow, LoadedSchema)> {
        let conn = self.lock();
        let raw: Option<(String, String, String, String, String)> = conn
            .query_row(
                "SELECT id, version_label, schema, digest, created_at
                 FROM innovation_record_schema
                 ORDER BY created_at DESC, id DESC LIMIT 1",
                [],
                |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
                },
            )
            .optional()?;
        drop(conn);

        let Some((id, version_label, schema_text, digest, created_at)) = raw else {
            return Err(ServiceError::NotFound(ErrorCode::SchemaVersionNotFound));
        };

        let schema: Value = serde_json::from_str(&schema_text)?;
        let loaded = load_schema(&schema).map_err(|report| {
            // A stored revision that no longer passes the rules is corruption:
            // publishing validated it, so the rules or the row have drifted.
            ServiceError::InvalidStoredValue(format!(
                "stored schema {version_label} has {} rule violations",
                report.len()
            ))
        })?;

        let row = SchemaRow {
            id,
            version_label,
            schema,
            digest,
            created_at,
        };
        Ok((row, loaded))
    }

    /// Fetch one revision by label.
    pub fn get_schema(&self, version_label: &str) -> ServiceResult<SchemaRow> {
        let conn = self.lock();
        let raw: Option<(String, String, String, String)> = conn
            .query_row(
                "SELECT id, schema, digest, created_at
                 FROM innovation_record_schema WHERE version_label = ?1",
                params![version_label],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;
        drop(conn);

        let Some((id, schema_text, digest, created_at)) = raw else {
            return Err(ServiceError::NotFound(ErrorCode::SchemaVersionNotFound));
        };
        Ok(SchemaRow {
            id,
            version_label: version_label.to_string(),
            schema: serde_json::from_str(&schema_text)?,
            digest,
            created_at,
        })
    }

    /// Every published revision, oldest first.
    pub fn list_schemas(&self) -> ServiceResult<Vec<SchemaRow>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, version_label, schema, digest, created_at
             FROM innovation_record_schema ORDER BY created_at ASC, id ASC",
        )?;
        let raw: Vec<(String, String, String, String, String)> = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?
            .collect::<Result<_, _>>()?;
        drop(stmt);
        drop(conn);

        raw.into_iter()
            .map(|(id, version_label, schema_text, digest, created_at)| {
                Ok(SchemaRow {
                    id,
                    version_label,
                    schema: serde_json::from_str(&schema_text)?,
                    digest,
                    created_at,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use irecord_core::schemas;
    use irecord_core::version::DocumentVersion;
    use serde_json::json;

    fn built_in() -> Value {
        serde_json::to_value(schemas::schema_for(DocumentVersion::V202304)).unwrap()
    }

    #[test]
    fn publish_and_load_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let outcome = store.publish_schema("202304", &built_in()).unwrap();
        let row = match outcome {
            PublishOutcome::Published(row) => row,
            PublishOutcome::Rejected(report) => panic!("rejected: {:?}", report.violations),
        };
        assert_eq!(row.version_label, "202304");
        assert_eq!(row.digest.len(), 64);

        let (active, loaded) = store.load_active_schema().unwrap();
        assert_eq!(active.id, row.id);
        assert!(!loaded.required.by_subsection.is_empty());
    }

    #[test]
    fn invalid_schemas_are_rejected_with_report() {
        let store = Store::open_in_memory().unwrap();
        let bad = json!({
            "sections": [
                { "id": "dup", "title": "A", "subSections": [] },
                { "id": "dup", "title": "B", "subSections": [] }
            ]
        });
        let outcome = store.publish_schema("203001", &bad).unwrap();
        assert_matches!(outcome, PublishOutcome::Rejected(report) if !report.is_valid());
        assert!(store.list_schemas().unwrap().is_empty());
    }

    #[test]
    fn duplicate_labels_conflict() {
        let store = Store::open_in_memory().unwrap();
        store.publish_schema("202304", &built_in()).unwrap();
        let err = store.publish_schema("202304", &built_in()).unwrap_err();
        assert_matches!(err, ServiceError::Conflict(ErrorCode::SchemaVersionDuplicated));
    }

    #[test]
    fn empty_registry_has_no_active_schema() {
        let store = Store::open_in_memory().unwrap();
        let err = store.load_active_schema().unwrap_err();
        assert_matches!(err, ServiceError::NotFound(ErrorCode::SchemaVersionNotFound));
    }
}
