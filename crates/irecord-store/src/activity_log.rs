//! Activity log.
//!
//! Every mutating service operation appends one entry inside its own
//! transaction, so the log never records work that rolled back.

use rusqlite::{params, Transaction};
use serde_json::Value;

use crate::db::{now_rfc3339, Store};
use crate::entities::{ActivityLogRow, ActivityType};
use crate::errors::ServiceResult;

/// Append an entry within the caller's transaction.
pub(crate) fn record(
    tx: &Transaction<'_>,
    innovation_id: &str,
    activity: ActivityType,
    params_json: Value,
) -> ServiceResult<()> {
    tx.execute(
        "INSERT INTO activity_log (innovation_id, activity, params, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            innovation_id,
            activity.as_str(),
            serde_json::to_string(&params_json)?,
            now_rfc3339()
        ],
    )?;
    Ok(())
}

impl Store {
    /// List activity for an innovation, newest first, optionally filtered by
    /// activity types. `limit`/`offset` page through the history.
    pub fn list_activity_log(
        &self,
        innovation_id: &str,
        activity_types: &[ActivityType],
        limit: usize,
        offset: usize,
    ) -> ServiceResult<Vec<ActivityLogRow>> {
        let conn = self.lock();

        // The filter set is small and closed, so an IN list built from the
        // enum's own codes is safe here.
        let filter = if activity_types.is_empty() {
            String::new()
        } else {
            let codes: Vec<String> = activity_types
                .iter()
                .map(|a| format!("'{}'", a.as_str()))
                .collect();
            format!("AND activity IN ({})", codes.join(", "))
        };

        let sql = format!(
            "SELECT seq, innovation_id, activity, params, created_at
             FROM activity_log
             WHERE innovation_id = ?1 {filter}
             ORDER BY seq DESC LIMIT ?2 OFFSET ?3"
        );

        let mut stmt = conn.prepare(&sql)?;
        let raw: Vec<(i64, String, String, String, String)> = stmt
            .query_map(params![innovation_id, limit as i64, offset as i64], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?
            .collect::<Result<_, _>>()?;
        drop(stmt);
        drop(conn);

        raw.into_iter()
            .map(|(seq, innovation_id, activity, params_text, created_at)| {
                Ok(ActivityLogRow {
                    seq,
                    innovation_id,
                    activity: ActivityType::parse(&activity)?,
                    params: serde_json::from_str(&params_text)?,
                    created_at,
                })
            })
            .collect()
    }
}
