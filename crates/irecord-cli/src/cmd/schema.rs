use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use irecord_store::schema_registry::PublishOutcome;
use irecord_store::Store;

use crate::args::{Cli, SchemaCommand};
use crate::io;
use crate::output;

#[derive(Debug, Serialize)]
pub struct SchemaSummary {
    pub id: String,
    pub version: String,
    pub digest: String,
    pub created_at: String,
}

pub fn run(cli: &Cli, command: SchemaCommand) -> Result<()> {
    let store = open_store(&cli.store)?;

    match command {
        SchemaCommand::Publish { schema, version } => {
            let value = io::read_json_file(&schema)?;
            match store.publish_schema(&version, &value)? {
                PublishOutcome::Published(row) => {
                    output::print(&SchemaSummary {
                        id: row.id,
                        version: row.version_label,
                        digest: row.digest,
                        created_at: row.created_at,
                    })?;
                    Ok(())
                }
                PublishOutcome::Rejected(report) => {
                    let count = report.len();
                    if output::is_json() {
                        output::print(&report)?;
                    } else {
                        for violation in &report.violations {
                            output::error_line(&format!("[{}] {}", violation.code, violation.message));
                        }
                    }
                    bail!("schema rejected with {count} rule violation(s)");
                }
            }
        }

        SchemaCommand::List => {
            let rows = store.list_schemas()?;
            let summaries: Vec<SchemaSummary> = rows
                .into_iter()
                .map(|row| SchemaSummary {
                    id: row.id,
                    version: row.version_label,
                    digest: row.digest,
                    created_at: row.created_at,
                })
                .collect();
            output::print(&summaries)
        }
    }
}

/// Doctor check: can the store be opened and read?
pub fn open_check(path: &str) -> Result<String> {
    let store = open_store(path)?;
    let revisions = store.list_schemas()?.len();
    Ok(format!("{path} reachable, {revisions} published revision(s)"))
}

fn open_store(path: &str) -> Result<Store> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Store::open(path).with_context(|| format!("failed to open store at {path}"))
}
