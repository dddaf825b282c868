use anyhow::Result;
use serde_json::Value;

use irecord_core::version::{document_version, DocumentVersion};
use irecord_core::{migrate, schemas};

use crate::args::DocumentCommand;
use crate::io;
use crate::output;

pub fn run(command: DocumentCommand) -> Result<()> {
    match command {
        DocumentCommand::Cleanup {
            document,
            version,
            strict,
            out,
        } => {
            let doc = io::read_json_file(&document)?;
            let version = resolve_version(&doc, version.as_deref())?;
            let cleaned = if strict {
                schemas::cleanup(version, &doc)
            } else {
                schemas::model_for(version).clean_up_document(&doc)
            };
            emit(&cleaned, out.as_deref())
        }

        DocumentCommand::Translate { document, version, out } => {
            let doc = io::read_json_file(&document)?;
            let version = resolve_version(&doc, version.as_deref())?;
            let translated = schemas::model_for(version).translate_document(&doc);
            emit(&translated, out.as_deref())
        }

        DocumentCommand::Migrate { document, out } => {
            let doc = io::read_json_file(&document)?;
            let upgraded = migrate::upgrade(&doc)?;
            emit(&upgraded, out.as_deref())
        }
    }
}

fn resolve_version(doc: &Value, requested: Option<&str>) -> Result<DocumentVersion> {
    match requested {
        Some(label) => Ok(DocumentVersion::parse(label)?),
        None => Ok(document_version(doc)?),
    }
}

fn emit(value: &Value, out: Option<&str>) -> Result<()> {
    match out {
        Some(path) => {
            io::write_json_file(path, value)?;
            output::line(&format!("wrote {path}"));
            Ok(())
        }
        None => output::print(value),
    }
}
