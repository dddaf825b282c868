use anyhow::{bail, Result};
use serde::Serialize;

use irecord_core::schemas;
use irecord_core::version::DocumentVersion;

use crate::args::Cli;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

pub fn run(cli: &Cli) -> Result<()> {
    let mut checks = Vec::new();

    for version in [DocumentVersion::V202209, DocumentVersion::V202304] {
        let report = schemas::model_for(version).run_rules();
        checks.push(Check {
            name: format!("builtin-schema-{}", version.as_str()),
            ok: report.is_valid(),
            detail: if report.is_valid() {
                "passes all rules".to_string()
            } else {
                format!("{} rule violation(s)", report.len())
            },
        });
    }

    match crate::cmd::schema::open_check(&cli.store) {
        Ok(detail) => checks.push(Check {
            name: "store".to_string(),
            ok: true,
            detail,
        }),
        Err(e) => checks.push(Check {
            name: "store".to_string(),
            ok: false,
            detail: e.to_string(),
        }),
    }

    let failed = checks.iter().filter(|c| !c.ok).count();
    if output::is_json() {
        output::print(&checks)?;
    } else {
        for check in &checks {
            let status = if check.ok { "ok " } else { "FAIL" };
            output::line(&format!("{status} {name}: {detail}", name = check.name, detail = check.detail));
        }
    }

    if failed > 0 {
        bail!("{failed} check(s) failed");
    }
    Ok(())
}
