use anyhow::{bail, Result};
use serde::Serialize;

use irecord_core::rules::{RuleViolation, SchemaModel};

use crate::io;
use crate::output;

#[derive(Debug, Serialize)]
pub struct ValidateOut {
    pub ok: bool,
    pub violations: Vec<RuleViolation>,
}

pub fn run(schema_path: &str) -> Result<()> {
    let value = io::read_json_file(schema_path)?;

    // Structural failures and semantic violations share the report shape;
    // either way every problem is listed, nothing stops at the first.
    let report = match SchemaModel::from_value(&value) {
        Ok(model) => model.run_rules(),
        Err(structural) => structural,
    };

    let count = report.len();
    let out = ValidateOut {
        ok: report.is_valid(),
        violations: report.violations,
    };

    if output::is_json() {
        output::print(&out)?;
    } else if out.ok {
        output::line("schema is valid");
    } else {
        for violation in &out.violations {
            output::error_line(&format!("[{}] {}", violation.code, violation.message));
        }
    }

    if !out.ok {
        bail!("schema has {count} rule violation(s)");
    }
    Ok(())
}
