//! Document migration across record versions.
//!
//! Stored documents carry the version they were authored against. When the
//! published definition moves on, historical documents are lifted in place:
//! moved questions are re-keyed, renamed catalog codes are remapped, and the
//! result goes through the target version's strict cleanup so that retired
//! questions disappear.

use serde_json::Value;

use crate::errors::CoreResult;
use crate::schemas;
use crate::version::{document_version, DocumentVersion};

/// Lift a document to the latest record version. Documents already at the
/// latest version pass through unchanged.
pub fn upgrade(doc: &Value) -> CoreResult<Value> {
    let version = document_version(doc)?;
    match version {
        DocumentVersion::V202209 => Ok(upgrade_202209_to_202304(doc)),
        DocumentVersion::V202304 => Ok(doc.clone()),
    }
}

/// 202209 → 202304:
/// - VALUE_PROPOSITION merged into UNDERSTANDING_OF_NEEDS
///   (`intervention` becomes `howInnovationWork`)
/// - `SERVICE_INTERVENTION` category code becomes `MODELS_CARE`
/// - retired questions (`hasFinalProduct`, `impactPatients`, …) are removed
///   by the target version's cleanup
fn upgrade_202209_to_202304(doc: &Value) -> Value {
    let mut doc = doc.clone();

    move_field(&mut doc, "VALUE_PROPOSITION", "problemsTackled", "UNDERSTANDING_OF_NEEDS", "problemsTackled");
    move_field(&mut doc, "VALUE_PROPOSITION", "intervention", "UNDERSTANDING_OF_NEEDS", "howInnovationWork");

    remap_code(&mut doc, "INNOVATION_DESCRIPTION", "categories", "SERVICE_INTERVENTION", "MODELS_CARE");
    remap_code(&mut doc, "INNOVATION_DESCRIPTION", "mainCategory", "SERVICE_INTERVENTION", "MODELS_CARE");

    schemas::cleanup(DocumentVersion::V202304, &doc)
}

fn move_field(doc: &mut Value, from_sub: &str, from_field: &str, to_sub: &str, to_field: &str) {
    let Some(value) = doc
        .get_mut(from_sub)
        .and_then(Value::as_object_mut)
        .and_then(|fields| fields.remove(from_field))
    else {
        return;
    };

    let Some(root) = doc.as_object_mut() else {
        return;
    };
    let target = root
        .entry(to_sub.to_string())
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    if let Some(fields) = target.as_object_mut() {
        fields.insert(to_field.to_string(), value);
    }
}

/// Replace a renamed catalog code, both in scalar answers and in arrays.
fn remap_code(doc: &mut Value, sub: &str, field: &str, old: &str, new: &str) {
    let Some(value) = doc.get_mut(sub).and_then(|s| s.get_mut(field)) else {
        return;
    };
    match value {
        Value::String(s) if s == old => *s = new.to_string(),
        Value::Array(elements) => {
            for element in elements {
                if let Value::String(s) = element {
                    if s == old {
                        *s = new.to_string();
                    }
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upgrades_a_202209_document() {
        let doc = json!({
            "version": "202209",
            "INNOVATION_DESCRIPTION": {
                "name": "Pathway planner",
                "hasFinalProduct": "YES",
                "categories": ["SERVICE_INTERVENTION", "DIGITAL"],
                "mainCategory": "SERVICE_INTERVENTION"
            },
            "VALUE_PROPOSITION": {
                "problemsTackled": "Late referrals",
                "intervention": "Routes referrals automatically",
                "interventionImpact": "Fewer missed appointments"
            },
            "UNDERSTANDING_OF_NEEDS": { "impactPatients": "YES" }
        });

        let upgraded = upgrade(&doc).unwrap();
        assert_eq!(upgraded["version"], "202304");

        let description = upgraded["INNOVATION_DESCRIPTION"].as_object().unwrap();
        assert_eq!(description["name"], "Pathway planner");
        assert_eq!(description["categories"], json!(["MODELS_CARE", "DIGITAL"]));
        assert_eq!(description["mainCategory"], "MODELS_CARE");
        assert!(!description.contains_key("hasFinalProduct"));

        let needs = upgraded["UNDERSTANDING_OF_NEEDS"].as_object().unwrap();
        assert_eq!(needs["problemsTackled"], "Late referrals");
        assert_eq!(needs["howInnovationWork"], "Routes referrals automatically");
        assert!(!needs.contains_key("impactPatients"));

        assert!(!upgraded.as_object().unwrap().contains_key("VALUE_PROPOSITION"));
    }

    #[test]
    fn latest_documents_pass_through() {
        let doc = json!({
            "version": "202304",
            "INNOVATION_DESCRIPTION": { "name": "As-is" },
            "custom": { "untouched": true }
        });
        assert_eq!(upgrade(&doc).unwrap(), doc);
    }

    #[test]
    fn unknown_versions_are_rejected() {
        let doc = json!({ "version": "199901" });
        assert!(upgrade(&doc).is_err());
    }
}
