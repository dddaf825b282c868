//! Document cleanup against a schema definition.
//!
//! A document is a flat JSON object mapping subsection ids to question-id →
//! answer objects, plus a top-level `version` string and an owner-managed
//! `evidences` array. Cleanup is a projection: it keeps only fields whose
//! question id still exists in the schema for that subsection and drops
//! everything else silently. It does not check value types; the strict,
//! type-aware counterpart lives in `crate::schemas::cleanup`.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::model::IrSchema;

/// Field ids the schema knows per subsection: every step question plus the
/// ids of item-conditional questions, which are stored as sibling fields.
pub fn known_field_ids(schema: &IrSchema) -> BTreeMap<String, BTreeSet<String>> {
    let mut out = BTreeMap::new();
    for section in &schema.sections {
        for sub in &section.sub_sections {
            let mut ids = BTreeSet::new();
            for q in sub.questions() {
                let mut fields = Vec::new();
                q.collect_field_ids(&mut fields);
                ids.extend(fields.into_iter().map(str::to_string));
            }
            out.insert(sub.id.clone(), ids);
        }
    }
    out
}

/// Project `doc` onto the schema: keep `version` and `evidences` verbatim and,
/// per subsection present in both document and schema, keep only known fields.
/// Idempotent; returns a fresh value.
pub fn clean_up(schema: &IrSchema, doc: &Value) -> Value {
    let known = known_field_ids(schema);
    clean_up_with(&known, schema, doc)
}

pub(crate) fn clean_up_with(
    known: &BTreeMap<String, BTreeSet<String>>,
    schema: &IrSchema,
    doc: &Value,
) -> Value {
    let Some(obj) = doc.as_object() else {
        return Value::Object(Map::new());
    };

    let mut out = Map::new();
    if let Some(version) = obj.get("version") {
        out.insert("version".to_string(), version.clone());
    }
    if let Some(evidences) = obj.get("evidences") {
        out.insert("evidences".to_string(), evidences.clone());
    }

    for section in &schema.sections {
        for sub in &section.sub_sections {
            let Some(fields) = obj.get(&sub.id).and_then(Value::as_object) else {
                continue;
            };
            let keep = &known[&sub.id];
            let mut cleaned = Map::new();
            for (field, value) in fields {
                if keep.contains(field) {
                    cleaned.insert(field.clone(), value.clone());
                }
            }
            out.insert(sub.id.clone(), Value::Object(cleaned));
        }
    }

    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataType, Item, Question, Section, Step, SubSection};
    use serde_json::json;

    fn schema() -> IrSchema {
        let mut categories = Question {
            id: "categories".into(),
            data_type: DataType::CheckboxArray,
            label: "Categories".into(),
            description: None,
            items: vec![Item::new("MEDICAL_DEVICE", "Medical device"), Item::new("OTHER", "Other")],
            validations: None,
            field: None,
            add_question: None,
            add_new_label: None,
            check_answer_label: None,
        };
        categories.items[1].conditional = Some(Box::new(Question {
            id: "otherCategoryDescription".into(),
            data_type: DataType::Text,
            label: "Other category".into(),
            description: None,
            items: vec![],
            validations: None,
            field: None,
            add_question: None,
            add_new_label: None,
            check_answer_label: None,
        }));

        IrSchema {
            sections: vec![Section {
                id: "s1".into(),
                title: "S1".into(),
                sub_sections: vec![SubSection {
                    id: "innovationDescription".into(),
                    title: "Description".into(),
                    steps: vec![Step { questions: vec![categories], condition: None }],
                    has_files: false,
                    calculated_fields: BTreeMap::new(),
                }],
            }],
        }
    }

    #[test]
    fn drops_stale_fields_and_subsections() {
        let doc = json!({
            "version": "202304",
            "innovationDescription": {
                "categories": ["MEDICAL_DEVICE"],
                "otherCategoryDescription": "something",
                "removedQuestion": "stale"
            },
            "removedSubsection": { "x": 1 }
        });
        let cleaned = clean_up(&schema(), &doc);
        assert_eq!(
            cleaned,
            json!({
                "version": "202304",
                "innovationDescription": {
                    "categories": ["MEDICAL_DEVICE"],
                    "otherCategoryDescription": "something"
                }
            })
        );
    }

    #[test]
    fn cleanup_is_idempotent() {
        let doc = json!({
            "version": "202304",
            "evidences": [{ "id": "e1" }],
            "innovationDescription": { "categories": [], "gone": true }
        });
        let once = clean_up(&schema(), &doc);
        let twice = clean_up(&schema(), &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn evidences_survive_verbatim() {
        let doc = json!({
            "version": "202304",
            "evidences": [{ "id": "e1", "evidenceType": "CONFERENCE" }]
        });
        let cleaned = clean_up(&schema(), &doc);
        assert_eq!(cleaned["evidences"], doc["evidences"]);
    }

    #[test]
    fn value_types_are_not_checked() {
        // Projection only: a mistyped value for a known field is kept.
        let doc = json!({
            "version": "202304",
            "innovationDescription": { "categories": "not-an-array" }
        });
        let cleaned = clean_up(&schema(), &doc);
        assert_eq!(cleaned["innovationDescription"]["categories"], "not-an-array");
    }

    #[test]
    fn non_object_documents_collapse_to_empty() {
        assert_eq!(clean_up(&schema(), &json!([1, 2])), json!({}));
    }
}
