//! Built-in record definitions, one module per published version.
//!
//! Each version ships: the schema tree itself, short section aliases, and a
//! strict type-aware `cleanup` that validates every field value against its
//! question's declared shape. Versions are isolated: `v202209` never changes
//! in breaking ways; new revisions get their own module.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde_json::{Map, Value};

use crate::catalog::{Catalog, EvidenceSubmitType, EvidenceType};
use crate::model::{
    DataType, IrSchema, Item, Question, Section, Step, StepCondition, SubSection, Validations,
};
use crate::rules::SchemaModel;
use crate::version::DocumentVersion;

mod v202209;
mod v202304;

/// The built-in schema for a version. Built once, cached for the process.
pub fn schema_for(version: DocumentVersion) -> &'static IrSchema {
    model_for(version).schema()
}

/// The built-in schema wrapped in a `SchemaModel` with derived indexes.
pub fn model_for(version: DocumentVersion) -> &'static SchemaModel {
    static V202209: OnceLock<SchemaModel> = OnceLock::new();
    static V202304: OnceLock<SchemaModel> = OnceLock::new();
    match version {
        DocumentVersion::V202209 => V202209.get_or_init(|| SchemaModel::new(v202209::schema())),
        DocumentVersion::V202304 => V202304.get_or_init(|| SchemaModel::new(v202304::schema())),
    }
}

/// Short alias for a subsection, used in references and exports.
pub fn section_alias(version: DocumentVersion, subsection_id: &str) -> Option<&'static str> {
    let aliases: &[(&str, &str)] = match version {
        DocumentVersion::V202209 => v202209::ALIASES,
        DocumentVersion::V202304 => v202304::ALIASES,
    };
    aliases.iter().find(|(id, _)| *id == subsection_id).map(|(_, alias)| *alias)
}

/// Whether the named subsection accepts file uploads in this version.
pub fn allows_file_uploads(version: DocumentVersion, subsection_id: &str) -> bool {
    model_for(version).can_upload_files(subsection_id)
}

/// A fresh, empty document at the given version.
pub fn new_document(version: DocumentVersion) -> Value {
    let mut doc = Map::new();
    doc.insert("version".to_string(), Value::String(version.as_str().to_string()));
    doc.insert("evidences".to_string(), Value::Array(Vec::new()));
    Value::Object(doc)
}

/// Strict cleanup: the type-aware counterpart of the schema projection.
///
/// Besides stripping unknown subsections and fields, every kept value is
/// validated against its question's declared shape (string vs array vs group
/// entries, option membership, declared length bounds) and dropped when it
/// fails. Evidence entries are shape-checked against the evidence catalogs.
pub fn cleanup(version: DocumentVersion, doc: &Value) -> Value {
    let schema = schema_for(version);
    let questions = questions_by_field(schema);

    let Some(obj) = doc.as_object() else {
        return Value::Object(Map::new());
    };

    let mut out = Map::new();
    out.insert(
        "version".to_string(),
        Value::String(version.as_str().to_string()),
    );
    if let Some(evidences) = obj.get("evidences") {
        out.insert("evidences".to_string(), cleanup_evidences(evidences));
    }

    for section in &schema.sections {
        for sub in &section.sub_sections {
            let Some(fields) = obj.get(&sub.id).and_then(Value::as_object) else {
                continue;
            };
            let known = &questions[&sub.id];
            let mut cleaned = Map::new();
            for (field, value) in fields {
                let Some(question) = known.get(field.as_str()) else {
                    continue;
                };
                if let Some(valid) = cleanup_value(question, value) {
                    cleaned.insert(field.clone(), valid);
                }
            }
            out.insert(sub.id.clone(), Value::Object(cleaned));
        }
    }

    Value::Object(out)
}

/// Field id → question, per subsection, conditional follow-ups included.
fn questions_by_field(schema: &IrSchema) -> BTreeMap<String, BTreeMap<&str, &Question>> {
    fn add<'a>(q: &'a Question, out: &mut BTreeMap<&'a str, &'a Question>) {
        out.insert(q.id.as_str(), q);
        for item in &q.items {
            if let Some(conditional) = &item.conditional {
                add(conditional, out);
            }
        }
    }

    let mut out = BTreeMap::new();
    for section in &schema.sections {
        for sub in &section.sub_sections {
            let mut fields = BTreeMap::new();
            for q in sub.questions() {
                add(q, &mut fields);
            }
            out.insert(sub.id.clone(), fields);
        }
    }
    out
}

fn cleanup_value(question: &Question, value: &Value) -> Option<Value> {
    match question.data_type {
        DataType::Text | DataType::Textarea => {
            let s = value.as_str()?;
            let v = question.validations.as_ref();
            if let Some(max) = v.and_then(|v| v.max_length) {
                if s.chars().count() > max {
                    return None;
                }
            }
            if let Some(min) = v.and_then(|v| v.min_length) {
                if s.chars().count() < min {
                    return None;
                }
            }
            Some(Value::String(s.to_string()))
        }
        DataType::RadioGroup => {
            let s = value.as_str()?;
            if has_static_items(question) && !question.item_ids().contains(&s) {
                return None;
            }
            Some(Value::String(s.to_string()))
        }
        DataType::CheckboxArray | DataType::AutocompleteArray => {
            let elements = value.as_array()?;
            let static_items = has_static_items(question);
            let known = question.item_ids();
            let mut kept = Vec::new();
            for element in elements {
                let Some(s) = element.as_str() else {
                    return None;
                };
                if static_items && !known.contains(&s) {
                    return None;
                }
                kept.push(Value::String(s.to_string()));
            }
            Some(Value::Array(kept))
        }
        DataType::FieldsGroup => {
            let entries = value.as_array()?;
            let field = question.field.as_deref()?;
            let add_question = question.add_question.as_deref();
            let mut kept = Vec::new();
            for entry in entries {
                let obj = entry.as_object()?;
                let mut cleaned = Map::new();
                let lead = obj.get(&field.id).and_then(|v| cleanup_value(field, v))?;
                cleaned.insert(field.id.clone(), lead);
                if let Some(add) = add_question {
                    if let Some(valid) = obj.get(&add.id).and_then(|v| cleanup_value(add, v)) {
                        cleaned.insert(add.id.clone(), valid);
                    }
                }
                kept.push(Value::Object(cleaned));
            }
            Some(Value::Array(kept))
        }
    }
}

/// A question has a closed option list when every item is static.
fn has_static_items(question: &Question) -> bool {
    !question.items.is_empty() && question.items.iter().all(|i| i.items_from_answer.is_none())
}

fn cleanup_evidences(evidences: &Value) -> Value {
    let Some(entries) = evidences.as_array() else {
        return Value::Array(Vec::new());
    };

    let submit_types: Vec<&str> = EvidenceSubmitType::ALL.iter().map(|c| c.as_str()).collect();
    let evidence_types: Vec<&str> = EvidenceType::ALL.iter().map(|c| c.as_str()).collect();

    let mut kept = Vec::new();
    for entry in entries {
        let Some(obj) = entry.as_object() else {
            continue;
        };
        let Some(id) = obj.get("id").and_then(Value::as_str) else {
            continue;
        };
        let Some(submit) = obj
            .get("evidenceSubmitType")
            .and_then(Value::as_str)
            .filter(|s| submit_types.contains(s))
        else {
            continue;
        };

        let mut cleaned = Map::new();
        cleaned.insert("id".to_string(), Value::String(id.to_string()));
        cleaned.insert(
            "evidenceSubmitType".to_string(),
            Value::String(submit.to_string()),
        );
        if let Some(ty) = obj
            .get("evidenceType")
            .and_then(Value::as_str)
            .filter(|s| evidence_types.contains(s))
        {
            cleaned.insert("evidenceType".to_string(), Value::String(ty.to_string()));
        }
        for key in ["description", "summary"] {
            if let Some(s) = obj.get(key).and_then(Value::as_str) {
                cleaned.insert(key.to_string(), Value::String(s.to_string()));
            }
        }
        kept.push(Value::Object(cleaned));
    }
    Value::Array(kept)
}

// ---- builders shared by the version modules ----

fn section(id: &str, title: &str, sub_sections: Vec<SubSection>) -> Section {
    Section {
        id: id.to_string(),
        title: title.to_string(),
        sub_sections,
    }
}

fn subsection(id: &str, title: &str, steps: Vec<Step>) -> SubSection {
    SubSection {
        id: id.to_string(),
        title: title.to_string(),
        steps,
        has_files: false,
        calculated_fields: BTreeMap::new(),
    }
}

fn subsection_with_files(id: &str, title: &str, steps: Vec<Step>) -> SubSection {
    SubSection {
        has_files: true,
        ..subsection(id, title, steps)
    }
}

fn step(questions: Vec<Question>) -> Step {
    Step {
        questions,
        condition: None,
    }
}

fn step_if(question_id: &str, options: &[&str], questions: Vec<Question>) -> Step {
    Step {
        questions,
        condition: Some(StepCondition {
            id: question_id.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }),
    }
}

fn text(id: &str, label: &str) -> Question {
    Question::new(id, DataType::Text, label)
}

fn textarea(id: &str, label: &str, max_length: usize) -> Question {
    let mut q = Question::new(id, DataType::Textarea, label);
    q.validations = Some(Validations {
        max_length: Some(max_length),
        ..Validations::default()
    });
    q
}

fn radio(id: &str, label: &str, items: Vec<Item>) -> Question {
    let mut q = Question::new(id, DataType::RadioGroup, label);
    q.items = items;
    q
}

fn radio_catalog<C: Catalog>(id: &str, label: &str) -> Question {
    radio(id, label, crate::catalog::items::<C>())
}

fn checkbox(id: &str, label: &str, items: Vec<Item>) -> Question {
    let mut q = Question::new(id, DataType::CheckboxArray, label);
    q.items = items;
    q
}

fn checkbox_catalog<C: Catalog>(id: &str, label: &str) -> Question {
    checkbox(id, label, crate::catalog::items::<C>())
}

fn fields_group(id: &str, label: &str, field: Question, add_question: Option<Question>, add_new_label: &str) -> Question {
    let mut q = Question::new(id, DataType::FieldsGroup, label);
    q.field = Some(Box::new(field));
    q.add_question = add_question.map(Box::new);
    q.add_new_label = Some(add_new_label.to_string());
    q
}

fn with_max_length(mut q: Question, max: usize) -> Question {
    let mut v = q.validations.take().unwrap_or_default();
    v.max_length = Some(max);
    q.validations = Some(v);
    q
}

fn with_url_format(mut q: Question) -> Question {
    let mut v = q.validations.take().unwrap_or_default();
    v.url_format = Some(true);
    q.validations = Some(v);
    q
}

fn required(mut q: Question) -> Question {
    let mut v = q.validations.take().unwrap_or_default();
    v.is_required = Some(true);
    q.validations = Some(v);
    q
}

/// Attach a conditional follow-up to the item with the given id.
fn conditional_on(mut q: Question, item_id: &str, follow_up: Question) -> Question {
    for item in &mut q.items {
        if item.id == item_id {
            item.conditional = Some(Box::new(follow_up));
            return q;
        }
    }
    // The item list is authored alongside this call; a miss is a bug in the
    // built-in definition and the rule run would not catch it.
    panic!("no item {item_id} on question {}", q.id);
}

fn options(pairs: &[(&str, &str)]) -> Vec<Item> {
    pairs.iter().map(|(id, label)| Item::new(*id, *label)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::load_schema;
    use serde_json::json;

    #[test]
    fn built_in_schemas_pass_their_own_rules() {
        for version in [DocumentVersion::V202209, DocumentVersion::V202304] {
            let model = model_for(version);
            let report = model.run_rules();
            assert!(
                report.is_valid(),
                "{} violates rules: {:?}",
                version.as_str(),
                report.violations
            );

            // And round-trip through the JSON load path.
            let as_json = serde_json::to_value(model.schema()).unwrap();
            load_schema(&as_json).expect("load path accepts built-in schema");
        }
    }

    #[test]
    fn aliases_cover_every_subsection() {
        for version in [DocumentVersion::V202209, DocumentVersion::V202304] {
            for section in &schema_for(version).sections {
                for sub in &section.sub_sections {
                    assert!(
                        section_alias(version, &sub.id).is_some(),
                        "{} has no alias in {}",
                        sub.id,
                        version.as_str()
                    );
                }
            }
        }
        assert!(section_alias(DocumentVersion::V202304, "UNKNOWN").is_none());
    }

    #[test]
    fn file_uploads_follow_the_schema_flags() {
        assert!(allows_file_uploads(DocumentVersion::V202304, "INNOVATION_DESCRIPTION"));
        assert!(!allows_file_uploads(DocumentVersion::V202304, "REVENUE_MODEL"));
        assert!(!allows_file_uploads(DocumentVersion::V202304, "UNKNOWN"));
    }

    #[test]
    fn new_documents_are_versioned_and_empty() {
        let doc = new_document(DocumentVersion::V202304);
        assert_eq!(doc["version"], "202304");
        assert_eq!(doc["evidences"], json!([]));
    }

    #[test]
    fn translation_covers_the_built_in_catalogs() {
        let model = model_for(DocumentVersion::V202304);
        let doc = json!({
            "version": "202304",
            "INNOVATION_DESCRIPTION": {
                "categories": ["IN_VITRO_DIAGNOSTIC"],
                "involvedAACProgrammes": ["Health Innovation Network"],
                "name": "Glucose sensor"
            }
        });
        let translated = model.translate_document(&doc);
        let section = &translated["INNOVATION_DESCRIPTION"];
        assert_eq!(section["categories"], json!(["In vitro diagnostic"]));
        // Label-coded catalog values are already human readable.
        assert_eq!(section["involvedAACProgrammes"], json!(["Health Innovation Network"]));
        assert_eq!(section["name"], "Glucose sensor");
    }

    #[test]
    fn projection_cleanup_on_built_ins_is_idempotent() {
        let model = model_for(DocumentVersion::V202304);
        let doc = json!({
            "version": "202304",
            "evidences": [{ "id": "e1" }],
            "INNOVATION_DESCRIPTION": { "name": "Kept", "retiredQuestion": "gone" },
            "RETIRED_SUBSECTION": { "x": 1 }
        });
        let once = model.clean_up_document(&doc);
        let twice = model.clean_up_document(&once);
        assert_eq!(once, twice);
        assert!(once.get("RETIRED_SUBSECTION").is_none());
        assert_eq!(once["INNOVATION_DESCRIPTION"], json!({ "name": "Kept" }));
    }

    #[test]
    fn strict_cleanup_drops_mistyped_values() {
        let doc = json!({
            "version": "202304",
            "INNOVATION_DESCRIPTION": {
                "name": "Glucose sensor",
                "description": 42,
                "categories": ["IN_VITRO_DIAGNOSTIC", "NOT_A_CATEGORY"],
                "mainCategory": "MEDICAL_DEVICE",
                "stale": "dropped"
            }
        });
        let cleaned = cleanup(DocumentVersion::V202304, &doc);
        let section = cleaned["INNOVATION_DESCRIPTION"].as_object().unwrap();
        assert_eq!(section["name"], "Glucose sensor");
        assert_eq!(section["mainCategory"], "MEDICAL_DEVICE");
        // Mistyped and unknown-option values fail their rule and are dropped.
        assert!(!section.contains_key("description"));
        assert!(!section.contains_key("categories"));
        assert!(!section.contains_key("stale"));
    }

    #[test]
    fn strict_cleanup_enforces_declared_lengths() {
        let long = "x".repeat(2000);
        let doc = json!({
            "version": "202304",
            "UNDERSTANDING_OF_NEEDS": { "problemsTackled": long }
        });
        let cleaned = cleanup(DocumentVersion::V202304, &doc);
        assert!(cleaned["UNDERSTANDING_OF_NEEDS"]
            .as_object()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn strict_cleanup_validates_evidence_entries() {
        let doc = json!({
            "version": "202304",
            "evidences": [
                { "id": "e1", "evidenceSubmitType": "REAL_WORLD", "evidenceType": "CONFERENCE", "summary": "ok" },
                { "id": "e2", "evidenceSubmitType": "MADE_UP" },
                { "evidenceSubmitType": "REAL_WORLD" },
                "not-an-object"
            ]
        });
        let cleaned = cleanup(DocumentVersion::V202304, &doc);
        let evidences = cleaned["evidences"].as_array().unwrap();
        assert_eq!(evidences.len(), 1);
        assert_eq!(evidences[0]["id"], "e1");
    }

    #[test]
    fn strict_cleanup_keeps_group_entries_with_valid_lead_field() {
        let doc = json!({
            "version": "202304",
            "TESTING_WITH_USERS": {
                "userTests": [
                    { "kind": "Usability lab", "feedback": "Positive" },
                    { "kind": "Usability lab", "feedback": 7 },
                    { "feedback": "No kind given" }
                ]
            }
        });
        let cleaned = cleanup(DocumentVersion::V202304, &doc);
        // An entry without its lead field invalidates the whole answer.
        assert!(cleaned["TESTING_WITH_USERS"].as_object().unwrap().is_empty());

        let doc = json!({
            "version": "202304",
            "TESTING_WITH_USERS": {
                "userTests": [
                    { "kind": "Usability lab", "feedback": "Positive", "noise": true }
                ]
            }
        });
        let cleaned = cleanup(DocumentVersion::V202304, &doc);
        assert_eq!(
            cleaned["TESTING_WITH_USERS"]["userTests"],
            json!([{ "kind": "Usability lab", "feedback": "Positive" }])
        );
    }
}
