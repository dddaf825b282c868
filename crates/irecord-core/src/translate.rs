//! Document translation: coded answers → human-readable labels.
//!
//! The translation table is derived from the schema itself rather than from a
//! loosely-typed dictionary mirroring the document shape: every tipified
//! question contributes its item id → label pairs, nested group questions
//! contribute sub-tables, and everything else deliberately has no entry.
//! Translation is an explicit visitor over that table; values without an
//! entry (free text, unknown codes) fall through unchanged.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::{Catalog, EvidenceSubmitType, EvidenceType};
use crate::model::{DataType, IrSchema, Question};

/// Per-question translation data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TranslationEntry {
    /// Coded value → label, for tipified questions.
    Values(BTreeMap<String, String>),
    /// Sub-entries keyed by child question id, for `fields-group` questions
    /// whose answers are arrays of objects.
    Nested(BTreeMap<String, TranslationEntry>),
}

/// Question id → entry, within one subsection.
pub type QuestionTable = BTreeMap<String, TranslationEntry>;

/// The full table: subsection id → question table.
///
/// Only questions with at least one non-identity mapping appear; a catalog
/// whose codes equal its labels (e.g. AAC programmes) produces no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslationTable {
    subsections: BTreeMap<String, QuestionTable>,
    /// Entry for the top-level `evidences` array, built from the evidence
    /// catalogs rather than the schema tree.
    evidences: Option<TranslationEntry>,
}

impl TranslationTable {
    /// Derive the table from a schema definition.
    pub fn from_schema(schema: &IrSchema) -> Self {
        let mut subsections = BTreeMap::new();
        for section in &schema.sections {
            for sub in &section.sub_sections {
                let mut questions = QuestionTable::new();
                for q in sub.questions() {
                    add_question(q, &mut questions);
                }
                if !questions.is_empty() {
                    subsections.insert(sub.id.clone(), questions);
                }
            }
        }
        Self {
            subsections,
            evidences: Some(evidences_entry()),
        }
    }

    /// Look up the entry for a question within a subsection.
    pub fn entry(&self, subsection_id: &str, question_id: &str) -> Option<&TranslationEntry> {
        self.subsections.get(subsection_id)?.get(question_id)
    }

    /// Deep-copy `doc`, replacing coded values with labels wherever the table
    /// has an entry. Unknown subsections, questions and values are copied
    /// verbatim.
    pub fn translate(&self, doc: &Value) -> Value {
        let Some(obj) = doc.as_object() else {
            return doc.clone();
        };

        let mut out = Map::new();
        for (key, value) in obj {
            if key == "evidences" {
                if let Some(entry) = &self.evidences {
                    out.insert(key.clone(), apply(entry, value));
                    continue;
                }
            }
            match (self.subsections.get(key), value.as_object()) {
                (Some(questions), Some(fields)) => {
                    out.insert(key.clone(), translate_fields(questions, fields));
                }
                _ => {
                    out.insert(key.clone(), value.clone());
                }
            }
        }
        Value::Object(out)
    }
}

/// Evidence entries carry two catalog-coded keys.
fn evidences_entry() -> TranslationEntry {
    let mut children = BTreeMap::new();
    for (key, pairs) in [
        (
            "evidenceSubmitType",
            EvidenceSubmitType::ALL
                .iter()
                .map(|c| (c.as_str().to_string(), c.label().to_string()))
                .collect::<BTreeMap<_, _>>(),
        ),
        (
            "evidenceType",
            EvidenceType::ALL
                .iter()
                .map(|c| (c.as_str().to_string(), c.label().to_string()))
                .collect::<BTreeMap<_, _>>(),
        ),
    ] {
        children.insert(key.to_string(), TranslationEntry::Values(pairs));
    }
    TranslationEntry::Nested(children)
}

fn translate_fields(questions: &QuestionTable, fields: &Map<String, Value>) -> Value {
    let mut out = Map::new();
    for (field, value) in fields {
        match questions.get(field) {
            Some(entry) => {
                out.insert(field.clone(), apply(entry, value));
            }
            None => {
                out.insert(field.clone(), value.clone());
            }
        }
    }
    Value::Object(out)
}

fn apply(entry: &TranslationEntry, value: &Value) -> Value {
    match (entry, value) {
        (TranslationEntry::Values(map), Value::String(s)) => match map.get(s) {
            Some(label) => Value::String(label.clone()),
            None => value.clone(),
        },
        (TranslationEntry::Values(_), Value::Array(elements)) => {
            Value::Array(elements.iter().map(|e| apply(entry, e)).collect())
        }
        (TranslationEntry::Nested(_), Value::Array(elements)) => {
            Value::Array(elements.iter().map(|e| apply(entry, e)).collect())
        }
        (TranslationEntry::Nested(children), Value::Object(obj)) => {
            let mut out = Map::new();
            for (k, v) in obj {
                match children.get(k) {
                    Some(child) => {
                        out.insert(k.clone(), apply(child, v));
                    }
                    None => {
                        out.insert(k.clone(), v.clone());
                    }
                }
            }
            Value::Object(out)
        }
        _ => value.clone(),
    }
}

fn add_question(q: &Question, out: &mut QuestionTable) {
    match q.data_type {
        DataType::RadioGroup | DataType::CheckboxArray | DataType::AutocompleteArray => {
            let mut map = BTreeMap::new();
            for item in &q.items {
                // Identity mappings carry no information; omit them so that
                // label-coded catalogs have no entry at all.
                if !item.id.is_empty() && item.id != item.label {
                    map.insert(item.id.clone(), item.label.clone());
                }
                if let Some(conditional) = &item.conditional {
                    add_question(conditional, out);
                }
            }
            if !map.is_empty() {
                out.insert(q.id.clone(), TranslationEntry::Values(map));
            }
        }
        DataType::FieldsGroup => {
            let mut children = BTreeMap::new();
            for child in [q.field.as_deref(), q.add_question.as_deref()].into_iter().flatten() {
                let mut table = QuestionTable::new();
                add_question(child, &mut table);
                children.extend(table);
            }
            if !children.is_empty() {
                out.insert(q.id.clone(), TranslationEntry::Nested(children));
            }
        }
        DataType::Text | DataType::Textarea => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Section, Step, SubSection};
    use serde_json::json;

    fn question(id: &str, data_type: DataType, items: Vec<Item>) -> Question {
        Question {
            id: id.into(),
            data_type,
            label: id.into(),
            description: None,
            items,
            validations: None,
            field: None,
            add_question: None,
            add_new_label: None,
            check_answer_label: None,
        }
    }

    fn schema_with(questions: Vec<Question>) -> IrSchema {
        IrSchema {
            sections: vec![Section {
                id: "s1".into(),
                title: "S1".into(),
                sub_sections: vec![SubSection {
                    id: "sub1".into(),
                    title: "Sub1".into(),
                    steps: vec![Step { questions, condition: None }],
                    has_files: false,
                    calculated_fields: BTreeMap::new(),
                }],
            }],
        }
    }

    #[test]
    fn translates_strings_and_arrays() {
        let schema = schema_with(vec![question(
            "categories",
            DataType::CheckboxArray,
            vec![
                Item::new("IN_VITRO_DIAGNOSTIC", "In vitro diagnostic"),
                Item::new("PPE", "Personal protective equipment (PPE)"),
            ],
        )]);
        let table = TranslationTable::from_schema(&schema);

        let doc = json!({
            "version": "202304",
            "sub1": { "categories": ["IN_VITRO_DIAGNOSTIC", "UNKNOWN_CODE"] }
        });
        let translated = table.translate(&doc);
        assert_eq!(
            translated["sub1"]["categories"],
            json!(["In vitro diagnostic", "UNKNOWN_CODE"])
        );
        assert_eq!(translated["version"], "202304");
    }

    #[test]
    fn unmapped_documents_survive_unchanged() {
        let schema = schema_with(vec![question("summary", DataType::Textarea, vec![])]);
        let table = TranslationTable::from_schema(&schema);

        let doc = json!({
            "version": "202304",
            "sub1": { "summary": "free text", "stale": ["A", "B"] }
        });
        let translated = table.translate(&doc);
        assert_eq!(translated, doc);
    }

    #[test]
    fn nested_group_answers_translate_per_key() {
        let mut standards = question("standards", DataType::FieldsGroup, vec![]);
        standards.field = Some(Box::new(question(
            "type",
            DataType::RadioGroup,
            vec![Item::new("CQC", "Care Quality Commission (CQC) registration")],
        )));
        standards.add_question = Some(Box::new(question(
            "hasMet",
            DataType::RadioGroup,
            vec![Item::new("IN_PROGRESS", "I am actively working towards it")],
        )));

        let schema = schema_with(vec![standards]);
        let table = TranslationTable::from_schema(&schema);

        let doc = json!({
            "sub1": {
                "standards": [
                    { "type": "CQC", "hasMet": "IN_PROGRESS" },
                    { "type": "HOMEGROWN", "hasMet": "IN_PROGRESS" }
                ]
            }
        });
        let translated = table.translate(&doc);
        assert_eq!(
            translated["sub1"]["standards"],
            json!([
                { "type": "Care Quality Commission (CQC) registration", "hasMet": "I am actively working towards it" },
                { "type": "HOMEGROWN", "hasMet": "I am actively working towards it" }
            ])
        );
    }

    #[test]
    fn identity_catalogs_have_no_entry() {
        let schema = schema_with(vec![question(
            "involvedAACProgrammes",
            DataType::CheckboxArray,
            vec![Item::new("Health Innovation Network", "Health Innovation Network")],
        )]);
        let table = TranslationTable::from_schema(&schema);
        assert!(table.entry("sub1", "involvedAACProgrammes").is_none());

        let doc = json!({ "sub1": { "involvedAACProgrammes": ["Health Innovation Network"] } });
        assert_eq!(table.translate(&doc), doc);
    }

    #[test]
    fn evidence_entries_translate_their_catalog_keys() {
        let schema = schema_with(vec![question("summary", DataType::Textarea, vec![])]);
        let table = TranslationTable::from_schema(&schema);

        let doc = json!({
            "version": "202304",
            "evidences": [{
                "id": "e1",
                "evidenceSubmitType": "REAL_WORLD",
                "evidenceType": "CONFERENCE",
                "summary": "left alone"
            }]
        });
        let translated = table.translate(&doc);
        assert_eq!(
            translated["evidences"][0]["evidenceSubmitType"],
            "Real world evidence"
        );
        assert_eq!(
            translated["evidences"][0]["evidenceType"],
            "Conference presentation or poster"
        );
        assert_eq!(translated["evidences"][0]["summary"], "left alone");
    }

    #[test]
    fn conditional_questions_contribute_entries() {
        let mut items = vec![Item::new("YES", "Yes")];
        items[0].conditional = Some(Box::new(question(
            "certainty",
            DataType::RadioGroup,
            vec![Item::new("HIGH", "High")],
        )));
        let schema = schema_with(vec![question("hasEvidence", DataType::RadioGroup, items)]);
        let table = TranslationTable::from_schema(&schema);

        let doc = json!({ "sub1": { "hasEvidence": "YES", "certainty": "HIGH" } });
        let translated = table.translate(&doc);
        assert_eq!(translated["sub1"]["hasEvidence"], "Yes");
        assert_eq!(translated["sub1"]["certainty"], "High");
    }
}
