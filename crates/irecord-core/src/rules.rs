//! Schema integrity rules.
//!
//! `SchemaModel` wraps a record definition and validates it the way admin
//! tooling needs: every problem is reported at once, as data. `run_rules`
//! walks the tree and accumulates `RuleViolation`s; it never throws and never
//! stops at the first finding. Structural decoding failures (the JSON does
//! not even have the schema shape) produce a report whose violations carry no
//! context node, since no typed object exists to attach.
//!
//! Rules enforced:
//! - section ids unique across the schema
//! - subsection ids unique within a section
//! - question ids unique within a subsection (conditional follow-ups share
//!   the id space; `fields-group` children are scoped to their group)
//! - item ids unique within a question
//! - a step condition references a tipified question from a strictly earlier
//!   step, and only options that question declares
//! - `itemsFromAnswer` references a question declared earlier in the same
//!   subsection
//! - a present `validations` object carries at least one recognized key
//! - a `fields-group` declares a non-group `field`, and its `addQuestion`
//!   id differs from the `field` id
//! - calculated fields reference existing questions and options

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

use crate::document;
use crate::model::{IrSchema, Question, SubSection};
use crate::translate::TranslationTable;

/// One rule violation, carrying the offending node so a UI can highlight it.
#[derive(Debug, Clone, Serialize)]
pub struct RuleViolation {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

/// The outcome of a rule run. Violations are data, not errors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<RuleViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, code: &str, message: impl Into<String>, context: Option<Value>) {
        self.violations.push(RuleViolation {
            code: code.to_string(),
            message: message.into(),
            context,
        });
    }

    /// A report carrying a single structural (decode) failure.
    pub fn structural(message: impl Into<String>) -> Self {
        let mut report = Self::default();
        report.push("schema.structure", message, None);
        report
    }
}

/// Required question ids per subsection, in declaration order.
///
/// This replaces the source system's process-wide registry: schema load
/// returns it explicitly and callers thread it to wherever completeness is
/// checked. Questions inside conditional steps are excluded; they are only
/// required when their step is shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequiredQuestions {
    pub by_subsection: BTreeMap<String, Vec<String>>,
}

impl RequiredQuestions {
    pub fn for_subsection(&self, id: &str) -> &[String] {
        self.by_subsection.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn subsection_ids(&self) -> impl Iterator<Item = &str> {
        self.by_subsection.keys().map(String::as_str)
    }
}

/// A validated-or-validatable record definition with derived indexes.
#[derive(Debug)]
pub struct SchemaModel {
    schema: IrSchema,
    known_fields: BTreeMap<String, BTreeSet<String>>,
    translation: TranslationTable,
}

/// The result of a successful schema load.
#[derive(Debug)]
pub struct LoadedSchema {
    pub model: SchemaModel,
    pub required: RequiredQuestions,
}

/// Decode and fully validate a candidate schema JSON value.
///
/// Returns the loaded model plus its required-questions index, or the full
/// report (structural or semantic) when the candidate is not usable.
pub fn load_schema(value: &Value) -> Result<LoadedSchema, ValidationReport> {
    let model = SchemaModel::from_value(value)?;
    let report = model.run_rules();
    if !report.is_valid() {
        return Err(report);
    }
    let required = model.required_questions();
    Ok(LoadedSchema { model, required })
}

impl SchemaModel {
    pub fn new(schema: IrSchema) -> Self {
        let known_fields = document::known_field_ids(&schema);
        let translation = TranslationTable::from_schema(&schema);
        Self {
            schema,
            known_fields,
            translation,
        }
    }

    /// Structural pass: decode a JSON value into the typed tree. On failure
    /// the report carries the decode message with no context node.
    pub fn from_value(value: &Value) -> Result<Self, ValidationReport> {
        match serde_json::from_value::<IrSchema>(value.clone()) {
            Ok(schema) => Ok(Self::new(schema)),
            Err(e) => Err(ValidationReport::structural(format!(
                "schema does not match the expected structure: {e}"
            ))),
        }
    }

    pub fn schema(&self) -> &IrSchema {
        &self.schema
    }

    pub fn subsection(&self, id: &str) -> Option<&SubSection> {
        self.schema
            .sections
            .iter()
            .flat_map(|s| s.sub_sections.iter())
            .find(|sub| sub.id == id)
    }

    /// Whether the named subsection accepts file uploads. Unknown ids are
    /// simply not upload-enabled.
    pub fn can_upload_files(&self, subsection_id: &str) -> bool {
        self.subsection(subsection_id).map(|s| s.has_files).unwrap_or(false)
    }

    /// Run every semantic rule and return the accumulated report.
    pub fn run_rules(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        let mut section_ids = BTreeSet::new();
        for section in &self.schema.sections {
            if !section_ids.insert(section.id.as_str()) {
                report.push(
                    "section.id.duplicate",
                    format!("section {} is duplicated", section.id),
                    context(section),
                );
            }

            let mut sub_ids = BTreeSet::new();
            for sub in &section.sub_sections {
                if !sub_ids.insert(sub.id.as_str()) {
                    report.push(
                        "subsection.id.duplicate",
                        format!("subsection {} is duplicated within section {}", sub.id, section.id),
                        context(sub),
                    );
                }
                self.run_subsection_rules(sub, &mut report);
            }
        }

        report
    }

    fn run_subsection_rules(&self, sub: &SubSection, report: &mut ValidationReport) {
        // Question id uniqueness across all steps, conditional children included.
        let mut seen = BTreeSet::new();
        for q in sub.questions() {
            let mut ids = Vec::new();
            q.collect_field_ids(&mut ids);
            for id in ids {
                if !seen.insert(id.to_string()) {
                    report.push(
                        "question.id.duplicate",
                        format!("question {} is duplicated within subsection {}", id, sub.id),
                        context(q),
                    );
                }
            }
        }

        // Ordered walk: step conditions may only look at strictly earlier
        // steps; itemsFromAnswer may look at anything declared before it.
        let mut earlier_steps: BTreeMap<&str, &Question> = BTreeMap::new();
        let mut declared: BTreeSet<&str> = BTreeSet::new();

        for step in &sub.steps {
            if let Some(cond) = &step.condition {
                match earlier_steps.get(cond.id.as_str()) {
                    None => {
                        report.push(
                            "step.condition.previous",
                            format!(
                                "step condition in subsection {} must reference a question from a previous step: {}",
                                sub.id, cond.id
                            ),
                            context(step),
                        );
                    }
                    Some(target) => {
                        if !target.data_type.is_tipified() {
                            report.push(
                                "step.condition.datatype",
                                format!(
                                    "step condition references question {} of type {}, which exposes no options",
                                    cond.id,
                                    target.data_type.as_str()
                                ),
                                context(step),
                            );
                        } else {
                            let known: BTreeSet<&str> = target.item_ids().into_iter().collect();
                            let invalid: Vec<&str> = cond
                                .options
                                .iter()
                                .map(String::as_str)
                                .filter(|o| !known.contains(o))
                                .collect();
                            if !invalid.is_empty() {
                                report.push(
                                    "step.condition.option",
                                    format!(
                                        "step condition references a wrong option of question {}: {}",
                                        cond.id,
                                        invalid.join(", ")
                                    ),
                                    context(step),
                                );
                            }
                        }
                    }
                }
            }

            for q in &step.questions {
                self.run_question_rules(sub, q, &declared, report);
                let mut ids = Vec::new();
                q.collect_field_ids(&mut ids);
                declared.extend(ids);
            }

            for q in &step.questions {
                earlier_steps.insert(q.id.as_str(), q);
            }
        }

        // Calculated fields reference questions and options of this subsection.
        let by_id: BTreeMap<&str, &Question> =
            sub.questions().map(|q| (q.id.as_str(), q)).collect();
        for (field, conditions) in &sub.calculated_fields {
            for cond in conditions {
                match by_id.get(cond.id.as_str()) {
                    None => {
                        report.push(
                            "calculatedField.reference",
                            format!(
                                "calculated field {} references unknown question {} in subsection {}",
                                field, cond.id, sub.id
                            ),
                            context(sub),
                        );
                    }
                    Some(target) => {
                        let known: BTreeSet<&str> = target.item_ids().into_iter().collect();
                        if cond.options.iter().any(|o| !known.contains(o.as_str())) {
                            report.push(
                                "calculatedField.option",
                                format!(
                                    "calculated field {} references a wrong option of question {}",
                                    field, cond.id
                                ),
                                context(sub),
                            );
                        }
                    }
                }
            }
        }
    }

    fn run_question_rules(
        &self,
        sub: &SubSection,
        q: &Question,
        declared: &BTreeSet<&str>,
        report: &mut ValidationReport,
    ) {
        // Item id uniqueness (itemsFromAnswer placeholders have no id).
        let mut item_ids = BTreeSet::new();
        for item in &q.items {
            if !item.id.is_empty() && !item_ids.insert(item.id.as_str()) {
                report.push(
                    "item.id.duplicate",
                    format!("item {} is duplicated within question {}", item.id, q.id),
                    context(q),
                );
            }
        }

        // itemsFromAnswer must point backwards within the subsection.
        for item in &q.items {
            if let Some(source) = &item.items_from_answer {
                if !declared.contains(source.as_str()) {
                    report.push(
                        "items.fromAnswer",
                        format!(
                            "question {} sources items from {}, which is not defined earlier in subsection {}",
                            q.id, source, sub.id
                        ),
                        context(q),
                    );
                }
            }
        }

        if let Some(validations) = &q.validations {
            if validations.recognized_keys() == 0 {
                report.push(
                    "validations.empty",
                    format!("question {} declares a validations object with no recognized key", q.id),
                    context(q),
                );
            }
        }

        if q.data_type == crate::model::DataType::FieldsGroup {
            match &q.field {
                None => {
                    report.push(
                        "fieldsGroup.field",
                        format!("fields-group question {} declares no field", q.id),
                        context(q),
                    );
                }
                Some(field) => {
                    if field.data_type == crate::model::DataType::FieldsGroup {
                        report.push(
                            "fieldsGroup.nested",
                            format!("fields-group question {} nests another fields-group", q.id),
                            context(q),
                        );
                    }
                    if let Some(add) = &q.add_question {
                        if add.id == field.id {
                            report.push(
                                "fieldsGroup.addQuestion",
                                format!(
                                    "fields-group question {} reuses id {} for both field and addQuestion",
                                    q.id, field.id
                                ),
                                context(q),
                            );
                        }
                    }
                }
            }
        }

        // Conditional follow-ups obey the same per-question rules.
        for item in &q.items {
            if let Some(conditional) = &item.conditional {
                self.run_question_rules(sub, conditional, declared, report);
            }
        }
    }

    /// Required question ids per subsection: questions in unconditional steps
    /// whose validations mark them required.
    pub fn required_questions(&self) -> RequiredQuestions {
        let mut by_subsection = BTreeMap::new();
        for section in &self.schema.sections {
            for sub in &section.sub_sections {
                let mut required = Vec::new();
                for step in &sub.steps {
                    if step.condition.is_some() {
                        continue;
                    }
                    for q in &step.questions {
                        let is_required = q
                            .validations
                            .as_ref()
                            .and_then(|v| v.is_required)
                            .unwrap_or(false);
                        if is_required {
                            required.push(q.id.clone());
                        }
                    }
                }
                by_subsection.insert(sub.id.clone(), required);
            }
        }
        RequiredQuestions { by_subsection }
    }

    /// Projection cleanup: see `crate::document::clean_up`.
    pub fn clean_up_document(&self, doc: &Value) -> Value {
        document::clean_up_with(&self.known_fields, &self.schema, doc)
    }

    /// Translation: see `crate::translate::TranslationTable`.
    pub fn translate_document(&self, doc: &Value) -> Value {
        self.translation.translate(doc)
    }

    pub fn translation_table(&self) -> &TranslationTable {
        &self.translation
    }
}

fn context<T: Serialize>(node: &T) -> Option<Value> {
    serde_json::to_value(node).ok()
}
