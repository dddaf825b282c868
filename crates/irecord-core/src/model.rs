//! Innovation Record schema model.
//!
//! Strongly-typed representation of a record definition: sections contain
//! subsections, subsections contain steps, steps contain questions, and
//! enumerable questions carry items. The tree is the authoritative "form
//! definition" interpreted at runtime.
//!
//! Design notes:
//! - Models are mostly "dumb" data; integrity rules live in `crate::rules`.
//! - Wire names are camelCase, matching the stored JSON format.
//! - Decoding is strict (`deny_unknown_fields`): a malformed tree fails the
//!   structural pass before any semantic rule runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete record definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IrSchema {
    pub sections: Vec<Section>,
}

/// A top-level grouping shown to innovators (e.g. "About your product or service").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(rename = "subSections")]
    pub sub_sections: Vec<SubSection>,
}

/// A submittable unit of the record. Documents store answers per subsection id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubSection {
    pub id: String,
    pub title: String,
    pub steps: Vec<Step>,
    /// Whether innovators may attach files to this subsection.
    #[serde(rename = "hasFiles", default, skip_serializing_if = "is_false")]
    pub has_files: bool,
    /// Fields whose value is derived when the listed conditions hold.
    #[serde(
        rename = "calculatedFields",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub calculated_fields: BTreeMap<String, Vec<StepCondition>>,
}

impl SubSection {
    /// Iterate over the questions of every step, in declaration order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.steps.iter().flat_map(|s| s.questions.iter())
    }
}

/// One page of questions. A conditional step is only shown when the referenced
/// question's answer matches one of the listed options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<StepCondition>,
}

/// A reference to an earlier question plus the answers that satisfy it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepCondition {
    pub id: String,
    pub options: Vec<String>,
}

/// Question data types. "Tipified" types expose discrete option values and are
/// the only ones a condition may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "textarea")]
    Textarea,
    #[serde(rename = "radio-group")]
    RadioGroup,
    #[serde(rename = "checkbox-array")]
    CheckboxArray,
    #[serde(rename = "autocomplete-array")]
    AutocompleteArray,
    #[serde(rename = "fields-group")]
    FieldsGroup,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::RadioGroup => "radio-group",
            Self::CheckboxArray => "checkbox-array",
            Self::AutocompleteArray => "autocomplete-array",
            Self::FieldsGroup => "fields-group",
        }
    }

    /// Whether the type exposes discrete option values.
    pub fn is_tipified(&self) -> bool {
        matches!(self, Self::RadioGroup | Self::CheckboxArray | Self::AutocompleteArray)
    }
}

/// A single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Question {
    pub id: String,
    #[serde(rename = "dataType")]
    pub data_type: DataType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Option values for tipified questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validations: Option<Validations>,
    /// For `fields-group`: the question repeated per group entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Box<Question>>,
    /// For `fields-group`: an optional follow-up question per group entry.
    #[serde(rename = "addQuestion", default, skip_serializing_if = "Option::is_none")]
    pub add_question: Option<Box<Question>>,
    /// For `fields-group`: the label of the "add another" control.
    #[serde(rename = "addNewLabel", default, skip_serializing_if = "Option::is_none")]
    pub add_new_label: Option<String>,
    /// Label used when rendering the answer back on a check-answers page.
    #[serde(
        rename = "checkAnswerLabel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub check_answer_label: Option<String>,
}

impl Question {
    pub fn new(id: impl Into<String>, data_type: DataType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_type,
            label: label.into(),
            description: None,
            items: Vec::new(),
            validations: None,
            field: None,
            add_question: None,
            add_new_label: None,
            check_answer_label: None,
        }
    }

    /// Item ids of this question, in declaration order.
    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.id.as_str()).collect()
    }

    /// This question's id plus the ids of every item-conditional question,
    /// recursively. Conditional answers are stored as sibling fields of the
    /// parent answer, so they share the subsection id space.
    pub fn collect_field_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(self.id.as_str());
        for item in &self.items {
            if let Some(q) = &item.conditional {
                q.collect_field_ids(out);
            }
        }
    }
}

/// One option of a tipified question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
    /// Empty only for `itemsFromAnswer` placeholders.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// An exclusive item clears every other selection (e.g. "None of the above").
    #[serde(default, skip_serializing_if = "is_false")]
    pub exclusive: bool,
    /// A follow-up question shown when this item is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<Box<Question>>,
    /// Populate items from the answer of an earlier question instead of a
    /// static list. Must be the only entry of the item list.
    #[serde(
        rename = "itemsFromAnswer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub items_from_answer: Option<String>,
}

impl Item {
    /// A plain static option with id equal to meaning code.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            exclusive: false,
            conditional: None,
            items_from_answer: None,
        }
    }

    /// An item whose option list is sourced from an earlier answer.
    pub fn from_answer(question_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            exclusive: false,
            conditional: None,
            items_from_answer: Some(question_id.into()),
        }
    }
}

/// Declarative validation rules attached to a question. When present, at
/// least one recognized key must be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Validations {
    #[serde(rename = "isRequired", default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    #[serde(rename = "minLength", default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(
        rename = "postcodeFormat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub postcode_format: Option<bool>,
    #[serde(rename = "urlFormat", default, skip_serializing_if = "Option::is_none")]
    pub url_format: Option<bool>,
    #[serde(
        rename = "equalToLength",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub equal_to_length: Option<usize>,
}

impl Validations {
    /// Number of recognized keys that are set.
    pub fn recognized_keys(&self) -> usize {
        [
            self.is_required.is_some(),
            self.min.is_some(),
            self.max.is_some(),
            self.min_length.is_some(),
            self.max_length.is_some(),
            self.postcode_format.is_some(),
            self.url_format.is_some(),
            self.equal_to_length.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    pub fn required() -> Self {
        Self {
            is_required: Some(true),
            ..Self::default()
        }
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_wire_names() {
        let v = json!({
            "sections": [{
                "id": "s1",
                "title": "Section one",
                "subSections": [{
                    "id": "sub1",
                    "title": "Subsection one",
                    "hasFiles": true,
                    "steps": [{
                        "questions": [{
                            "id": "q1",
                            "dataType": "radio-group",
                            "label": "Pick one",
                            "items": [
                                { "id": "YES", "label": "Yes" },
                                { "id": "NO", "label": "No" }
                            ]
                        }]
                    }]
                }]
            }]
        });

        let schema: IrSchema = serde_json::from_value(v).unwrap();
        let sub = &schema.sections[0].sub_sections[0];
        assert!(sub.has_files);
        assert_eq!(sub.questions().count(), 1);
        assert_eq!(schema.sections[0].sub_sections[0].steps[0].questions[0].item_ids(), ["YES", "NO"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let v = json!({
            "sections": [],
            "surprise": true
        });
        assert!(serde_json::from_value::<IrSchema>(v).is_err());
    }

    #[test]
    fn conditional_questions_share_the_field_id_space() {
        let q = Question {
            id: "categories".into(),
            data_type: DataType::CheckboxArray,
            label: "Categories".into(),
            description: None,
            items: vec![
                Item::new("A", "A"),
                Item {
                    conditional: Some(Box::new(Question {
                        id: "otherCategoryDescription".into(),
                        data_type: DataType::Text,
                        label: "Other".into(),
                        description: None,
                        items: vec![],
                        validations: None,
                        field: None,
                        add_question: None,
                        add_new_label: None,
                        check_answer_label: None,
                    })),
                    ..Item::new("OTHER", "Other")
                },
            ],
            validations: None,
            field: None,
            add_question: None,
            add_new_label: None,
            check_answer_label: None,
        };

        let mut ids = Vec::new();
        q.collect_field_ids(&mut ids);
        assert_eq!(ids, ["categories", "otherCategoryDescription"]);
    }

    #[test]
    fn validations_count_recognized_keys() {
        let v = Validations {
            is_required: Some(true),
            max_length: Some(500),
            ..Validations::default()
        };
        assert_eq!(v.recognized_keys(), 2);
        assert_eq!(Validations::default().recognized_keys(), 0);
    }

    #[test]
    fn round_trips_compactly() {
        let schema = IrSchema {
            sections: vec![Section {
                id: "s".into(),
                title: "S".into(),
                sub_sections: vec![],
            }],
        };
        let v = serde_json::to_value(&schema).unwrap();
        let back: IrSchema = serde_json::from_value(v).unwrap();
        assert_eq!(schema, back);
    }
}
