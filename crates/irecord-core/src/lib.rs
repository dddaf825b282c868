//! irecord-core
//!
//! Core primitives for the Innovation Record service:
//! - Typed schema model (sections → subsections → steps → questions → items)
//! - Rule engine validating schema integrity (all problems reported at once)
//! - Document cleanup (schema projection) and translation (coded value → label)
//! - Versioned built-in record definitions (202209, 202304)
//! - Document migration across record versions
//!
//! This crate performs no filesystem or network I/O and reads no environment.
//! All inputs arrive as in-memory JSON or typed structures; higher-level
//! crates (store, CLI) perform I/O and pass data in.

pub mod catalog;
pub mod document;
pub mod errors;
pub mod migrate;
pub mod model;
pub mod rules;
pub mod schemas;
pub mod translate;
pub mod version;

pub use crate::errors::{CoreError, CoreResult};

/// Version label of the latest built-in record definition.
pub const LATEST_VERSION: &str = "202304";

/// Convenience re-exports.
pub mod prelude {
    pub use crate::model::{
        DataType, IrSchema, Item, Question, Section, Step, StepCondition, SubSection, Validations,
    };
    pub use crate::rules::{LoadedSchema, RequiredQuestions, RuleViolation, SchemaModel, ValidationReport};
    pub use crate::translate::TranslationTable;
    pub use crate::version::DocumentVersion;
    pub use crate::{CoreError, CoreResult};
}
