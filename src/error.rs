use std::fmt;
use thiserror::Error;

/// Errors raised while checking a business-logic graph, before any layout work.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Failed to decode business logic: {0}")]
    Decode(String),

    #[error("Business logic must define at least one task")]
    EmptyTasks,

    #[error("Task at index {index} has no slug")]
    MissingSlug { index: usize },

    #[error("Task '{slug}' at index {index} must declare at least one outcome")]
    EmptyOutcomes { index: usize, slug: String },

    #[error("Task slug '{slug}' at index {index} is already used by an earlier task")]
    DuplicateSlug { index: usize, slug: String },

    #[error(
        "Stage '{stage}' of task at index {index} maps to the same id as an earlier stage"
    )]
    DuplicateStage { index: usize, stage: String },

    #[error("Task slug '{slug}' at index {index} maps to the id of stage '{stage}'")]
    SlugClashesWithStage {
        index: usize,
        slug: String,
        stage: String,
    },

    #[error(
        "Pattern at index {index} has an invalid type '{type_name}' (expected sequential, approval-chain, parallel, conditional or retry)"
    )]
    InvalidPatternType { index: usize, type_name: String },

    #[error("Pattern at index {index} does not list any tasks")]
    EmptyPattern { index: usize },

    #[error("Pattern at index {pattern_index} references unknown task '{slug}'")]
    UnknownPatternTask { pattern_index: usize, slug: String },

    #[error(
        "Condition {condition_index} of pattern {pattern_index} is missing its '{field}' field"
    )]
    MissingConditionField {
        pattern_index: usize,
        condition_index: usize,
        field: &'static str,
    },

    #[error(
        "Condition {condition_index} of pattern {pattern_index} references unknown {field} '{slug}'"
    )]
    UnknownConditionTask {
        pattern_index: usize,
        condition_index: usize,
        field: &'static str,
        slug: String,
    },

    #[error(
        "Condition {condition_index} of pattern {pattern_index} has an unrecognised operator '{value}'"
    )]
    InvalidOperator {
        pattern_index: usize,
        condition_index: usize,
        value: String,
    },
}

/// Errors that can occur while compiling a validated graph into a document.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to write document: {0}")]
    Emit(#[from] fmt::Error),

    #[error("Failed to serialize outcome configuration for task '{slug}': {message}")]
    OutcomeConfig { slug: String, message: String },
}

/// A document is missing something without which it cannot be deployed or read back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralDocumentError {
    #[error("Document is not well-formed XML: {0}")]
    Malformed(String),

    #[error("Document has no 'definitions' root element")]
    MissingDefinitions,

    #[error("Root element does not declare the CMMN model namespace (found {found:?})")]
    MissingNamespace { found: Option<String> },

    #[error("Document has no 'case' element")]
    MissingCase,

    #[error("Document has no 'casePlanModel' element")]
    MissingCasePlanModel,

    #[error("Document has no 'CMMNDI' diagram section")]
    MissingDiagram,
}

/// Category of a non-fatal finding reported by the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    MissingName,
    MissingAssignment,
    MissingOutcomeListener,
    MalformedOutcomeJson,
    MissingOutcomes,
    MissingShape,
}

/// A stylistic or compatibility issue that does not invalidate a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityWarning {
    pub kind: WarningKind,
    pub element_id: Option<String>,
    pub message: String,
}

impl QualityWarning {
    pub fn new(kind: WarningKind, element_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            element_id: element_id.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element_id {
            Some(id) => write!(f, "[{:?}] {}: {}", self.kind, id, self.message),
            None => write!(f, "[{:?}] {}", self.kind, self.message),
        }
    }
}
