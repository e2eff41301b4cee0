//! Prelude module for convenient imports
//!
//! Re-exports the types needed to compile and inspect cases without importing each
//! module individually.

// Compilation
pub use crate::compiler::{CaseManifest, CompiledCase, Compiler, CompilerBuilder};

// Input model
pub use crate::logic::{
    BusinessGraph, BusinessLogic, ConditionSpec, IntoBusinessLogic, PatternKind, PatternSpec,
    TaskSpec,
};

// Layout configuration
pub use crate::layout::{LayoutConfig, LayoutMode};

// Inspection
pub use crate::inspector::{InspectionReport, inspect, reconstruct};

// Error types
pub use crate::error::{
    CompileError, QualityWarning, StructuralDocumentError, ValidationError, WarningKind,
};
