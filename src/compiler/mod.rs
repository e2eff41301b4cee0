//! The compilation pipeline: validate, lay out, route, synthesize conditions, emit.

use crate::condition;
use crate::emitter::{self, CaseIdentity};
use crate::error::{CompileError, ValidationError};
use crate::layout::{self, Layout, LayoutConfig, LayoutMode};
use crate::logic::{BusinessLogic, IntoBusinessLogic};
use crate::naming;
use crate::routing::{self, Routing};
use tracing::{debug, info};

mod manifest;

pub use manifest::{CaseManifest, StageManifest, TaskManifest};

pub const DEFAULT_CASE_NAME: &str = "case";

/// Everything one compilation produces.
#[derive(Debug, Clone)]
pub struct CompiledCase {
    /// Id of the emitted `case` element, `{caseName}_{applicationId}` normalized.
    pub case_key: String,
    pub xml: String,
    pub layout: Layout,
    pub routing: Routing,
    pub manifest: CaseManifest,
}

pub struct Compiler {
    logic: BusinessLogic,
    application_id: String,
    case_name: String,
    mode: LayoutMode,
    config: LayoutConfig,
}

pub struct CompilerBuilder {
    logic: BusinessLogic,
    application_id: String,
    case_name: String,
    mode: LayoutMode,
    config: LayoutConfig,
}

impl CompilerBuilder {
    pub fn new(logic: BusinessLogic, application_id: impl Into<String>) -> Self {
        Self {
            logic,
            application_id: application_id.into(),
            case_name: DEFAULT_CASE_NAME.to_string(),
            mode: LayoutMode::default(),
            config: LayoutConfig::default(),
        }
    }
    pub fn case_name(mut self, case_name: impl Into<String>) -> Self {
        self.case_name = case_name.into();
        self
    }
    pub fn layout_mode(mut self, mode: LayoutMode) -> Self {
        self.mode = mode;
        self
    }
    pub fn layout_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }
    pub fn build(self) -> Compiler {
        Compiler {
            logic: self.logic,
            application_id: self.application_id,
            case_name: self.case_name,
            mode: self.mode,
            config: self.config,
        }
    }
}

impl Compiler {
    pub fn builder(logic: BusinessLogic, application_id: impl Into<String>) -> CompilerBuilder {
        CompilerBuilder::new(logic, application_id)
    }

    /// Builder over anything convertible into [`BusinessLogic`], such as JSON text.
    pub fn from_source<S: IntoBusinessLogic>(
        source: S,
        application_id: impl Into<String>,
    ) -> Result<CompilerBuilder, ValidationError> {
        Ok(CompilerBuilder::new(
            source.into_business_logic()?,
            application_id,
        ))
    }

    pub fn compile(self) -> Result<CompiledCase, CompileError> {
        let graph = self.logic.validate()?;
        let layout = layout::compute(&graph, self.mode, &self.config);
        let mut routing = routing::route(&graph, &layout, &self.config);
        for sentry in &mut routing.sentries {
            sentry.condition = condition::synthesize(&sentry.predicates);
        }
        debug!(
            conditional = routing
                .sentries
                .iter()
                .filter(|s| !s.condition.is_empty())
                .count(),
            "conditions synthesized"
        );

        let case_key = naming::case_id(&self.case_name, &self.application_id);
        let case = CaseIdentity {
            case_id: case_key.clone(),
            case_name: self.case_name.clone(),
        };
        let xml = emitter::emit(&graph, &layout, &routing, &case)?;
        let manifest =
            CaseManifest::describe(&graph, &case_key, &self.case_name, &self.application_id);

        info!(
            case = %case_key,
            tasks = graph.tasks.len(),
            stages = manifest.stages.len(),
            sentries = routing.sentries.len(),
            "case compiled"
        );
        Ok(CompiledCase {
            case_key,
            xml,
            layout,
            routing,
            manifest,
        })
    }
}
