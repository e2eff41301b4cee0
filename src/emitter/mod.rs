//! Serializes a validated, laid-out and routed graph into a CMMN document.
//!
//! The semantic model and the diagram section are written into two separate
//! fragments of one [`EmitterContext`] and concatenated at the end. The emitter has no
//! state beyond that context, so identical input yields identical bytes.

use crate::error::CompileError;
use crate::layout::Layout;
use crate::logic::BusinessGraph;
use crate::routing::Routing;
use tracing::debug;

mod diagram;
mod model;
pub mod outcome;
mod xml;

use xml::XmlWriter;

pub const CMMN_MODEL_NS: &str = "http://www.omg.org/spec/CMMN/20151109/MODEL";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const FLOWABLE_NS: &str = "http://flowable.org/cmmn";
pub const CMMNDI_NS: &str = "http://www.omg.org/spec/CMMN/20151109/CMMNDI";
pub const DC_NS: &str = "http://www.omg.org/spec/CMMN/20151109/DC";
pub const DI_NS: &str = "http://www.omg.org/spec/CMMN/20151109/DI";
pub const TARGET_NS: &str = "http://www.flowable.org/casedef";

/// Completion listener that records a task's outcome and applies its status transitions.
pub const OUTCOME_LISTENER_CLASS: &str = "com.caseforge.cmmn.listener.TaskOutcomeListener";
/// Lifecycle listener that enforces a plan item's repetition limit.
pub const REPETITION_LISTENER_CLASS: &str = "com.caseforge.cmmn.listener.RepetitionLimitListener";
/// Name of the listener field carrying the outcome configuration JSON.
pub const OUTCOME_FIELD: &str = "outcomeConfig";

pub const EXPORTER: &str = "caseforge";

/// Identity of the emitted case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseIdentity {
    pub case_id: String,
    pub case_name: String,
}

/// Everything one emission pass reads, plus the fragments it writes.
pub(crate) struct EmitterContext<'a> {
    pub graph: &'a BusinessGraph,
    pub layout: &'a Layout,
    pub routing: &'a Routing,
    pub case: &'a CaseIdentity,
    model: XmlWriter,
    diagram: XmlWriter,
}

impl<'a> EmitterContext<'a> {
    pub(crate) fn new(
        graph: &'a BusinessGraph,
        layout: &'a Layout,
        routing: &'a Routing,
        case: &'a CaseIdentity,
    ) -> Self {
        Self {
            graph,
            layout,
            routing,
            case,
            model: XmlWriter::with_depth(1),
            diagram: XmlWriter::with_depth(1),
        }
    }
}

/// Writes the complete document.
pub fn emit(
    graph: &BusinessGraph,
    layout: &Layout,
    routing: &Routing,
    case: &CaseIdentity,
) -> Result<String, CompileError> {
    let mut ctx = EmitterContext::new(graph, layout, routing, case);
    model::write_case(&mut ctx)?;
    diagram::write_diagram(&mut ctx)?;

    let mut doc = XmlWriter::default();
    doc.raw_line(r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    doc.open(
        "definitions",
        &[
            ("xmlns", CMMN_MODEL_NS),
            ("xmlns:xsi", XSI_NS),
            ("xmlns:flowable", FLOWABLE_NS),
            ("xmlns:cmmndi", CMMNDI_NS),
            ("xmlns:dc", DC_NS),
            ("xmlns:di", DI_NS),
            ("targetNamespace", TARGET_NS),
            ("exporter", EXPORTER),
            ("exporterVersion", env!("CARGO_PKG_VERSION")),
        ],
    )?;
    doc.push_fragment(ctx.model);
    doc.push_fragment(ctx.diagram);
    doc.close("definitions")?;

    let xml = doc.finish();
    debug!(bytes = xml.len(), case = %case.case_id, "document emitted");
    Ok(xml)
}
