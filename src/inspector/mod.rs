//! Reads a CMMN document back: checks its structure, reports quality issues and
//! extracts the human tasks it defines.

use crate::emitter::outcome::OutcomeConfig;
use crate::emitter::{CMMN_MODEL_NS, OUTCOME_FIELD, OUTCOME_LISTENER_CLASS};
use crate::error::{QualityWarning, StructuralDocumentError, WarningKind};
use ahash::AHashSet;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

mod reconstruct;

pub use reconstruct::reconstruct;

/// A human task as found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectedTask {
    pub id: String,
    pub name: Option<String>,
    pub stage: Option<String>,
    pub assignee: Option<String>,
    pub candidate_groups: Vec<String>,
    pub due_date: Option<String>,
    pub form_key: Option<String>,
    pub outcomes: Vec<String>,
    /// Parsed outcome configuration, when present and well-formed.
    pub outcome_config: Option<OutcomeConfig>,
    pub has_outcome_listener: bool,
}

/// Result of inspecting one document.
#[derive(Debug, Clone, Default)]
pub struct InspectionReport {
    pub case_id: Option<String>,
    pub case_name: Option<String>,
    /// Problems that make the document unusable.
    pub errors: Vec<StructuralDocumentError>,
    /// Problems worth fixing that do not invalidate the document.
    pub warnings: Vec<QualityWarning>,
    pub tasks: Vec<InspectedTask>,
}

impl InspectionReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn attr(e: &BytesStart, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Value of the default `xmlns`, and whether any namespace declaration is the CMMN one.
fn namespaces(e: &BytesStart) -> (Option<String>, bool) {
    let mut default = None;
    let mut declares_cmmn = false;
    for a in e.attributes().flatten() {
        let key = a.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            let value = a
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_default();
            declares_cmmn |= value == CMMN_MODEL_NS;
            if key == b"xmlns" {
                default = Some(value);
            }
        }
    }
    (default, declares_cmmn)
}

/// Mutable state of one pass over the event stream.
#[derive(Default)]
struct Scan {
    report: InspectionReport,
    root_seen: bool,
    has_case: bool,
    has_plan_model: bool,
    has_diagram: bool,
    stage: Option<String>,
    current_task: Option<usize>,
    in_outcome_field: bool,
    in_string: bool,
    field_text: String,
    plan_items: Vec<String>,
    shape_refs: AHashSet<String>,
}

impl Scan {
    fn start(&mut self, e: &BytesStart, empty: bool) -> Result<(), StructuralDocumentError> {
        let name = e.local_name();
        let name = name.as_ref();

        if !self.root_seen {
            self.root_seen = true;
            if name != b"definitions" {
                return Err(StructuralDocumentError::MissingDefinitions);
            }
            let (found, declares_cmmn) = namespaces(e);
            if !declares_cmmn {
                self.report
                    .errors
                    .push(StructuralDocumentError::MissingNamespace { found });
            }
            return Ok(());
        }

        match name {
            b"case" => {
                self.has_case = true;
                self.report.case_id = attr(e, b"id");
                self.report.case_name = attr(e, b"name");
            }
            b"casePlanModel" => self.has_plan_model = true,
            b"CMMNDI" => self.has_diagram = true,
            b"stage" if !empty => self.stage = attr(e, b"name"),
            b"planItem" => self.plan_items.extend(attr(e, b"id")),
            b"CMMNShape" => self.shape_refs.extend(attr(e, b"cmmnElementRef")),
            b"humanTask" => {
                let groups = attr(e, b"candidateGroups").unwrap_or_default();
                self.report.tasks.push(InspectedTask {
                    id: attr(e, b"id").unwrap_or_default(),
                    name: attr(e, b"name").filter(|n| !n.trim().is_empty()),
                    stage: self.stage.clone(),
                    assignee: attr(e, b"assignee"),
                    candidate_groups: groups
                        .split(',')
                        .map(str::trim)
                        .filter(|g| !g.is_empty())
                        .map(str::to_string)
                        .collect(),
                    due_date: attr(e, b"dueDate"),
                    form_key: attr(e, b"formKey"),
                    ..InspectedTask::default()
                });
                if !empty {
                    self.current_task = Some(self.report.tasks.len() - 1);
                }
            }
            b"taskListener" => {
                if let Some(i) = self.current_task {
                    if attr(e, b"class").as_deref() == Some(OUTCOME_LISTENER_CLASS) {
                        self.report.tasks[i].has_outcome_listener = true;
                    }
                }
            }
            b"field" if !empty => {
                self.in_outcome_field = self.current_task.is_some()
                    && attr(e, b"name").as_deref() == Some(OUTCOME_FIELD);
                self.field_text.clear();
            }
            b"string" if !empty => self.in_string = self.in_outcome_field,
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"stage" => self.stage = None,
            b"humanTask" => self.current_task = None,
            b"string" => self.in_string = false,
            b"field" => {
                if self.in_outcome_field {
                    self.read_outcome_config();
                }
                self.in_outcome_field = false;
            }
            _ => {}
        }
    }

    fn read_outcome_config(&mut self) {
        let Some(i) = self.current_task else {
            return;
        };
        match serde_json::from_str::<OutcomeConfig>(self.field_text.trim()) {
            Ok(config) => {
                let task = &mut self.report.tasks[i];
                task.outcomes = config.outcomes.clone();
                task.outcome_config = Some(config);
            }
            Err(e) => {
                let id = self.report.tasks[i].id.clone();
                self.report.warnings.push(QualityWarning::new(
                    WarningKind::MalformedOutcomeJson,
                    Some(&id),
                    format!("outcome configuration is not valid JSON: {}", e),
                ));
            }
        }
    }

    fn finish(mut self) -> InspectionReport {
        if !self.has_case {
            self.report.errors.push(StructuralDocumentError::MissingCase);
        }
        if !self.has_plan_model {
            self.report
                .errors
                .push(StructuralDocumentError::MissingCasePlanModel);
        }
        if !self.has_diagram {
            self.report.errors.push(StructuralDocumentError::MissingDiagram);
        }

        let mut warnings = Vec::new();
        for task in &self.report.tasks {
            let id = Some(task.id.as_str());
            if task.name.is_none() {
                warnings.push(QualityWarning::new(
                    WarningKind::MissingName,
                    id,
                    "human task has no name",
                ));
            }
            if task.assignee.is_none() && task.candidate_groups.is_empty() {
                warnings.push(QualityWarning::new(
                    WarningKind::MissingAssignment,
                    id,
                    "human task has neither an assignee nor candidate groups",
                ));
            }
            if !task.has_outcome_listener {
                warnings.push(QualityWarning::new(
                    WarningKind::MissingOutcomeListener,
                    id,
                    format!("completion listener '{}' is missing", OUTCOME_LISTENER_CLASS),
                ));
            }
            let malformed = self.report.warnings.iter().any(|w| {
                w.kind == WarningKind::MalformedOutcomeJson && w.element_id.as_deref() == id
            });
            if task.outcomes.is_empty() && !malformed {
                warnings.push(QualityWarning::new(
                    WarningKind::MissingOutcomes,
                    id,
                    "human task declares no outcomes",
                ));
            }
        }
        if self.has_diagram {
            for plan_item in &self.plan_items {
                if !self.shape_refs.contains(plan_item) {
                    warnings.push(QualityWarning::new(
                        WarningKind::MissingShape,
                        Some(plan_item),
                        "plan item has no diagram shape",
                    ));
                }
            }
        }
        self.report.warnings.extend(warnings);
        self.report
    }
}

/// Inspects `xml`. Never fails: problems are reported in the returned report.
pub fn inspect(xml: &str) -> InspectionReport {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut scan = Scan::default();

    loop {
        let step = match reader.read_event() {
            Ok(Event::Start(e)) => scan.start(&e, false),
            Ok(Event::Empty(e)) => scan.start(&e, true),
            Ok(Event::End(e)) => {
                scan.end(e.local_name().as_ref());
                Ok(())
            }
            Ok(Event::Text(e)) if scan.in_string => {
                let text = e
                    .unescape()
                    .map(|t| t.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                scan.field_text.push_str(&text);
                Ok(())
            }
            Ok(Event::CData(e)) if scan.in_string => {
                scan.field_text.push_str(&String::from_utf8_lossy(&e));
                Ok(())
            }
            Ok(Event::Eof) => break,
            Err(e) => Err(StructuralDocumentError::Malformed(e.to_string())),
            Ok(_) => Ok(()),
        };
        if let Err(error) = step {
            return InspectionReport {
                errors: vec![error],
                ..InspectionReport::default()
            };
        }
    }

    if !scan.root_seen {
        return InspectionReport {
            errors: vec![StructuralDocumentError::MissingDefinitions],
            ..InspectionReport::default()
        };
    }

    let report = scan.finish();
    debug!(
        tasks = report.tasks.len(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "document inspected"
    );
    report
}
