//! Identifier scheme shared by the emitter and the inspector.
//!
//! Every XML id is derived from a task slug or stage name, so compiling the same
//! graph twice yields the same ids and the inspector can map ids back to slugs.

pub const CASE_PLAN_MODEL_ID: &str = "casePlanModel";
pub const TASK_PREFIX: &str = "task_";
pub const PLAN_ITEM_PREFIX: &str = "planItem_";
pub const STAGE_PREFIX: &str = "stage_";

/// Turns an arbitrary label into a valid XML NCName fragment.
///
/// Letters, digits, `-` and `.` are kept; everything else becomes `_`. A leading
/// character that cannot start a name is prefixed with `_`.
pub fn normalize(label: &str) -> String {
    let mut out: String = label
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if !out.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        out.insert(0, '_');
    }
    out
}

/// Name of the case variable holding a task's completion outcome.
pub fn outcome_variable(slug: &str) -> String {
    format!("{}_outcome", identifier(slug))
}

/// Name of the counter variable used by a task's repetition rule.
pub fn repetition_counter(slug: &str) -> String {
    format!("{}_repetitions", identifier(slug))
}

/// Expression-safe identifier: `-` and `.` are not allowed in expression variables.
fn identifier(slug: &str) -> String {
    normalize(slug).replace(['-', '.'], "_")
}

pub fn case_id(case_name: &str, application_id: &str) -> String {
    normalize(&format!("{}_{}", case_name, application_id))
}

pub fn human_task_id(slug: &str) -> String {
    format!("{}{}", TASK_PREFIX, normalize(slug))
}

pub fn task_plan_item_id(slug: &str) -> String {
    format!("{}{}", PLAN_ITEM_PREFIX, normalize(slug))
}

pub fn stage_id(stage: &str) -> String {
    format!("{}{}", STAGE_PREFIX, normalize(stage))
}

pub fn stage_plan_item_id(stage: &str) -> String {
    format!("{}{}{}", PLAN_ITEM_PREFIX, STAGE_PREFIX, normalize(stage))
}

pub fn sentry_id(slug: &str, ordinal: usize) -> String {
    format!("sentry_{}_{}", normalize(slug), ordinal)
}

pub fn entry_criterion_id(slug: &str, ordinal: usize) -> String {
    format!("entryCriterion_{}_{}", normalize(slug), ordinal)
}

pub fn on_part_id(slug: &str, ordinal: usize, part: usize) -> String {
    format!("onPart_{}_{}_{}", normalize(slug), ordinal, part)
}

pub fn if_part_id(slug: &str, ordinal: usize) -> String {
    format!("ifPart_{}_{}", normalize(slug), ordinal)
}

pub fn shape_id(element_id: &str) -> String {
    format!("CMMNShape_{}", element_id)
}

pub fn edge_id(on_part_id: &str) -> String {
    format!("CMMNEdge_{}", on_part_id)
}

/// Recovers the (normalized) slug from a human task id.
pub fn slug_from_task_id(task_id: &str) -> &str {
    task_id.strip_prefix(TASK_PREFIX).unwrap_or(task_id)
}
