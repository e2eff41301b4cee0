use super::{InspectedTask, inspect};
use crate::error::StructuralDocumentError;
use crate::logic::{BusinessLogic, PatternKind, PatternSpec, TaskSpec};
use crate::naming;
use tracing::debug;

fn task_spec(task: &InspectedTask) -> TaskSpec {
    // The outcome configuration carries the original slug; ids only carry its normalized form.
    let slug = task
        .outcome_config
        .as_ref()
        .map(|c| c.task.clone())
        .unwrap_or_else(|| naming::slug_from_task_id(&task.id).to_string());

    TaskSpec {
        slug: Some(slug),
        display_name: task.name.clone(),
        outcomes: (!task.outcomes.is_empty()).then(|| task.outcomes.clone()),
        assignee: task.assignee.clone(),
        candidate_groups: (!task.candidate_groups.is_empty())
            .then(|| task.candidate_groups.clone()),
        due_date: task.due_date.clone(),
        form_key: task.form_key.clone(),
        repetition_limit: task
            .outcome_config
            .as_ref()
            .and_then(|c| c.repetition_limit),
        stage: task.stage.clone(),
    }
}

/// Rebuilds business logic from a compiled document.
///
/// Tasks come back in document order. Sentry conditions are not parsed, so the
/// tasks are linked by a single sequential pattern.
pub fn reconstruct(xml: &str) -> Result<BusinessLogic, StructuralDocumentError> {
    let report = inspect(xml);
    if let Some(error) = report.errors.into_iter().next() {
        return Err(error);
    }

    let tasks: Vec<TaskSpec> = report.tasks.iter().map(task_spec).collect();
    let order: Vec<String> = tasks.iter().filter_map(|t| t.slug.clone()).collect();
    let patterns = if order.is_empty() {
        Vec::new()
    } else {
        vec![PatternSpec {
            pattern_type: Some(PatternKind::Sequential.as_str().to_string()),
            tasks: order,
            conditions: Vec::new(),
        }]
    };

    debug!(tasks = tasks.len(), "business logic reconstructed");
    Ok(BusinessLogic { tasks, patterns })
}
