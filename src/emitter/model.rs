use super::outcome::OutcomeConfig;
use super::xml::XmlWriter;
use super::{EmitterContext, OUTCOME_FIELD, OUTCOME_LISTENER_CLASS, REPETITION_LISTENER_CLASS};
use crate::error::CompileError;
use crate::logic::{BusinessGraph, TaskDefinition};
use crate::naming;
use crate::routing::{Routing, Sentry, SentryKind};
use itertools::Itertools;

/// A plan item repeats when it has a limit, a retry loop of its own, or an entry
/// sentry fed by a task declared at or after it.
fn repeats(graph: &BusinessGraph, task: &TaskDefinition, sentries: &[&Sentry]) -> bool {
    task.repetition_limit.is_some()
        || sentries.iter().any(|s| match s.kind {
            SentryKind::Repeat => true,
            SentryKind::Entry => s.on_parts.iter().any(|p| reenters(graph, task, &p.source_ref)),
            SentryKind::StageStart => false,
        })
}

fn reenters(graph: &BusinessGraph, task: &TaskDefinition, source_ref: &str) -> bool {
    let source = graph
        .tasks
        .iter()
        .position(|t| naming::task_plan_item_id(&t.slug) == source_ref);
    match (source, graph.position(&task.slug)) {
        (Some(source), Some(target)) => source >= target,
        _ => false,
    }
}

pub(super) fn write_case(ctx: &mut EmitterContext<'_>) -> Result<(), CompileError> {
    let (graph, routing, case) = (ctx.graph, ctx.routing, ctx.case);
    let w = &mut ctx.model;

    w.open(
        "case",
        &[
            ("id", case.case_id.as_str()),
            ("name", case.case_name.as_str()),
            ("flowable:initiatorVariableName", "initiator"),
        ],
    )?;
    w.open(
        "casePlanModel",
        &[
            ("id", naming::CASE_PLAN_MODEL_ID),
            ("name", case.case_name.as_str()),
            ("flowable:formFieldValidation", "true"),
        ],
    )?;

    let stages = graph.stages();
    for (stage, _) in &stages {
        let id = naming::stage_plan_item_id(stage);
        let definition = naming::stage_id(stage);
        w.empty(
            "planItem",
            &[
                ("id", id.as_str()),
                ("name", *stage),
                ("definitionRef", definition.as_str()),
            ],
        )?;
    }
    for (stage, tasks) in &stages {
        write_stage(w, graph, stage, tasks, routing)?;
    }

    w.close("casePlanModel")?;
    w.close("case")?;
    Ok(())
}

fn write_stage(
    w: &mut XmlWriter,
    graph: &BusinessGraph,
    stage: &str,
    tasks: &[&TaskDefinition],
    routing: &Routing,
) -> Result<(), CompileError> {
    let id = naming::stage_id(stage);
    w.open("stage", &[("id", id.as_str()), ("name", stage)])?;

    for task in tasks {
        write_plan_item(w, graph, task, routing)?;
    }
    for task in tasks {
        let owner = naming::task_plan_item_id(&task.slug);
        for sentry in routing.for_owner(&owner) {
            write_sentry(w, sentry)?;
        }
    }
    for task in tasks {
        write_human_task(w, graph, task, routing)?;
    }

    w.close("stage")?;
    Ok(())
}

fn write_plan_item(
    w: &mut XmlWriter,
    graph: &BusinessGraph,
    task: &TaskDefinition,
    routing: &Routing,
) -> Result<(), CompileError> {
    let id = naming::task_plan_item_id(&task.slug);
    let definition = naming::human_task_id(&task.slug);
    let attrs = [
        ("id", id.as_str()),
        ("name", task.display_name.as_str()),
        ("definitionRef", definition.as_str()),
    ];
    let sentries: Vec<&Sentry> = routing.for_owner(&id).collect();
    let repeated = repeats(graph, task, &sentries);

    if sentries.is_empty() && !repeated {
        w.empty("planItem", &attrs)?;
        return Ok(());
    }

    w.open("planItem", &attrs)?;
    if repeated {
        let counter = naming::repetition_counter(&task.slug);
        w.open("itemControl", &[])?;
        match task.repetition_limit {
            Some(limit) => {
                w.open("repetitionRule", &[("flowable:counterVariable", counter.as_str())])?;
                w.cdata("condition", &[], &format!("${{{} < {}}}", counter, limit))?;
                w.close("repetitionRule")?;
            }
            None => w.empty("repetitionRule", &[("flowable:counterVariable", counter.as_str())])?,
        }
        w.close("itemControl")?;
    }
    for sentry in &sentries {
        w.empty(
            "entryCriterion",
            &[
                ("id", sentry.criterion_id.as_str()),
                ("sentryRef", sentry.id.as_str()),
            ],
        )?;
    }
    w.close("planItem")?;
    Ok(())
}

fn write_sentry(w: &mut XmlWriter, sentry: &Sentry) -> Result<(), CompileError> {
    w.open("sentry", &[("id", sentry.id.as_str())])?;
    for on_part in &sentry.on_parts {
        w.open(
            "planItemOnPart",
            &[
                ("id", on_part.id.as_str()),
                ("sourceRef", on_part.source_ref.as_str()),
            ],
        )?;
        w.text("standardEvent", &[], on_part.event.as_str())?;
        w.close("planItemOnPart")?;
    }
    if !sentry.condition.is_empty() {
        w.open("ifPart", &[("id", sentry.if_part_id.as_str())])?;
        w.cdata("condition", &[], &sentry.condition)?;
        w.close("ifPart")?;
    }
    w.close("sentry")?;
    Ok(())
}

fn write_human_task(
    w: &mut XmlWriter,
    graph: &BusinessGraph,
    task: &TaskDefinition,
    routing: &Routing,
) -> Result<(), CompileError> {
    let id = naming::human_task_id(&task.slug);
    let groups = task.candidate_groups.iter().join(",");

    let mut attrs: Vec<(&str, &str)> = vec![("id", id.as_str()), ("name", task.display_name.as_str())];
    if let Some(assignee) = &task.assignee {
        attrs.push(("flowable:assignee", assignee.as_str()));
    }
    if !groups.is_empty() {
        attrs.push(("flowable:candidateGroups", groups.as_str()));
    }
    if let Some(due_date) = &task.due_date {
        attrs.push(("flowable:dueDate", due_date.as_str()));
    }
    if let Some(form_key) = &task.form_key {
        attrs.push(("flowable:formKey", form_key.as_str()));
    }

    let config = OutcomeConfig::for_task(task, &routing.transitions);
    let json = serde_json::to_string(&config).map_err(|e| CompileError::OutcomeConfig {
        slug: task.slug.clone(),
        message: e.to_string(),
    })?;
    let owner = naming::task_plan_item_id(&task.slug);
    let sentries: Vec<&Sentry> = routing.for_owner(&owner).collect();

    w.open("humanTask", &attrs)?;
    w.open("extensionElements", &[])?;
    w.open(
        "flowable:taskListener",
        &[("event", "complete"), ("class", OUTCOME_LISTENER_CLASS)],
    )?;
    w.open("flowable:field", &[("name", OUTCOME_FIELD)])?;
    w.cdata("flowable:string", &[], &json)?;
    w.close("flowable:field")?;
    w.close("flowable:taskListener")?;
    if repeats(graph, task, &sentries) {
        w.empty(
            "flowable:planItemLifecycleListener",
            &[
                ("sourceState", "active"),
                ("targetState", "completed"),
                ("class", REPETITION_LISTENER_CLASS),
            ],
        )?;
    }
    w.close("extensionElements")?;
    w.close("humanTask")?;
    Ok(())
}
