use super::definition::*;
use crate::error::ValidationError;
use crate::naming;
use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

enum OperatorToken {
    Comparison(Comparison),
    Connector(LogicalOperator),
}

fn parse_operator(raw: &str) -> Option<OperatorToken> {
    let key: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();
    match key.as_str() {
        "equals" | "eq" | "==" | "=" => Some(OperatorToken::Comparison(Comparison::Equals)),
        "notequals" | "neq" | "ne" | "!=" => {
            Some(OperatorToken::Comparison(Comparison::NotEquals))
        }
        "and" | "&&" => Some(OperatorToken::Connector(LogicalOperator::And)),
        "or" | "||" => Some(OperatorToken::Connector(LogicalOperator::Or)),
        _ => None,
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl BusinessLogic {
    /// Checks the logic for well-formedness and referential consistency.
    pub fn validate(&self) -> Result<BusinessGraph, ValidationError> {
        validate(self)
    }
}

/// Validates raw business logic and returns the typed graph used by the compiler.
///
/// Tasks are checked first, then patterns in declaration order; the first problem
/// found is returned.
pub fn validate(logic: &BusinessLogic) -> Result<BusinessGraph, ValidationError> {
    if logic.tasks.is_empty() {
        return Err(ValidationError::EmptyTasks);
    }

    let mut tasks = Vec::with_capacity(logic.tasks.len());
    let mut seen: AHashSet<String> = AHashSet::new();
    // Slugs become XML ids and expression variables; both must stay unique.
    let mut ids: AHashSet<String> = AHashSet::new();
    let mut variables: AHashSet<String> = AHashSet::new();
    let mut stages: AHashMap<String, String> = AHashMap::new();
    for (index, spec) in logic.tasks.iter().enumerate() {
        let slug = non_blank(&spec.slug).ok_or(ValidationError::MissingSlug { index })?;
        if !seen.insert(slug.clone())
            || !ids.insert(naming::normalize(&slug))
            || !variables.insert(naming::outcome_variable(&slug))
        {
            return Err(ValidationError::DuplicateSlug { index, slug });
        }

        let stage = non_blank(&spec.stage).unwrap_or_else(|| DEFAULT_STAGE.to_string());
        match stages.get(&naming::stage_id(&stage)) {
            Some(known) if *known != stage => {
                return Err(ValidationError::DuplicateStage { index, stage });
            }
            Some(_) => {}
            None => {
                stages.insert(naming::stage_id(&stage), stage.clone());
            }
        }

        let outcomes: Vec<String> = spec
            .outcomes
            .iter()
            .flatten()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if outcomes.is_empty() {
            return Err(ValidationError::EmptyOutcomes { index, slug });
        }

        tasks.push(TaskDefinition {
            display_name: non_blank(&spec.display_name).unwrap_or_else(|| slug.clone()),
            outcomes,
            assignee: non_blank(&spec.assignee),
            candidate_groups: spec
                .candidate_groups
                .iter()
                .flatten()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
            due_date: non_blank(&spec.due_date),
            form_key: non_blank(&spec.form_key),
            repetition_limit: spec.repetition_limit,
            stage,
            slug,
        });
    }

    let stage_items: AHashMap<String, &str> = stages
        .values()
        .map(|stage| (naming::stage_plan_item_id(stage), stage.as_str()))
        .collect();
    for (index, task) in tasks.iter().enumerate() {
        if let Some(stage) = stage_items.get(&naming::task_plan_item_id(&task.slug)) {
            return Err(ValidationError::SlugClashesWithStage {
                index,
                slug: task.slug.clone(),
                stage: stage.to_string(),
            });
        }
    }

    let mut patterns = Vec::with_capacity(logic.patterns.len());
    for (index, spec) in logic.patterns.iter().enumerate() {
        patterns.push(validate_pattern(index, spec, &seen)?);
    }

    let graph = BusinessGraph::new(tasks, patterns);
    warn_on_unknown_outcomes(&graph);
    debug!(
        tasks = graph.tasks.len(),
        patterns = graph.patterns.len(),
        "business logic validated"
    );
    Ok(graph)
}

fn validate_pattern(
    index: usize,
    spec: &PatternSpec,
    known: &AHashSet<String>,
) -> Result<BusinessPattern, ValidationError> {
    let type_name = spec.pattern_type.clone().unwrap_or_default();
    let kind = type_name
        .parse::<PatternKind>()
        .map_err(|_| ValidationError::InvalidPatternType { index, type_name })?;

    let tasks: Vec<String> = spec.tasks.iter().map(|t| t.trim().to_string()).collect();
    if tasks.is_empty() {
        return Err(ValidationError::EmptyPattern { index });
    }
    if let Some(slug) = tasks.iter().find(|t| !known.contains(t.as_str())) {
        return Err(ValidationError::UnknownPatternTask {
            pattern_index: index,
            slug: slug.clone(),
        });
    }

    let conditions = spec
        .conditions
        .iter()
        .enumerate()
        .map(|(condition_index, c)| validate_condition(index, condition_index, c, known))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BusinessPattern {
        kind,
        tasks,
        conditions,
    })
}

fn validate_condition(
    pattern_index: usize,
    condition_index: usize,
    spec: &ConditionSpec,
    known: &AHashSet<String>,
) -> Result<ConditionDefinition, ValidationError> {
    let missing = |field: &'static str| ValidationError::MissingConditionField {
        pattern_index,
        condition_index,
        field,
    };
    let resolve = |field: &'static str, value: &Option<String>| -> Result<String, ValidationError> {
        let slug = non_blank(value).ok_or_else(|| missing(field))?;
        if known.contains(&slug) {
            Ok(slug)
        } else {
            Err(ValidationError::UnknownConditionTask {
                pattern_index,
                condition_index,
                field,
                slug,
            })
        }
    };

    let source_task = resolve("sourceTask", &spec.source_task)?;
    let target_task = resolve("targetTask", &spec.target_task)?;
    let outcome = non_blank(&spec.outcome).ok_or_else(|| missing("outcome"))?;

    let mut comparison = None;
    let mut connector = None;
    for raw in [&spec.comparison, &spec.logical_operator, &spec.operator]
        .into_iter()
        .flatten()
    {
        match parse_operator(raw) {
            Some(OperatorToken::Comparison(c)) => {
                comparison.get_or_insert(c);
            }
            Some(OperatorToken::Connector(l)) => {
                connector.get_or_insert(l);
            }
            None => {
                return Err(ValidationError::InvalidOperator {
                    pattern_index,
                    condition_index,
                    value: raw.clone(),
                });
            }
        }
    }

    Ok(ConditionDefinition {
        source_task,
        target_task,
        outcome,
        comparison: comparison.unwrap_or_default(),
        connector: connector.unwrap_or_default(),
    })
}

fn warn_on_unknown_outcomes(graph: &BusinessGraph) {
    for condition in graph.patterns.iter().flat_map(|p| &p.conditions) {
        let declared = graph
            .task(&condition.source_task)
            .is_some_and(|t| t.outcomes.contains(&condition.outcome));
        if !declared {
            warn!(
                source = %condition.source_task,
                outcome = %condition.outcome,
                "condition refers to an outcome its source task does not declare"
            );
        }
    }
}
