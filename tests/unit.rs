//! Unit tests for naming, condition rendering and error messages.
mod common;
use caseforge::condition::{render_predicate, synthesize};
use caseforge::logic::{Comparison, LogicalOperator};
use caseforge::naming;
use caseforge::prelude::*;
use caseforge::routing::Predicate;

fn predicate(source: &str, outcome: &str, comparison: Comparison, connector: LogicalOperator) -> Predicate {
    Predicate {
        source: source.to_string(),
        outcome: outcome.to_string(),
        comparison,
        connector,
    }
}

#[test]
fn test_normalize_produces_xml_names() {
    assert_eq!(naming::normalize("review"), "review");
    assert_eq!(naming::normalize("credit check"), "credit_check");
    assert_eq!(naming::normalize("2nd-opinion"), "_2nd-opinion");
    assert_eq!(naming::normalize("a/b:c"), "a_b_c");
    assert_eq!(naming::normalize("v1.2"), "v1.2");
}

#[test]
fn test_expression_variables_are_identifiers() {
    assert_eq!(naming::outcome_variable("credit-check"), "credit_check_outcome");
    assert_eq!(naming::outcome_variable("v1.2"), "v1_2_outcome");
    assert_eq!(naming::repetition_counter("upload"), "upload_repetitions");
}

#[test]
fn test_id_scheme() {
    assert_eq!(naming::human_task_id("review"), "task_review");
    assert_eq!(naming::task_plan_item_id("review"), "planItem_review");
    assert_eq!(naming::stage_id("main"), "stage_main");
    assert_eq!(naming::stage_plan_item_id("main"), "planItem_stage_main");
    assert_eq!(naming::sentry_id("review", 2), "sentry_review_2");
    assert_eq!(naming::entry_criterion_id("review", 2), "entryCriterion_review_2");
    assert_eq!(naming::on_part_id("review", 2, 1), "onPart_review_2_1");
    assert_eq!(naming::shape_id("planItem_review"), "CMMNShape_planItem_review");
    assert_eq!(naming::edge_id("onPart_review_2_1"), "CMMNEdge_onPart_review_2_1");
    assert_eq!(naming::slug_from_task_id("task_review"), "review");
    assert_eq!(naming::slug_from_task_id("custom"), "custom");
}

#[test]
fn test_render_predicate_quotes_literals() {
    let p = predicate("review", "it's \\ fine", Comparison::NotEquals, LogicalOperator::And);
    assert_eq!(render_predicate(&p), r"review_outcome != 'it\'s \\ fine'");
}

#[test]
fn test_synthesize_without_predicates_is_empty() {
    assert_eq!(synthesize(&[]), "");
}

#[test]
fn test_synthesize_ignores_first_connector() {
    let predicates = [
        predicate("a", "yes", Comparison::Equals, LogicalOperator::Or),
        predicate("b", "no", Comparison::NotEquals, LogicalOperator::And),
        predicate("c", "maybe", Comparison::Equals, LogicalOperator::Or),
    ];
    assert_eq!(
        synthesize(&predicates),
        "${a_outcome == 'yes' && b_outcome != 'no' || c_outcome == 'maybe'}"
    );
}

#[test]
fn test_pattern_kind_names() {
    assert_eq!(PatternKind::ApprovalChain.to_string(), "approval-chain");
    assert_eq!("Retry".parse::<PatternKind>(), Ok(PatternKind::Retry));
    assert!("loop".parse::<PatternKind>().is_err());
}

#[test]
fn test_error_display() {
    let err = ValidationError::UnknownPatternTask {
        pattern_index: 1,
        slug: "ghost".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Pattern at index 1 references unknown task 'ghost'"
    );

    let err = ValidationError::MissingConditionField {
        pattern_index: 0,
        condition_index: 2,
        field: "outcome",
    };
    assert_eq!(
        err.to_string(),
        "Condition 2 of pattern 0 is missing its 'outcome' field"
    );

    let err = CompileError::from(ValidationError::EmptyTasks);
    assert_eq!(err.to_string(), "Business logic must define at least one task");

    let err = StructuralDocumentError::MissingNamespace { found: None };
    assert_eq!(
        err.to_string(),
        "Root element does not declare the CMMN model namespace (found None)"
    );
}

#[test]
fn test_warning_display() {
    let warning = QualityWarning::new(WarningKind::MissingName, Some("task_b"), "human task has no name");
    assert_eq!(warning.to_string(), "[MissingName] task_b: human task has no name");

    let warning = QualityWarning::new(WarningKind::MissingShape, None, "no shape");
    assert_eq!(warning.to_string(), "[MissingShape] no shape");
}
