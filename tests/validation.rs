//! Tests for decoding and validating business logic.
mod common;
use caseforge::logic::{Comparison, DEFAULT_STAGE, LogicalOperator};
use caseforge::prelude::*;
use common::*;

#[test]
fn test_valid_logic_produces_typed_graph() {
    let graph = submit_review_finalize().validate().expect("Failed to validate");

    assert_eq!(graph.tasks.len(), 3);
    assert_eq!(graph.first_task().slug, "submit");
    assert_eq!(graph.position("finalize"), Some(2));
    assert_eq!(graph.patterns[0].kind, PatternKind::Sequential);

    let condition = &graph.patterns[0].conditions[0];
    assert_eq!(condition.source_task, "submit");
    assert_eq!(condition.target_task, "review");
    assert_eq!(condition.comparison, Comparison::Equals);
    assert_eq!(condition.connector, LogicalOperator::And);
}

#[test]
fn test_defaults_for_optional_fields() {
    let mut logic = chain(1);
    logic.tasks[0].display_name = None;
    let graph = logic.validate().unwrap();

    let task = &graph.tasks[0];
    assert_eq!(task.display_name, "t0");
    assert_eq!(task.stage, DEFAULT_STAGE);
    assert!(task.candidate_groups.is_empty());
}

#[test]
fn test_empty_tasks_rejected() {
    let logic = BusinessLogic::default();
    assert_eq!(logic.validate().unwrap_err(), ValidationError::EmptyTasks);
}

#[test]
fn test_missing_slug_reports_index() {
    let mut logic = chain(3);
    logic.tasks[1].slug = Some("   ".to_string());
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::MissingSlug { index: 1 }
    );
}

#[test]
fn test_empty_outcomes_rejected() {
    let mut logic = chain(2);
    logic.tasks[1].outcomes = Some(vec![" ".to_string()]);
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::EmptyOutcomes {
            index: 1,
            slug: "t1".to_string()
        }
    );

    logic.tasks[1].outcomes = None;
    assert!(matches!(
        logic.validate(),
        Err(ValidationError::EmptyOutcomes { index: 1, .. })
    ));
}

#[test]
fn test_duplicate_slug_rejected() {
    let mut logic = chain(2);
    logic.tasks.push(task("t0", &["again"]));
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::DuplicateSlug {
            index: 2,
            slug: "t0".to_string()
        }
    );
}

#[test]
fn test_slugs_colliding_after_normalization_rejected() {
    let logic = BusinessLogic {
        tasks: vec![task("credit check", &["ok"]), task("credit_check", &["ok"])],
        patterns: vec![],
    };
    assert!(matches!(
        logic.validate(),
        Err(ValidationError::DuplicateSlug { index: 1, .. })
    ));
}

#[test]
fn test_invalid_pattern_type_rejected() {
    let mut logic = chain(2);
    logic.patterns[0].pattern_type = Some("loop".to_string());
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::InvalidPatternType {
            index: 0,
            type_name: "loop".to_string()
        }
    );

    logic.patterns[0].pattern_type = None;
    assert!(matches!(
        logic.validate(),
        Err(ValidationError::InvalidPatternType { index: 0, .. })
    ));
}

#[test]
fn test_pattern_type_spellings_accepted() {
    for spelling in ["approval-chain", "approval_chain", "approvalChain", "APPROVAL CHAIN"] {
        let mut logic = chain(2);
        logic.patterns[0].pattern_type = Some(spelling.to_string());
        let graph = logic.validate().unwrap();
        assert_eq!(graph.patterns[0].kind, PatternKind::ApprovalChain, "{}", spelling);
    }
}

#[test]
fn test_empty_pattern_rejected() {
    let mut logic = chain(2);
    logic.patterns.push(pattern("parallel", &[]));
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::EmptyPattern { index: 1 }
    );
}

#[test]
fn test_unknown_pattern_task_rejected() {
    let mut logic = chain(2);
    logic.patterns[0].tasks.push("ghost".to_string());
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::UnknownPatternTask {
            pattern_index: 0,
            slug: "ghost".to_string()
        }
    );
}

#[test]
fn test_condition_with_unknown_target_rejected() {
    let mut logic = chain(2);
    logic.patterns[0]
        .conditions
        .push(condition("t0", "ghost", "done", None));
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::UnknownConditionTask {
            pattern_index: 0,
            condition_index: 0,
            field: "targetTask",
            slug: "ghost".to_string()
        }
    );
}

#[test]
fn test_condition_missing_fields_rejected() {
    let mut logic = chain(2);
    let mut c = condition("t0", "t1", "done", None);
    c.source_task = None;
    logic.patterns[0].conditions.push(c);
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::MissingConditionField {
            pattern_index: 0,
            condition_index: 0,
            field: "sourceTask"
        }
    );

    let mut logic = chain(2);
    let mut c = condition("t0", "t1", "done", None);
    c.outcome = Some(String::new());
    logic.patterns[0].conditions.push(c);
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::MissingConditionField {
            pattern_index: 0,
            condition_index: 0,
            field: "outcome"
        }
    );
}

#[test]
fn test_invalid_operator_rejected() {
    let mut logic = chain(2);
    logic.patterns[0]
        .conditions
        .push(condition("t0", "t1", "done", Some("maybe")));
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::InvalidOperator {
            pattern_index: 0,
            condition_index: 0,
            value: "maybe".to_string()
        }
    );
}

#[test]
fn test_operator_field_accepts_comparisons_and_connectors() {
    let mut logic = chain(3);
    let mut explicit = condition("t1", "t2", "done", Some("OR"));
    explicit.comparison = Some("!=".to_string());
    logic.patterns[0].conditions = vec![
        condition("t0", "t1", "done", Some("notEquals")),
        explicit,
        condition("t0", "t2", "done", Some("||")),
    ];

    let graph = logic.validate().unwrap();
    let conditions = &graph.patterns[0].conditions;
    assert_eq!(conditions[0].comparison, Comparison::NotEquals);
    assert_eq!(conditions[0].connector, LogicalOperator::And);
    assert_eq!(conditions[1].comparison, Comparison::NotEquals);
    assert_eq!(conditions[1].connector, LogicalOperator::Or);
    assert_eq!(conditions[2].comparison, Comparison::Equals);
    assert_eq!(conditions[2].connector, LogicalOperator::Or);
}

#[test]
fn test_explicit_fields_take_priority_over_operator() {
    let mut logic = chain(2);
    let mut c = condition("t0", "t1", "done", Some("equals"));
    c.comparison = Some("notEquals".to_string());
    logic.patterns[0].conditions.push(c);

    let graph = logic.validate().unwrap();
    assert_eq!(graph.patterns[0].conditions[0].comparison, Comparison::NotEquals);
}

#[test]
fn test_json_input_with_aliases() {
    let json = r#"{
        "tasks": [
            { "slug": "intake", "name": "Intake", "outcomes": ["ok"], "candidateGroups": "clerks, managers" },
            { "slug": "decide", "outcomes": ["yes", "no"], "stage": "decision", "repetitionLimit": 2 }
        ],
        "patterns": [
            { "type": "conditional", "tasks": ["intake", "decide"],
              "conditions": [{ "sourceTask": "intake", "targetTask": "decide", "outcome": "ok", "connector": "AND" }] }
        ]
    }"#;

    let logic = json.into_business_logic().unwrap();
    let graph = logic.validate().unwrap();

    assert_eq!(graph.tasks[0].display_name, "Intake");
    assert_eq!(graph.tasks[0].candidate_groups, vec!["clerks", "managers"]);
    assert_eq!(graph.tasks[1].stage, "decision");
    assert_eq!(graph.tasks[1].repetition_limit, Some(2));
    assert_eq!(graph.stages().len(), 2);
}

#[test]
fn test_double_encoded_json_is_decoded() {
    let inner = serde_json::to_string(&submit_review_finalize()).unwrap();
    let outer = serde_json::to_string(&inner).unwrap();

    let logic = outer.as_str().into_business_logic().unwrap();
    assert_eq!(logic, submit_review_finalize());

    let value = serde_json::Value::String(inner);
    assert_eq!(value.into_business_logic().unwrap(), submit_review_finalize());
}

#[test]
fn test_undecodable_input_rejected() {
    let result = "{ not json".into_business_logic();
    assert!(matches!(result, Err(ValidationError::Decode(_))));

    let result = "[1, 2, 3]".into_business_logic();
    assert!(matches!(result, Err(ValidationError::Decode(_))));
}

#[test]
fn test_stages_in_order_of_first_appearance() {
    let mut logic = chain(4);
    logic.tasks[0].stage = Some("intake".to_string());
    logic.tasks[1].stage = Some("review".to_string());
    logic.tasks[2].stage = Some("intake".to_string());

    let graph = logic.validate().unwrap();
    let stages: Vec<(&str, Vec<&str>)> = graph
        .stages()
        .into_iter()
        .map(|(name, tasks)| (name, tasks.iter().map(|t| t.slug.as_str()).collect()))
        .collect();
    assert_eq!(
        stages,
        vec![
            ("intake", vec!["t0", "t2"]),
            ("review", vec!["t1"]),
            ("main", vec!["t3"]),
        ]
    );
}

#[test]
fn test_slugs_sharing_an_outcome_variable_rejected() {
    let logic = BusinessLogic {
        tasks: vec![task("a-b", &["ok"]), task("a_b", &["ok"]), task("c", &["done"])],
        patterns: vec![pattern("sequential", &["a-b", "a_b", "c"])],
    };
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::DuplicateSlug {
            index: 1,
            slug: "a_b".to_string()
        }
    );
}

#[test]
fn test_stages_colliding_after_normalization_rejected() {
    let mut logic = chain(3);
    logic.tasks[0].stage = Some("x y".to_string());
    logic.tasks[1].stage = Some("x y".to_string());
    logic.tasks[2].stage = Some("x_y".to_string());
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::DuplicateStage {
            index: 2,
            stage: "x_y".to_string()
        }
    );
}

#[test]
fn test_slug_clashing_with_stage_plan_item_rejected() {
    let logic = BusinessLogic {
        tasks: vec![task("stage_main", &["done"]), task("b", &["done"])],
        patterns: vec![pattern("sequential", &["stage_main", "b"])],
    };
    assert_eq!(
        logic.validate().unwrap_err(),
        ValidationError::SlugClashesWithStage {
            index: 0,
            slug: "stage_main".to_string(),
            stage: "main".to_string()
        }
    );

    // The same slug is fine once no stage of that name exists.
    let mut renamed = logic.clone();
    for task in &mut renamed.tasks {
        task.stage = Some("intake".to_string());
    }
    assert!(renamed.validate().is_ok());
}
