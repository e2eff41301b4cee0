//! Common test utilities for building business logic.
use caseforge::prelude::*;

/// A task with the given outcomes and no metadata.
#[allow(dead_code)]
pub fn task(slug: &str, outcomes: &[&str]) -> TaskSpec {
    TaskSpec {
        slug: Some(slug.to_string()),
        display_name: Some(slug.to_uppercase()),
        outcomes: Some(outcomes.iter().map(|o| o.to_string()).collect()),
        ..TaskSpec::default()
    }
}

/// Same as [`task`], assigned to a person so inspection finds nothing to complain about.
#[allow(dead_code)]
pub fn assigned_task(slug: &str, outcomes: &[&str]) -> TaskSpec {
    TaskSpec {
        assignee: Some("${initiator}".to_string()),
        ..task(slug, outcomes)
    }
}

#[allow(dead_code)]
pub fn pattern(kind: &str, tasks: &[&str]) -> PatternSpec {
    PatternSpec {
        pattern_type: Some(kind.to_string()),
        tasks: tasks.iter().map(|t| t.to_string()).collect(),
        conditions: Vec::new(),
    }
}

#[allow(dead_code)]
pub fn condition(source: &str, target: &str, outcome: &str, operator: Option<&str>) -> ConditionSpec {
    ConditionSpec {
        source_task: Some(source.to_string()),
        target_task: Some(target.to_string()),
        outcome: Some(outcome.to_string()),
        operator: operator.map(str::to_string),
        ..ConditionSpec::default()
    }
}

/// `submit -> review -> finalize`, sequential, with `review` gated on `submit`
/// completing as `submitted`.
#[allow(dead_code)]
pub fn submit_review_finalize() -> BusinessLogic {
    let mut sequence = pattern("sequential", &["submit", "review", "finalize"]);
    sequence
        .conditions
        .push(condition("submit", "review", "submitted", Some("equals")));
    BusinessLogic {
        tasks: vec![
            task("submit", &["submitted"]),
            task("review", &["approved", "rejected"]),
            task("finalize", &["done"]),
        ],
        patterns: vec![sequence],
    }
}

/// Tasks `t0..tn` chained sequentially, all in the default stage.
#[allow(dead_code)]
pub fn chain(n: usize) -> BusinessLogic {
    let slugs: Vec<String> = (0..n).map(|i| format!("t{}", i)).collect();
    let refs: Vec<&str> = slugs.iter().map(String::as_str).collect();
    BusinessLogic {
        tasks: refs.iter().map(|s| task(s, &["done"])).collect(),
        patterns: vec![pattern("sequential", &refs)],
    }
}

/// Compiles with default settings, panicking on failure.
#[allow(dead_code)]
pub fn compile(logic: BusinessLogic) -> CompiledCase {
    Compiler::builder(logic, "app")
        .build()
        .compile()
        .expect("Failed to compile")
}
