use super::{Predicate, Transition};
use crate::logic::{
    BusinessGraph, BusinessPattern, Comparison, ConditionDefinition, LogicalOperator, PatternKind,
};
use ahash::AHashMap;

fn default_predicate(source: &str, outcome: &str, comparison: Comparison) -> Predicate {
    Predicate {
        source: source.to_string(),
        outcome: outcome.to_string(),
        comparison,
        connector: LogicalOperator::And,
    }
}

impl From<&ConditionDefinition> for Predicate {
    fn from(condition: &ConditionDefinition) -> Self {
        Predicate {
            source: condition.source_task.clone(),
            outcome: condition.outcome.clone(),
            comparison: condition.comparison,
            connector: condition.connector,
        }
    }
}

/// The pairs a pattern implies on its own, with the predicate used when the user
/// declared no condition for that pair.
fn implied_pairs<'a>(
    pattern: &'a BusinessPattern,
    graph: &BusinessGraph,
) -> Vec<(&'a str, &'a str, Option<Predicate>)> {
    let tasks = &pattern.tasks;
    let head = tasks[0].as_str();
    let outcomes = |slug: &str| {
        graph
            .task(slug)
            .map(|t| t.outcomes.as_slice())
            .unwrap_or_default()
    };

    match pattern.kind {
        PatternKind::Sequential => tasks
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str(), None))
            .collect(),
        PatternKind::ApprovalChain => tasks
            .windows(2)
            .map(|w| {
                // The first outcome of each approver is its approving outcome.
                let gate = outcomes(&w[0])
                    .first()
                    .map(|o| default_predicate(&w[0], o, Comparison::Equals));
                (w[0].as_str(), w[1].as_str(), gate)
            })
            .collect(),
        PatternKind::Parallel => tasks[1..]
            .iter()
            .map(|t| (head, t.as_str(), None))
            .collect(),
        PatternKind::Conditional => tasks[1..]
            .iter()
            .enumerate()
            .map(|(i, branch)| {
                let gate = outcomes(head)
                    .get(i)
                    .map(|o| default_predicate(head, o, Comparison::Equals));
                (head, branch.as_str(), gate)
            })
            .collect(),
        PatternKind::Retry => {
            let retry_outcome = outcomes(head).last();
            let mut pairs = vec![(
                head,
                head,
                retry_outcome.map(|o| default_predicate(head, o, Comparison::Equals)),
            )];
            if let Some(next) = tasks.get(1).filter(|t| t.as_str() != head) {
                pairs.push((
                    head,
                    next.as_str(),
                    retry_outcome.map(|o| default_predicate(head, o, Comparison::NotEquals)),
                ));
            }
            pairs
        }
    }
}

/// Accumulates transitions keyed by `(source, target)`, merging predicates of
/// repeated pairs in declaration order.
#[derive(Default)]
struct TransitionSet {
    transitions: Vec<Transition>,
    index: AHashMap<(String, String), usize>,
}

impl TransitionSet {
    fn add(&mut self, source: &str, target: &str, predicates: Vec<Predicate>) {
        let key = (source.to_string(), target.to_string());
        match self.index.get(&key) {
            Some(&i) => {
                let existing = &mut self.transitions[i].predicates;
                for predicate in predicates {
                    if !existing.contains(&predicate) {
                        existing.push(predicate);
                    }
                }
            }
            None => {
                self.index.insert(key, self.transitions.len());
                self.transitions.push(Transition {
                    source: source.to_string(),
                    target: target.to_string(),
                    predicates,
                });
            }
        }
    }
}

/// Expands every pattern of `graph` into transitions.
///
/// Declared conditions replace the implied predicate of their pair; conditions on
/// pairs the pattern does not imply become transitions of their own.
pub fn derive(graph: &BusinessGraph) -> Vec<Transition> {
    let mut set = TransitionSet::default();

    for pattern in &graph.patterns {
        let implied = implied_pairs(pattern, graph);
        for (source, target, gate) in &implied {
            let declared: Vec<Predicate> = pattern
                .conditions
                .iter()
                .filter(|c| c.source_task == *source && c.target_task == *target)
                .map(Predicate::from)
                .collect();
            let predicates = if declared.is_empty() {
                gate.iter().cloned().collect()
            } else {
                declared
            };
            set.add(source, target, predicates);
        }

        for condition in &pattern.conditions {
            let covered = implied.iter().any(|(source, target, _)| {
                condition.source_task == *source && condition.target_task == *target
            });
            if !covered {
                set.add(
                    &condition.source_task,
                    &condition.target_task,
                    vec![Predicate::from(condition)],
                );
            }
        }
    }

    set.transitions
}
