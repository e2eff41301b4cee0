use crate::logic::{Comparison, TaskDefinition};
use crate::naming;
use crate::routing::Transition;
use serde::{Deserialize, Serialize};

/// Outcome handling embedded in each human task's completion listener.
///
/// The engine-side listener reads it to store the chosen outcome in `variable` and to
/// report which tasks each outcome unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeConfig {
    pub task: String,
    pub variable: String,
    pub outcomes: Vec<String>,
    #[serde(default)]
    pub routes: Vec<OutcomeRoute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRoute {
    pub outcome: String,
    pub targets: Vec<String>,
}

impl OutcomeConfig {
    pub fn for_task(task: &TaskDefinition, transitions: &[Transition]) -> Self {
        let routes = task
            .outcomes
            .iter()
            .map(|outcome| {
                let mut targets: Vec<String> = Vec::new();
                for transition in transitions.iter().filter(|t| t.source == task.slug) {
                    let mut own = transition
                        .predicates
                        .iter()
                        .filter(|p| p.source == task.slug)
                        .peekable();
                    // Ungated transitions are unlocked by every outcome.
                    let unlocked = own.peek().is_none()
                        || own.any(|p| match p.comparison {
                            Comparison::Equals => p.outcome == *outcome,
                            Comparison::NotEquals => p.outcome != *outcome,
                        });
                    if unlocked && !targets.contains(&transition.target) {
                        targets.push(transition.target.clone());
                    }
                }
                OutcomeRoute {
                    outcome: outcome.clone(),
                    targets,
                }
            })
            .collect();

        Self {
            task: task.slug.clone(),
            variable: naming::outcome_variable(&task.slug),
            outcomes: task.outcomes.clone(),
            routes,
            repetition_limit: task.repetition_limit,
        }
    }
}
