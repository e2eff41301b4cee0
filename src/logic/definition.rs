use ahash::AHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stage used for tasks that do not name one.
pub const DEFAULT_STAGE: &str = "main";

// --- Input model ---
// Mirrors the JSON handed over by callers. Every field is optional so that the
// validator, not serde, decides what is missing and can report where.

/// The business logic of one case, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessLogic {
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
    #[serde(default)]
    pub patterns: Vec<PatternSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub candidate_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub pattern_type: Option<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    /// Either a comparison (`equals`, `notEquals`) or a connector (`AND`, `OR`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    #[serde(default, alias = "connector", skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts `"a, b"` as well as `["a", "b"]` for list-valued fields.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        OneOrMany::One(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        OneOrMany::Many(list) => list,
    }))
}

// --- Validated model ---

/// A task that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub slug: String,
    pub display_name: String,
    pub outcomes: Vec<String>,
    pub assignee: Option<String>,
    pub candidate_groups: Vec<String>,
    pub due_date: Option<String>,
    pub form_key: Option<String>,
    pub repetition_limit: Option<u32>,
    pub stage: String,
}

/// The five sequencing patterns the compiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Sequential,
    ApprovalChain,
    Parallel,
    Conditional,
    Retry,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Sequential => "sequential",
            PatternKind::ApprovalChain => "approval-chain",
            PatternKind::Parallel => "parallel",
            PatternKind::Conditional => "conditional",
            PatternKind::Retry => "retry",
        }
    }
}

impl FromStr for PatternKind {
    type Err = ();

    /// Case-insensitive, and tolerant of `approval_chain` / `approvalChain` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "sequential" => Ok(PatternKind::Sequential),
            "approvalchain" => Ok(PatternKind::ApprovalChain),
            "parallel" => Ok(PatternKind::Parallel),
            "conditional" => Ok(PatternKind::Conditional),
            "retry" => Ok(PatternKind::Retry),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Comparison {
    #[default]
    Equals,
    NotEquals,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equals => "==",
            Comparison::NotEquals => "!=",
        }
    }
}

/// Connector joining a predicate to the one declared before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }
}

/// "`target` becomes eligible when `source_task` completes with `outcome`."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionDefinition {
    pub source_task: String,
    pub target_task: String,
    pub outcome: String,
    pub comparison: Comparison,
    pub connector: LogicalOperator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessPattern {
    pub kind: PatternKind,
    pub tasks: Vec<String>,
    pub conditions: Vec<ConditionDefinition>,
}

/// Strongly typed graph produced by validation; input of every downstream stage.
#[derive(Debug, Clone)]
pub struct BusinessGraph {
    pub tasks: Vec<TaskDefinition>,
    pub patterns: Vec<BusinessPattern>,
    index: AHashMap<String, usize>,
}

impl BusinessGraph {
    pub(crate) fn new(tasks: Vec<TaskDefinition>, patterns: Vec<BusinessPattern>) -> Self {
        let index = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.slug.clone(), i))
            .collect();
        Self {
            tasks,
            patterns,
            index,
        }
    }

    pub fn task(&self, slug: &str) -> Option<&TaskDefinition> {
        self.index.get(slug).map(|&i| &self.tasks[i])
    }

    /// Declaration order of a task.
    pub fn position(&self, slug: &str) -> Option<usize> {
        self.index.get(slug).copied()
    }

    /// The designated first task, triggered by its stage's start event.
    pub fn first_task(&self) -> &TaskDefinition {
        // Validation guarantees at least one task.
        &self.tasks[0]
    }

    /// Stages in order of first appearance, each with its tasks in declaration order.
    pub fn stages(&self) -> Vec<(&str, Vec<&TaskDefinition>)> {
        let mut stages: Vec<(&str, Vec<&TaskDefinition>)> = Vec::new();
        for task in &self.tasks {
            match stages.iter_mut().find(|(name, _)| *name == task.stage) {
                Some((_, members)) => members.push(task),
                None => stages.push((task.stage.as_str(), vec![task])),
            }
        }
        stages
    }
}
