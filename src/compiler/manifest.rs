use crate::logic::BusinessGraph;
use crate::naming;
use serde::Serialize;

/// Metadata about a compiled case, for whoever persists or deploys it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseManifest {
    pub case_key: String,
    pub case_name: String,
    pub application_id: String,
    pub stages: Vec<StageManifest>,
    pub tasks: Vec<TaskManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageManifest {
    pub name: String,
    pub stage_id: String,
    pub plan_item_id: String,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskManifest {
    pub slug: String,
    pub display_name: String,
    pub stage: String,
    pub task_id: String,
    pub plan_item_id: String,
    pub outcome_variable: String,
    pub outcomes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_limit: Option<u32>,
}

impl CaseManifest {
    pub(crate) fn describe(
        graph: &BusinessGraph,
        case_key: &str,
        case_name: &str,
        application_id: &str,
    ) -> Self {
        let stages = graph
            .stages()
            .into_iter()
            .map(|(name, tasks)| StageManifest {
                name: name.to_string(),
                stage_id: naming::stage_id(name),
                plan_item_id: naming::stage_plan_item_id(name),
                tasks: tasks.iter().map(|t| t.slug.clone()).collect(),
            })
            .collect();
        let tasks = graph
            .tasks
            .iter()
            .map(|t| TaskManifest {
                slug: t.slug.clone(),
                display_name: t.display_name.clone(),
                stage: t.stage.clone(),
                task_id: naming::human_task_id(&t.slug),
                plan_item_id: naming::task_plan_item_id(&t.slug),
                outcome_variable: naming::outcome_variable(&t.slug),
                outcomes: t.outcomes.clone(),
                repetition_limit: t.repetition_limit,
            })
            .collect();

        Self {
            case_key: case_key.to_string(),
            case_name: case_name.to_string(),
            application_id: application_id.to_string(),
            stages,
            tasks,
        }
    }

    pub fn task(&self, slug: &str) -> Option<&TaskManifest> {
        self.tasks.iter().find(|t| t.slug == slug)
    }
}
