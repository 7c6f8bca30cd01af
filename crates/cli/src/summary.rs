use eventmap_facts::{FactKind, FactStore};
use eventmap_model::{Project, ProjectStats};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts reported by `eventmap summary`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub facts: BTreeMap<FactKind, usize>,
    pub project: ProjectStats,
    pub bounded_contexts: Vec<String>,

    /// Commands no resolvable call chain leads to an event from
    pub commands_without_events: Vec<String>,
}

impl Summary {
    pub fn new(facts: &FactStore, project: &Project) -> Self {
        Self {
            facts: facts.kind_counts(),
            project: project.stats(),
            bounded_contexts: project.bounded_contexts.keys().cloned().collect(),
            commands_without_events: project
                .commands
                .values()
                .filter(|command| command.events.is_empty())
                .map(|command| command.identity.clone())
                .collect(),
        }
    }
}
