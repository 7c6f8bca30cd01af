use crate::assembler::*;
use crate::context::partition_bounded_contexts;
use crate::resolver::MethodCallIndex;
use crate::types::Project;
use eventmap_facts::FactStore;

/// Assemble a [`Project`] from a fact store
pub struct ProjectBuilder<'a> {
    facts: &'a FactStore,
}

impl<'a> ProjectBuilder<'a> {
    pub fn new(facts: &'a FactStore) -> Self {
        Self { facts }
    }

    /// Run every assembler and partition the result into bounded contexts.
    ///
    /// Never fails: an empty store yields an empty project.
    pub fn build(&self) -> Project {
        // Phase 1: Index aggregate calls for chain resolution
        let index = MethodCallIndex::from_aggregate_calls(self.facts.aggregate_calls());

        // Phase 2: Assemble entities (independent of each other)
        let mut project = Project {
            aggregates: assemble_aggregates(self.facts),
            events: assemble_events(self.facts),
            commands: assemble_commands(self.facts, &index),
            subscribers: assemble_subscribers(self.facts),
            user_interfaces: assemble_user_interfaces(self.facts),
            ..Project::default()
        };

        // Phase 3: Group identities by bounded context
        project.bounded_contexts = partition_bounded_contexts(&project);

        let stats = project.stats();
        log::info!(
            "Assembled project: {} aggregates, {} events, {} commands, {} subscribers, {} user interfaces in {} bounded contexts",
            stats.aggregates,
            stats.events,
            stats.commands,
            stats.subscribers,
            stats.user_interfaces,
            stats.bounded_contexts
        );

        project
    }
}

impl Project {
    /// Shorthand for [`ProjectBuilder::build`]
    pub fn from_facts(facts: &FactStore) -> Self {
        ProjectBuilder::new(facts).build()
    }
}
