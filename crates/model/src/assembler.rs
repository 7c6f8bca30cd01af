//! Per-kind entity assembly.
//!
//! Every assembler reads the immutable [`FactStore`] and returns a fresh map
//! keyed by identity. Facts that cannot be correlated are skipped, never
//! treated as errors.

use crate::resolver::MethodCallIndex;
use crate::types::*;
use eventmap_facts::FactStore;
use std::collections::BTreeMap;

/// Events from declarations, plus minimal events for identities that calls
/// reference without a declaration
pub fn assemble_events(facts: &FactStore) -> BTreeMap<String, Event> {
    let mut events = BTreeMap::new();

    for declaration in facts.events() {
        events
            .entry(declaration.identity.clone())
            .or_insert_with(|| Event::new(&declaration.name, &declaration.identity));
    }

    let recorded = facts
        .aggregate_calls()
        .iter()
        .filter_map(|call| call.event_identity.as_deref());
    let reacted = facts
        .subscriber_calls()
        .iter()
        .flat_map(|call| call.event_identities.iter().map(String::as_str))
        .filter(|&identity| identity != WILDCARD_EVENT);

    for identity in recorded.chain(reacted) {
        if events.contains_key(identity) {
            continue;
        }

        log::debug!("Event {} referenced without declaration", identity);
        events.insert(
            identity.to_string(),
            Event::new(class_to_name(identity), identity),
        );
    }

    events
}

/// Declared aggregates with the union of events recorded and commands
/// handled across their call sites
pub fn assemble_aggregates(facts: &FactStore) -> BTreeMap<String, Aggregate> {
    let mut aggregates = BTreeMap::new();

    for declaration in facts.aggregates() {
        aggregates
            .entry(declaration.identity.clone())
            .or_insert_with(|| Aggregate::new(&declaration.name, &declaration.identity));
    }

    for call in facts.aggregate_calls() {
        let Some(aggregate) = aggregates.get_mut(&call.aggregate_identity) else {
            log::debug!(
                "Skipping call in undeclared aggregate {}",
                call.aggregate_identity
            );
            continue;
        };

        if let Some(event) = &call.event_identity {
            aggregate.events.insert(event.clone());
        }

        if let Some(command) = &call.command_identity {
            aggregate.commands.insert(command.clone());
        }
    }

    aggregates
}

/// Commands handled by aggregates or dispatched by controllers.
///
/// The first aggregate call naming a command decides where its events are
/// resolved from. Commands only seen in controller dispatches have no events.
pub fn assemble_commands(facts: &FactStore, index: &MethodCallIndex) -> BTreeMap<String, Command> {
    let mut commands = BTreeMap::new();

    for call in facts.aggregate_calls() {
        let Some(identity) = &call.command_identity else {
            continue;
        };

        if commands.contains_key(identity) {
            continue;
        }

        let events = index.resolve_events(&call.aggregate_identity, &call.calling_method);
        commands.insert(identity.clone(), command(identity, events));
    }

    for dispatch in facts.command_dispatches() {
        commands
            .entry(dispatch.command_identity.clone())
            .or_insert_with(|| command(&dispatch.command_identity, Vec::new()));
    }

    commands
}

fn command(identity: &str, events: Vec<String>) -> Command {
    Command {
        name: class_to_name(identity).to_string(),
        identity: identity.to_string(),
        events,
    }
}

/// Declared subscribers with the events they react to and commands they
/// dispatch.
///
/// Reacting to the wildcard replaces every concrete event and keeps doing so
/// for later calls of the same subscriber.
pub fn assemble_subscribers(facts: &FactStore) -> BTreeMap<String, Subscriber> {
    let mut subscribers = BTreeMap::new();

    for declaration in facts.subscribers() {
        subscribers
            .entry(declaration.identity.clone())
            .or_insert_with(|| {
                Subscriber::new(&declaration.name, &declaration.identity, declaration.kind)
            });
    }

    for call in facts.subscriber_calls() {
        let Some(subscriber) = subscribers.get_mut(&call.subscriber_identity) else {
            log::debug!(
                "Skipping call in undeclared subscriber {}",
                call.subscriber_identity
            );
            continue;
        };

        for event in &call.event_identities {
            if event == WILDCARD_EVENT {
                subscriber.events.clear();
                subscriber.events.insert(WILDCARD_EVENT.to_string());
                break;
            }

            if !subscriber.reacts_to_all() {
                subscriber.events.insert(event.clone());
            }
        }

        if let Some(command) = &call.command_identity {
            subscriber.commands.insert(command.clone());
        }
    }

    subscribers
}

/// Controllers with every command they dispatch and subscriber they read,
/// one entry per call site
pub fn assemble_user_interfaces(facts: &FactStore) -> BTreeMap<String, UserInterface> {
    let mut interfaces: BTreeMap<String, UserInterface> = BTreeMap::new();

    for dispatch in facts.command_dispatches() {
        interfaces
            .entry(dispatch.controller_identity.clone())
            .or_insert_with(|| UserInterface::from_identity(&dispatch.controller_identity))
            .commands
            .push(dispatch.command_identity.clone());
    }

    for access in facts.subscriber_accesses() {
        interfaces
            .entry(access.controller_identity.clone())
            .or_insert_with(|| UserInterface::from_identity(&access.controller_identity))
            .subscribers
            .push(access.subscriber_identity.clone());
    }

    interfaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventmap_facts::{
        AggregateDeclaration, AggregateMethodCall, CommandDispatch, EventDeclaration, Fact,
        SubscriberAccess, SubscriberCall, SubscriberDeclaration, SubscriberKind,
    };
    use pretty_assertions::assert_eq;

    fn aggregate_call(
        aggregate: &str,
        calling: &str,
        called: Option<&str>,
        event: Option<&str>,
        command: Option<&str>,
    ) -> Fact {
        Fact::AggregateMethodCall(AggregateMethodCall {
            aggregate_identity: aggregate.to_string(),
            calling_method: calling.to_string(),
            called_method: called.map(str::to_string),
            event_identity: event.map(str::to_string),
            command_identity: command.map(str::to_string),
        })
    }

    fn subscriber_call(subscriber: &str, events: &[&str], command: Option<&str>) -> Fact {
        Fact::SubscriberCall(SubscriberCall {
            subscriber_identity: subscriber.to_string(),
            calling_method: "handle".to_string(),
            called_method: Some("dispatch".to_string()),
            event_identities: events.iter().map(|e| e.to_string()).collect(),
            command_identity: command.map(str::to_string),
        })
    }

    fn projector(identity: &str) -> Fact {
        Fact::SubscriberDeclaration(SubscriberDeclaration {
            identity: identity.to_string(),
            kind: SubscriberKind::Projector,
            name: "profile".to_string(),
        })
    }

    #[test]
    fn test_first_event_declaration_wins() {
        let facts = FactStore::from_facts(vec![
            Fact::EventDeclaration(EventDeclaration {
                identity: "App\\Created".to_string(),
                name: "profile.created".to_string(),
            }),
            Fact::EventDeclaration(EventDeclaration {
                identity: "App\\Created".to_string(),
                name: "other".to_string(),
            }),
        ]);

        let events = assemble_events(&facts);
        assert_eq!(events.len(), 1);
        assert_eq!(events["App\\Created"].name, "profile.created");
    }

    #[test]
    fn test_undeclared_events_are_synthesized() {
        let facts = FactStore::from_facts(vec![
            aggregate_call("App\\Profile", "create", Some("recordThat"), Some("App\\Created"), None),
            subscriber_call("App\\Projection", &["App\\Renamed", WILDCARD_EVENT], None),
        ]);

        let events = assemble_events(&facts);
        let names: Vec<_> = events.values().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Created", "Renamed"]);
        assert!(!events.contains_key(WILDCARD_EVENT));
    }

    #[test]
    fn test_aggregate_relationships_are_unions() {
        let facts = FactStore::from_facts(vec![
            Fact::AggregateDeclaration(AggregateDeclaration {
                identity: "App\\Profile".to_string(),
                name: "profile".to_string(),
            }),
            aggregate_call("App\\Profile", "create", Some("recordThat"), Some("E1"), Some("C1")),
            aggregate_call("App\\Profile", "update", Some("recordThat"), Some("E2"), Some("C2")),
            aggregate_call("App\\Profile", "update", Some("foo"), None, Some("C2")),
            aggregate_call("App\\Profile", "foo", Some("recordThat"), Some("E2"), None),
            aggregate_call("App\\Other", "run", Some("recordThat"), Some("E3"), None),
        ]);

        let aggregates = assemble_aggregates(&facts);
        assert_eq!(aggregates.len(), 1);

        let profile = &aggregates["App\\Profile"];
        assert_eq!(profile.name, "profile");
        assert_eq!(profile.events.iter().collect::<Vec<_>>(), vec!["E1", "E2"]);
        assert_eq!(profile.commands.iter().collect::<Vec<_>>(), vec!["C1", "C2"]);
    }

    #[test]
    fn test_command_events_follow_first_handler() {
        let facts = FactStore::from_facts(vec![
            aggregate_call("A", "update", Some("foo"), None, Some("App\\Update")),
            aggregate_call("A", "foo", Some("recordThat"), Some("E2"), None),
            aggregate_call("A", "other", Some("recordThat"), Some("E9"), Some("App\\Update")),
        ]);
        let index = MethodCallIndex::from_aggregate_calls(facts.aggregate_calls());

        let commands = assemble_commands(&facts, &index);
        let update = &commands["App\\Update"];
        assert_eq!(update.name, "Update");
        assert_eq!(update.events, vec!["E2"]);
    }

    #[test]
    fn test_dispatched_command_without_handler_has_no_events() {
        let facts = FactStore::from_facts(vec![Fact::CommandDispatch(CommandDispatch {
            controller_identity: "App\\Ui".to_string(),
            command_identity: "App\\Cmd\\Register".to_string(),
        })]);
        let index = MethodCallIndex::from_aggregate_calls(facts.aggregate_calls());

        let commands = assemble_commands(&facts, &index);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands["App\\Cmd\\Register"].name, "Register");
        assert!(commands["App\\Cmd\\Register"].events.is_empty());
    }

    #[test]
    fn test_subscriber_unions_events_and_commands() {
        let facts = FactStore::from_facts(vec![
            projector("App\\Projection"),
            subscriber_call("App\\Projection", &["E1"], Some("C1")),
            subscriber_call("App\\Projection", &["E2", "E1"], Some("C1")),
            subscriber_call("App\\Unknown", &["E3"], None),
        ]);

        let subscribers = assemble_subscribers(&facts);
        assert_eq!(subscribers.len(), 1);

        let projection = &subscribers["App\\Projection"];
        assert_eq!(projection.kind, SubscriberKind::Projector);
        assert_eq!(projection.events.iter().collect::<Vec<_>>(), vec!["E1", "E2"]);
        assert_eq!(projection.commands.iter().collect::<Vec<_>>(), vec!["C1"]);
    }

    #[test]
    fn test_wildcard_replaces_and_sticks() {
        let facts = FactStore::from_facts(vec![
            projector("App\\Projection"),
            subscriber_call("App\\Projection", &["E1"], None),
            subscriber_call("App\\Projection", &["E2", WILDCARD_EVENT, "E3"], None),
            subscriber_call("App\\Projection", &["E4"], None),
        ]);

        let subscribers = assemble_subscribers(&facts);
        let projection = &subscribers["App\\Projection"];
        assert_eq!(projection.events.iter().collect::<Vec<_>>(), vec![WILDCARD_EVENT]);
        assert!(projection.reacts_to_all());
    }

    #[test]
    fn test_user_interfaces_keep_every_call_site() {
        let facts = FactStore::from_facts(vec![
            Fact::CommandDispatch(CommandDispatch {
                controller_identity: "App\\Ui".to_string(),
                command_identity: "C1".to_string(),
            }),
            Fact::SubscriberAccess(SubscriberAccess {
                controller_identity: "App\\Reader".to_string(),
                subscriber_identity: "S1".to_string(),
            }),
            Fact::CommandDispatch(CommandDispatch {
                controller_identity: "App\\Ui".to_string(),
                command_identity: "C1".to_string(),
            }),
        ]);

        let interfaces = assemble_user_interfaces(&facts);
        assert_eq!(interfaces.len(), 2);
        assert_eq!(interfaces["App\\Ui"].commands, vec!["C1", "C1"]);
        assert_eq!(interfaces["App\\Reader"].name, "Reader");
        assert_eq!(interfaces["App\\Reader"].subscribers, vec!["S1"]);
        assert!(interfaces["App\\Reader"].commands.is_empty());
    }
}
