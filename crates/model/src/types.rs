use eventmap_facts::SubscriberKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Event identity a subscriber declares when it reacts to every event
pub const WILDCARD_EVENT: &str = "*";

/// Separator between namespace segments of an identity
pub const IDENTITY_SEPARATOR: char = '\\';

/// Short name of an identity: its last namespace segment
pub fn class_to_name(identity: &str) -> &str {
    identity
        .rsplit(IDENTITY_SEPARATOR)
        .next()
        .unwrap_or(identity)
}

/// Something that happened inside an aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub name: String,
    pub identity: String,
}

impl Event {
    pub fn new(name: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity: identity.into(),
        }
    }
}

/// A command and the events issuing it leads to.
///
/// `events` keeps discovery order and may repeat an identity when several
/// call paths record the same event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: String,
    pub identity: String,
    pub events: Vec<String>,
}

/// An aggregate root with the events it records and commands it handles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub name: String,
    pub identity: String,
    pub events: BTreeSet<String>,
    pub commands: BTreeSet<String>,
}

impl Aggregate {
    pub fn new(name: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity: identity.into(),
            events: BTreeSet::new(),
            commands: BTreeSet::new(),
        }
    }
}

/// A processor, projector or plain subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub name: String,
    pub identity: String,
    pub kind: SubscriberKind,

    /// Events reacted to; `{"*"}` when it reacts to all of them
    pub events: BTreeSet<String>,

    /// Commands it dispatches
    pub commands: BTreeSet<String>,
}

impl Subscriber {
    pub fn new(name: impl Into<String>, identity: impl Into<String>, kind: SubscriberKind) -> Self {
        Self {
            name: name.into(),
            identity: identity.into(),
            kind,
            events: BTreeSet::new(),
            commands: BTreeSet::new(),
        }
    }

    pub fn reacts_to_all(&self) -> bool {
        self.events.contains(WILDCARD_EVENT)
    }
}

/// An externally reachable entry point such as a controller.
///
/// Both lists hold one entry per observed call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInterface {
    pub name: String,
    pub identity: String,
    pub commands: Vec<String>,
    pub subscribers: Vec<String>,
}

impl UserInterface {
    /// Entry named after the identity's last segment
    pub fn from_identity(identity: impl Into<String>) -> Self {
        let identity = identity.into();
        Self {
            name: class_to_name(&identity).to_string(),
            identity,
            commands: Vec::new(),
            subscribers: Vec::new(),
        }
    }
}

/// Identities grouped under one inferred bounded context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundedContext {
    pub name: String,
    pub aggregates: Vec<String>,
    pub events: Vec<String>,
    pub commands: Vec<String>,
    pub subscribers: Vec<String>,
    pub user_interfaces: Vec<String>,
}

impl BoundedContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// The assembled domain model.
///
/// Entities are owned by exactly one map and refer to each other by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub bounded_contexts: BTreeMap<String, BoundedContext>,
    pub aggregates: BTreeMap<String, Aggregate>,
    pub events: BTreeMap<String, Event>,
    pub commands: BTreeMap<String, Command>,
    pub subscribers: BTreeMap<String, Subscriber>,
    pub user_interfaces: BTreeMap<String, UserInterface>,
}

impl Project {
    /// Bounded context an identity belongs to, if its name follows the layout
    pub fn bounded_context_of(&self, identity: &str) -> Option<&BoundedContext> {
        let name = crate::context::infer_bounded_context(identity)?;
        self.bounded_contexts.get(name)
    }

    pub fn stats(&self) -> ProjectStats {
        ProjectStats {
            bounded_contexts: self.bounded_contexts.len(),
            aggregates: self.aggregates.len(),
            events: self.events.len(),
            commands: self.commands.len(),
            subscribers: self.subscribers.len(),
            user_interfaces: self.user_interfaces.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stats().total_entities() == 0
    }
}

/// Entity counts of a [`Project`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub bounded_contexts: usize,
    pub aggregates: usize,
    pub events: usize,
    pub commands: usize,
    pub subscribers: usize,
    pub user_interfaces: usize,
}

impl ProjectStats {
    /// Entities across all kinds, bounded contexts excluded
    pub fn total_entities(&self) -> usize {
        self.aggregates + self.events + self.commands + self.subscribers + self.user_interfaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_to_name() {
        assert_eq!(class_to_name("App\\Domain\\CreateProfile"), "CreateProfile");
        assert_eq!(class_to_name("CreateProfile"), "CreateProfile");
        assert_eq!(class_to_name(""), "");
    }

    #[test]
    fn test_user_interface_name_from_identity() {
        let ui = UserInterface::from_identity("Shop\\Ui\\ProfileController");
        assert_eq!(ui.name, "ProfileController");
        assert!(ui.commands.is_empty() && ui.subscribers.is_empty());
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let mut project = Project::default();
        project.user_interfaces.insert(
            "App\\Ui".to_string(),
            UserInterface::from_identity("App\\Ui"),
        );

        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("boundedContexts").is_some());
        assert!(json["userInterfaces"]["App\\Ui"]["subscribers"].is_array());
    }

    #[test]
    fn test_empty_project_stats() {
        let project = Project::default();
        assert_eq!(project.stats(), ProjectStats::default());
        assert!(project.is_empty());
    }
}
