use serde::{Deserialize, Serialize};
use std::fmt;

/// A class carrying the aggregate marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDeclaration {
    /// Fully qualified class name
    pub identity: String,

    /// Name given by the aggregate marker (e.g. "profile")
    pub name: String,
}

/// A class carrying the event marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDeclaration {
    pub identity: String,
    pub name: String,
}

/// One method call site inside an aggregate method.
///
/// `event_identity` is set when the call records an event directly,
/// `command_identity` when the calling method handles a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMethodCall {
    pub aggregate_identity: String,

    /// Method the call is made from
    pub calling_method: String,

    /// Method being called, when the extractor could resolve it
    #[serde(default)]
    pub called_method: Option<String>,

    #[serde(default)]
    pub event_identity: Option<String>,

    #[serde(default)]
    pub command_identity: Option<String>,
}

/// Role a subscriber plays, decided by its marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberKind {
    Processor,
    Projector,
    Subscriber,
}

impl SubscriberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processor => "processor",
            Self::Projector => "projector",
            Self::Subscriber => "subscriber",
        }
    }
}

impl fmt::Display for SubscriberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class carrying one of the subscriber markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberDeclaration {
    pub identity: String,
    pub kind: SubscriberKind,

    /// Subscriber id from the marker
    pub name: String,
}

/// One method call site inside a subscriber method.
///
/// `event_identities` are the events the calling method declares it reacts
/// to; the wildcard sentinel `*` means every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberCall {
    pub subscriber_identity: String,
    pub calling_method: String,

    #[serde(default)]
    pub called_method: Option<String>,

    #[serde(default)]
    pub event_identities: Vec<String>,

    /// Command dispatched by this call
    #[serde(default)]
    pub command_identity: Option<String>,
}

/// A controller dispatching a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDispatch {
    pub controller_identity: String,
    pub command_identity: String,
}

/// A controller reading state from a subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberAccess {
    pub controller_identity: String,
    pub subscriber_identity: String,
}

/// A raw fact emitted by the extraction step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fact", rename_all = "kebab-case")]
pub enum Fact {
    AggregateDeclaration(AggregateDeclaration),
    EventDeclaration(EventDeclaration),
    AggregateMethodCall(AggregateMethodCall),
    SubscriberDeclaration(SubscriberDeclaration),
    SubscriberCall(SubscriberCall),
    #[serde(rename = "controller-command-dispatch")]
    CommandDispatch(CommandDispatch),
    #[serde(rename = "controller-subscriber-access")]
    SubscriberAccess(SubscriberAccess),
}

impl Fact {
    pub fn kind(&self) -> FactKind {
        match self {
            Self::AggregateDeclaration(_) => FactKind::AggregateDeclaration,
            Self::EventDeclaration(_) => FactKind::EventDeclaration,
            Self::AggregateMethodCall(_) => FactKind::AggregateMethodCall,
            Self::SubscriberDeclaration(_) => FactKind::SubscriberDeclaration,
            Self::SubscriberCall(_) => FactKind::SubscriberCall,
            Self::CommandDispatch(_) => FactKind::CommandDispatch,
            Self::SubscriberAccess(_) => FactKind::SubscriberAccess,
        }
    }
}

/// Discriminator of a [`Fact`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactKind {
    AggregateDeclaration,
    EventDeclaration,
    AggregateMethodCall,
    SubscriberDeclaration,
    SubscriberCall,
    #[serde(rename = "controller-command-dispatch")]
    CommandDispatch,
    #[serde(rename = "controller-subscriber-access")]
    SubscriberAccess,
}

impl FactKind {
    pub const ALL: [FactKind; 7] = [
        Self::AggregateDeclaration,
        Self::EventDeclaration,
        Self::AggregateMethodCall,
        Self::SubscriberDeclaration,
        Self::SubscriberCall,
        Self::CommandDispatch,
        Self::SubscriberAccess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AggregateDeclaration => "aggregate-declaration",
            Self::EventDeclaration => "event-declaration",
            Self::AggregateMethodCall => "aggregate-method-call",
            Self::SubscriberDeclaration => "subscriber-declaration",
            Self::SubscriberCall => "subscriber-call",
            Self::CommandDispatch => "controller-command-dispatch",
            Self::SubscriberAccess => "controller-subscriber-access",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_aggregate_method_call_with_defaults() {
        let json = r#"{
            "fact": "aggregate-method-call",
            "aggregateIdentity": "App\\Profile",
            "callingMethod": "update"
        }"#;

        let fact: Fact = serde_json::from_str(json).unwrap();
        assert_eq!(
            fact,
            Fact::AggregateMethodCall(AggregateMethodCall {
                aggregate_identity: "App\\Profile".to_string(),
                calling_method: "update".to_string(),
                called_method: None,
                event_identity: None,
                command_identity: None,
            })
        );
        assert_eq!(fact.kind(), FactKind::AggregateMethodCall);
    }

    #[test]
    fn test_parse_controller_facts() {
        let dispatch: Fact = serde_json::from_str(
            r#"{"fact":"controller-command-dispatch","controllerIdentity":"App\\Ui","commandIdentity":"App\\Create"}"#,
        )
        .unwrap();
        assert_eq!(dispatch.kind(), FactKind::CommandDispatch);

        let access: Fact = serde_json::from_str(
            r#"{"fact":"controller-subscriber-access","controllerIdentity":"App\\Ui","subscriberIdentity":"App\\Projection"}"#,
        )
        .unwrap();
        assert_eq!(access.kind(), FactKind::SubscriberAccess);
    }

    #[test]
    fn test_parse_subscriber_declaration() {
        let fact: Fact = serde_json::from_str(
            r#"{"fact":"subscriber-declaration","identity":"App\\P","kind":"projector","name":"profile"}"#,
        )
        .unwrap();
        assert_eq!(
            fact,
            Fact::SubscriberDeclaration(SubscriberDeclaration {
                identity: "App\\P".to_string(),
                kind: SubscriberKind::Projector,
                name: "profile".to_string(),
            })
        );
        assert_eq!(SubscriberKind::Processor.to_string(), "processor");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<Fact, _> = serde_json::from_str(r#"{"fact":"nope"}"#);
        assert!(result.is_err());
    }
}
