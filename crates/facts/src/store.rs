use crate::error::{FactsError, Result};
use crate::types::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Append-only fact collection, partitioned by kind on insertion.
///
/// Each partition keeps the order facts were pushed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactStore {
    aggregates: Vec<AggregateDeclaration>,
    events: Vec<EventDeclaration>,
    aggregate_calls: Vec<AggregateMethodCall>,
    subscribers: Vec<SubscriberDeclaration>,
    subscriber_calls: Vec<SubscriberCall>,
    command_dispatches: Vec<CommandDispatch>,
    subscriber_accesses: Vec<SubscriberAccess>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from facts in any order
    pub fn from_facts(facts: impl IntoIterator<Item = Fact>) -> Self {
        facts.into_iter().collect()
    }

    /// Append a fact to its partition
    pub fn push(&mut self, fact: Fact) {
        match fact {
            Fact::AggregateDeclaration(f) => self.aggregates.push(f),
            Fact::EventDeclaration(f) => self.events.push(f),
            Fact::AggregateMethodCall(f) => self.aggregate_calls.push(f),
            Fact::SubscriberDeclaration(f) => self.subscribers.push(f),
            Fact::SubscriberCall(f) => self.subscriber_calls.push(f),
            Fact::CommandDispatch(f) => self.command_dispatches.push(f),
            Fact::SubscriberAccess(f) => self.subscriber_accesses.push(f),
        }
    }

    /// Load facts from a file (JSON array or JSON Lines)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let store = Self::from_reader(BufReader::new(file))?;

        log::debug!("Loaded {} facts from {}", store.len(), path.display());

        Ok(store)
    }

    /// Read facts from a JSON array or from JSON Lines.
    ///
    /// The format is picked by the first non-whitespace byte: `[` means a
    /// single array document, anything else one fact per non-blank line.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        if content.trim_start().starts_with('[') {
            let facts: Vec<Fact> =
                serde_json::from_str(content).map_err(FactsError::InvalidDocument)?;
            return Ok(Self::from_facts(facts));
        }

        let mut store = Self::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fact: Fact = serde_json::from_str(line)
                .map_err(|source| FactsError::InvalidLine { line: idx + 1, source })?;
            store.push(fact);
        }

        Ok(store)
    }

    pub fn aggregates(&self) -> &[AggregateDeclaration] {
        &self.aggregates
    }

    pub fn events(&self) -> &[EventDeclaration] {
        &self.events
    }

    pub fn aggregate_calls(&self) -> &[AggregateMethodCall] {
        &self.aggregate_calls
    }

    pub fn subscribers(&self) -> &[SubscriberDeclaration] {
        &self.subscribers
    }

    pub fn subscriber_calls(&self) -> &[SubscriberCall] {
        &self.subscriber_calls
    }

    pub fn command_dispatches(&self) -> &[CommandDispatch] {
        &self.command_dispatches
    }

    pub fn subscriber_accesses(&self) -> &[SubscriberAccess] {
        &self.subscriber_accesses
    }

    /// Number of facts of one kind
    pub fn count(&self, kind: FactKind) -> usize {
        match kind {
            FactKind::AggregateDeclaration => self.aggregates.len(),
            FactKind::EventDeclaration => self.events.len(),
            FactKind::AggregateMethodCall => self.aggregate_calls.len(),
            FactKind::SubscriberDeclaration => self.subscribers.len(),
            FactKind::SubscriberCall => self.subscriber_calls.len(),
            FactKind::CommandDispatch => self.command_dispatches.len(),
            FactKind::SubscriberAccess => self.subscriber_accesses.len(),
        }
    }

    /// Counts for every kind, including empty ones
    pub fn kind_counts(&self) -> BTreeMap<FactKind, usize> {
        FactKind::ALL
            .iter()
            .map(|&kind| (kind, self.count(kind)))
            .collect()
    }

    pub fn len(&self) -> usize {
        FactKind::ALL.iter().map(|&kind| self.count(kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Extend<Fact> for FactStore {
    fn extend<T: IntoIterator<Item = Fact>>(&mut self, iter: T) {
        for fact in iter {
            self.push(fact);
        }
    }
}

impl FromIterator<Fact> for FactStore {
    fn from_iter<T: IntoIterator<Item = Fact>>(iter: T) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}
