use eventmap_facts::AggregateMethodCall;
use std::collections::{HashMap, HashSet};

/// A call made from inside a method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Entity owning the called method
    pub callee_identity: String,

    /// Called method, when known
    pub callee_method: Option<String>,

    /// Event recorded directly by this call
    pub event_identity: Option<String>,
}

/// Calls made inside each method, keyed by (owning entity, calling method).
///
/// Call lists keep the order the facts were observed in.
#[derive(Debug, Clone, Default)]
pub struct MethodCallIndex {
    calls: HashMap<String, HashMap<String, Vec<CallSite>>>,
}

impl MethodCallIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every aggregate call under its aggregate and calling method
    pub fn from_aggregate_calls(facts: &[AggregateMethodCall]) -> Self {
        let mut index = Self::new();

        for fact in facts {
            index.insert(
                &fact.aggregate_identity,
                &fact.calling_method,
                CallSite {
                    callee_identity: fact.aggregate_identity.clone(),
                    callee_method: fact.called_method.clone(),
                    event_identity: fact.event_identity.clone(),
                },
            );
        }

        index
    }

    pub fn insert(&mut self, entity: &str, method: &str, call: CallSite) {
        self.calls
            .entry(entity.to_string())
            .or_default()
            .entry(method.to_string())
            .or_default()
            .push(call);
    }

    /// Calls recorded for a method; empty when the method was never observed
    pub fn calls(&self, entity: &str, method: &str) -> &[CallSite] {
        self.calls
            .get(entity)
            .and_then(|methods| methods.get(method))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of (entity, method) keys
    pub fn len(&self) -> usize {
        self.calls.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events reachable from a method, in discovery order.
    ///
    /// A call that records an event contributes that event; any other call is
    /// followed into the called method. Every (entity, method) pair is entered
    /// at most once per resolution, so cycles terminate and the walk stays
    /// linear in the number of call sites. A method recording the same event
    /// twice still yields it twice.
    pub fn resolve_events<'a>(&'a self, entity: &'a str, method: &'a str) -> Vec<String> {
        let mut events = Vec::new();
        let mut visited = HashSet::new();

        self.collect_events(entity, method, &mut visited, &mut events);

        events
    }

    fn collect_events<'a>(
        &'a self,
        entity: &'a str,
        method: &'a str,
        visited: &mut HashSet<(&'a str, &'a str)>,
        events: &mut Vec<String>,
    ) {
        let calls = self.calls(entity, method);
        if calls.is_empty() {
            return;
        }

        if !visited.insert((entity, method)) {
            log::debug!("Already resolved {}::{}, skipping", entity, method);
            return;
        }

        for call in calls {
            if let Some(event) = &call.event_identity {
                events.push(event.clone());
                continue;
            }

            if let Some(next) = &call.callee_method {
                self.collect_events(&call.callee_identity, next, visited, events);
            }
        }
    }
}
