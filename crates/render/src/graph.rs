use eventmap_model::{class_to_name, Project, SubscriberKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// What a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Event,
    Command,
    Subscriber(SubscriberKind),
    UserInterface,

    /// Edge endpoint that is not an entity of the project (e.g. the `*`
    /// wildcard or a command only a subscriber dispatches)
    External,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Command => "command",
            Self::Subscriber(kind) => kind.as_str(),
            Self::UserInterface => "user-interface",
            Self::External => "external",
        }
    }
}

/// Node in the domain graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainNode {
    pub identity: String,
    pub label: String,
    pub role: NodeRole,
}

/// Type of relationship between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Command -> Event it leads to
    Causes,

    /// Event -> Subscriber reacting to it
    Triggers,

    /// Subscriber -> Command it dispatches
    Issues,

    /// UserInterface -> Command it dispatches
    Dispatches,

    /// Subscriber -> UserInterface reading from it
    ReadBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterKind {
    BoundedContext,
    Aggregate,
}

/// Visual grouping of nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Context name or aggregate identity
    pub key: String,
    pub label: String,
    pub kind: ClusterKind,
    pub nodes: Vec<NodeIndex>,
    pub children: Vec<Cluster>,
}

impl Cluster {
    fn new(kind: ClusterKind, key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            nodes: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Event flow of a project as a directed graph.
///
/// Bounded contexts and aggregates become clusters; every node is placed in
/// the first cluster that claims it, or at top level.
pub struct DomainGraph {
    /// Directed graph (node -> node with edge kind)
    pub graph: DiGraph<DomainNode, EdgeKind>,

    /// Identity -> NodeIndex mapping for fast lookup
    pub node_index: HashMap<String, NodeIndex>,

    clusters: Vec<Cluster>,
    top_level: Vec<NodeIndex>,
}

impl DomainGraph {
    pub fn from_project(project: &Project) -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            clusters: Vec::new(),
            top_level: Vec::new(),
        };

        // Phase 1: Bounded contexts with their aggregates
        let mut clustered_aggregates = HashSet::new();
        for context in project.bounded_contexts.values() {
            let mut cluster = Cluster::new(ClusterKind::BoundedContext, &context.name, &context.name);

            for identity in &context.aggregates {
                if let Some(aggregate) = graph.aggregate_cluster(project, identity) {
                    cluster.children.push(aggregate);
                }
                clustered_aggregates.insert(identity.as_str());
            }

            for identity in &context.events {
                graph.place(project, identity, &mut cluster.nodes);
            }
            for identity in &context.commands {
                graph.place(project, identity, &mut cluster.nodes);
            }
            for identity in &context.subscribers {
                graph.place(project, identity, &mut cluster.nodes);
            }
            for identity in &context.user_interfaces {
                graph.place(project, identity, &mut cluster.nodes);
            }

            graph.clusters.push(cluster);
        }

        // Phase 2: Everything outside a bounded context
        for identity in project.aggregates.keys() {
            if clustered_aggregates.contains(identity.as_str()) {
                continue;
            }
            if let Some(aggregate) = graph.aggregate_cluster(project, identity) {
                graph.clusters.push(aggregate);
            }
        }

        let mut top_level = Vec::new();
        let unplaced = project
            .events
            .keys()
            .chain(project.commands.keys())
            .chain(project.subscribers.keys())
            .chain(project.user_interfaces.keys());
        for identity in unplaced {
            graph.place(project, identity, &mut top_level);
        }
        graph.top_level = top_level;

        // Phase 3: Edges, in command / subscriber / user interface order
        for command in project.commands.values() {
            for event in &command.events {
                graph.connect(&command.identity, event, EdgeKind::Causes);
            }
        }

        for subscriber in project.subscribers.values() {
            for event in &subscriber.events {
                graph.connect(event, &subscriber.identity, EdgeKind::Triggers);
            }
            for command in &subscriber.commands {
                graph.connect(&subscriber.identity, command, EdgeKind::Issues);
            }
        }

        for interface in project.user_interfaces.values() {
            for command in &interface.commands {
                graph.connect(&interface.identity, command, EdgeKind::Dispatches);
            }
            for subscriber in &interface.subscribers {
                graph.connect(subscriber, &interface.identity, EdgeKind::ReadBy);
            }
        }

        log::debug!(
            "Built domain graph: {} nodes, {} edges, {} top-level clusters",
            graph.node_count(),
            graph.edge_count(),
            graph.clusters.len()
        );

        graph
    }

    /// Cluster for an aggregate holding its events and commands
    fn aggregate_cluster(&mut self, project: &Project, identity: &str) -> Option<Cluster> {
        let aggregate = project.aggregates.get(identity)?;
        let mut cluster = Cluster::new(ClusterKind::Aggregate, identity, &aggregate.name);

        for event in &aggregate.events {
            self.place(project, event, &mut cluster.nodes);
        }
        for command in &aggregate.commands {
            self.place(project, command, &mut cluster.nodes);
        }

        Some(cluster)
    }

    /// Create the node for an entity and record it in `members`, unless an
    /// earlier cluster already placed it
    fn place(&mut self, project: &Project, identity: &str, members: &mut Vec<NodeIndex>) {
        if self.node_index.contains_key(identity) {
            return;
        }

        let node = entity_node(project, identity);
        let idx = self.add_node(node);
        members.push(idx);
    }

    fn connect(&mut self, from: &str, to: &str, kind: EdgeKind) {
        let from = self.ensure_node(from);
        let to = self.ensure_node(to);
        self.graph.add_edge(from, to, kind);
    }

    /// Node for an edge endpoint, added at top level when unknown
    fn ensure_node(&mut self, identity: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(identity) {
            return idx;
        }

        let idx = self.add_node(DomainNode {
            identity: identity.to_string(),
            label: class_to_name(identity).to_string(),
            role: NodeRole::External,
        });
        self.top_level.push(idx);
        idx
    }

    fn add_node(&mut self, node: DomainNode) -> NodeIndex {
        let identity = node.identity.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(identity, idx);
        idx
    }

    /// Find node by identity
    pub fn find_node(&self, identity: &str) -> Option<NodeIndex> {
        self.node_index.get(identity).copied()
    }

    /// Get node data
    pub fn get_node(&self, idx: NodeIndex) -> Option<&DomainNode> {
        self.graph.node_weight(idx)
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Nodes outside every cluster, in placement order
    pub fn top_level(&self) -> &[NodeIndex] {
        &self.top_level
    }

    /// All edges in insertion order as (from, to, kind)
    pub fn edges(&self) -> impl Iterator<Item = (&DomainNode, &DomainNode, EdgeKind)> {
        self.graph.edge_references().map(move |e| {
            (
                &self.graph[e.source()],
                &self.graph[e.target()],
                *e.weight(),
            )
        })
    }

    /// Identities an edge of the given kind leads to from `identity`
    pub fn targets(&self, identity: &str, kind: EdgeKind) -> Vec<&str> {
        let Some(idx) = self.find_node(identity) else {
            return Vec::new();
        };

        let mut targets: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|e| *e.weight() == kind)
            .map(|e| self.graph[e.target()].identity.as_str())
            .collect();
        // petgraph lists outgoing edges newest first
        targets.reverse();
        targets
    }

    /// Everything downstream of a node, breadth first, with its distance.
    ///
    /// Each node appears once; the start node is not included.
    pub fn downstream(&self, identity: &str) -> Vec<(&DomainNode, usize)> {
        let Some(start) = self.find_node(identity) else {
            return Vec::new();
        };

        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0)]);
        let mut result = Vec::new();

        while let Some((current, depth)) = queue.pop_front() {
            let mut next: Vec<_> = self
                .graph
                .edges_directed(current, Direction::Outgoing)
                .map(|e| e.target())
                .collect();
            next.reverse();

            for target in next {
                if visited.insert(target) {
                    result.push((&self.graph[target], depth + 1));
                    queue.push_back((target, depth + 1));
                }
            }
        }

        result
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

fn entity_node(project: &Project, identity: &str) -> DomainNode {
    let (label, role) = if let Some(event) = project.events.get(identity) {
        (event.name.clone(), NodeRole::Event)
    } else if let Some(command) = project.commands.get(identity) {
        (command.name.clone(), NodeRole::Command)
    } else if let Some(subscriber) = project.subscribers.get(identity) {
        (subscriber.name.clone(), NodeRole::Subscriber(subscriber.kind))
    } else if let Some(interface) = project.user_interfaces.get(identity) {
        (interface.name.clone(), NodeRole::UserInterface)
    } else {
        (class_to_name(identity).to_string(), NodeRole::External)
    };

    DomainNode {
        identity: identity.to_string(),
        label,
        role,
    }
}
