use crate::config::RenderConfig;
use crate::graph::{Cluster, ClusterKind, DomainGraph, DomainNode, NodeRole};
use eventmap_model::{Project, SubscriberKind};
use petgraph::graph::NodeIndex;
use std::fmt::{self, Display};

const INDENT: &str = "  ";

/// Graphviz DOT rendering of a [`DomainGraph`].
///
/// Implements `Display`, so the text is produced with `to_string()` or
/// written straight into a formatter.
pub struct Dot<'a> {
    graph: &'a DomainGraph,
    config: &'a RenderConfig,
}

impl<'a> Dot<'a> {
    pub fn new(graph: &'a DomainGraph, config: &'a RenderConfig) -> Self {
        Self { graph, config }
    }

    fn write_cluster(&self, f: &mut fmt::Formatter<'_>, cluster: &Cluster, depth: usize) -> fmt::Result {
        let pad = INDENT.repeat(depth);
        let palette = &self.config.palette;

        let id = match cluster.kind {
            ClusterKind::BoundedContext => format!("cluster_b_{}", cluster.key),
            ClusterKind::Aggregate => format!("cluster_a_{}", cluster.key),
        };

        writeln!(f, "{pad}subgraph {} {{", quote(&id))?;
        writeln!(f, "{pad}{INDENT}label={};", quote(&cluster.label))?;
        match cluster.kind {
            ClusterKind::BoundedContext => {
                writeln!(f, "{pad}{INDENT}style=\"dotted\";")?;
            }
            ClusterKind::Aggregate => {
                writeln!(f, "{pad}{INDENT}bgcolor={};", quote(&palette.aggregate))?;
                writeln!(f, "{pad}{INDENT}penwidth=\"0\";")?;
            }
        }

        for child in &cluster.children {
            self.write_cluster(f, child, depth + 1)?;
        }
        for &idx in &cluster.nodes {
            self.write_node(f, idx, depth + 1)?;
        }

        writeln!(f, "{pad}}}")
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, idx: NodeIndex, depth: usize) -> fmt::Result {
        let Some(node) = self.graph.get_node(idx) else {
            return Ok(());
        };

        let pad = INDENT.repeat(depth);
        write!(f, "{pad}{} [label={}", quote(&node.identity), quote(&node.label))?;

        if let Some(color) = self.node_color(node) {
            let font = &self.config.palette.font;
            write!(
                f,
                ", color={}, shape=\"Mrecord\", style=\"filled\", width=\"3\", height=\"1\", fixedsize=\"true\", fontcolor={}",
                quote(color),
                quote(font)
            )?;
        }

        writeln!(f, "];")
    }

    fn node_color(&self, node: &DomainNode) -> Option<&str> {
        let palette = &self.config.palette;
        let color = match node.role {
            NodeRole::Event => &palette.event,
            NodeRole::Command => &palette.command,
            NodeRole::Subscriber(SubscriberKind::Subscriber) => &palette.subscriber,
            NodeRole::Subscriber(SubscriberKind::Processor) => &palette.processor,
            NodeRole::Subscriber(SubscriberKind::Projector) => &palette.projector,
            NodeRole::UserInterface => &palette.user_interface,
            NodeRole::External => return None,
        };
        Some(color.as_str())
    }
}

impl Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config;

        writeln!(f, "digraph {{")?;
        writeln!(f, "{INDENT}rankdir={};", quote(config.rank_direction.as_str()))?;
        writeln!(f, "{INDENT}nodesep={};", quote(&config.node_separation.to_string()))?;
        writeln!(f, "{INDENT}ranksep={};", quote(&config.rank_separation.to_string()))?;
        writeln!(f, "{INDENT}fontcolor={};", quote(&config.palette.font))?;

        for cluster in self.graph.clusters() {
            self.write_cluster(f, cluster, 1)?;
        }
        for &idx in self.graph.top_level() {
            self.write_node(f, idx, 1)?;
        }

        for (from, to, _) in self.graph.edges() {
            writeln!(
                f,
                "{INDENT}{} -> {} [color={}];",
                quote(&from.identity),
                quote(&to.identity),
                quote(&config.palette.edge)
            )?;
        }

        writeln!(f, "}}")
    }
}

/// Render a project as Graphviz DOT text
pub fn render_dot(project: &Project, config: &RenderConfig) -> String {
    let graph = DomainGraph::from_project(project);
    Dot::new(&graph, config).to_string()
}

/// Double-quoted DOT id with backslashes and quotes escaped
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' | '"' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
