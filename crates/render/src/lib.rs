//! # Event Map Render
//!
//! Output formats for an assembled [`Project`](eventmap_model::Project).
//!
//! - **JSON** - the project structure one-to-one, maps keyed by identity
//! - **DOT** - Graphviz digraph of the event flow
//!
//! ## Graph layout
//!
//! ```text
//! cluster_b_<context>            (bounded context, dotted)
//!     cluster_a_<aggregate>      (aggregate, filled)
//!         events, commands
//!     events, commands, subscribers, user interfaces
//!
//! Command ──> Event ──> Subscriber ──> Command
//!   ^                       │
//!   └── UserInterface <─────┘ (read)
//! ```

mod config;
mod dot;
mod error;
mod graph;
mod json;

pub use config::{Palette, RankDirection, RenderConfig};
pub use dot::{render_dot, Dot};
pub use error::{RenderError, Result};
pub use graph::{Cluster, ClusterKind, DomainGraph, DomainNode, EdgeKind, NodeRole};
pub use json::{render_json, write_json};
