//! # Event Map Model
//!
//! Turns raw source facts into a domain model of an event-sourced
//! application: aggregates, events, commands, subscribers, user interfaces and
//! the bounded contexts grouping them.
//!
//! ## Architecture
//!
//! ```text
//! FactStore (partitioned by kind)
//!     │
//!     ├──> Method Call Index
//!     │      └─ (entity, method) -> calls, resolved to events on demand
//!     │
//!     ├──> Entity Assemblers
//!     │      ├─ Events      (declarations + synthesized references)
//!     │      ├─ Aggregates  (union of recorded events / handled commands)
//!     │      ├─ Commands    (events via call-chain resolution)
//!     │      ├─ Subscribers (reacted events, dispatched commands)
//!     │      └─ User Interfaces
//!     │
//!     └──> Bounded Context Partitioner
//!            └─ `\<Context>\{Domain,Infrastructure,Application}\` naming
//! ```
//!
//! Entities refer to each other only by identity (fully qualified class name).

mod assembler;
mod builder;
mod context;
mod resolver;
mod types;

pub use assembler::{
    assemble_aggregates, assemble_commands, assemble_events, assemble_subscribers,
    assemble_user_interfaces,
};
pub use builder::ProjectBuilder;
pub use context::{infer_bounded_context, partition_bounded_contexts, LAYER_MARKERS};
pub use eventmap_facts::SubscriberKind;
pub use resolver::{CallSite, MethodCallIndex};
pub use types::{
    class_to_name, Aggregate, BoundedContext, Command, Event, Project, ProjectStats, Subscriber,
    UserInterface, IDENTITY_SEPARATOR, WILDCARD_EVENT,
};
