//! # Event Map Facts
//!
//! Raw source-code facts about an event-sourced application, as emitted by
//! an external extraction step, and the store they are collected in.
//!
//! Facts arrive flat and unordered. [`FactStore`] partitions them by kind in a
//! single pass so every assembler reads only the slice it needs.
//!
//! ```text
//! {"fact":"aggregate-declaration","identity":"App\\Profile","name":"profile"}
//! {"fact":"aggregate-method-call","aggregateIdentity":"App\\Profile",
//!  "callingMethod":"create","calledMethod":"recordThat",
//!  "eventIdentity":"App\\ProfileCreated","commandIdentity":"App\\CreateProfile"}
//! ```

mod error;
mod store;
mod types;

pub use error::{FactsError, Result};
pub use store::FactStore;
pub use types::{
    AggregateDeclaration, AggregateMethodCall, CommandDispatch, EventDeclaration, Fact, FactKind,
    SubscriberAccess, SubscriberCall, SubscriberDeclaration, SubscriberKind,
};
