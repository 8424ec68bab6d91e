//! The operation a grant is being invoked for.
//!
//! An [`Action`] is assembled by the caller from an incoming message after
//! its signature has been checked: which node it targets, which
//! interface/method it invokes, and the record it touches.

use palisade_core::{Did, Interface, Method};

/// Record-addressing facts about the record an operation touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFacts {
    pub protocol: Option<String>,
    pub context_id: Option<String>,
    pub protocol_path: Option<String>,
    pub schema: Option<String>,
}

/// An operation to authorize against a grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The owner of the node the operation targets.
    pub owner: Did,

    pub interface: Interface,

    pub method: Method,

    /// Empty for operations that do not touch a record.
    pub record: RecordFacts,

    /// Whether the message is marked public (published).
    pub is_public: bool,
}

impl Action {
    /// An operation against `owner`'s node with no record facts.
    pub fn new(owner: impl Into<Did>, interface: Interface, method: Method) -> Self {
        Self {
            owner: owner.into(),
            interface,
            method,
            record: RecordFacts::default(),
            is_public: false,
        }
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.record.protocol = Some(protocol.into());
        self
    }

    pub fn context_id(mut self, context_id: impl Into<String>) -> Self {
        self.record.context_id = Some(context_id.into());
        self
    }

    pub fn protocol_path(mut self, protocol_path: impl Into<String>) -> Self {
        self.record.protocol_path = Some(protocol_path.into());
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.record.schema = Some(schema.into());
        self
    }

    /// Mark the message public or private.
    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }
}
