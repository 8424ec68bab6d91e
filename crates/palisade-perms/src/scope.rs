//! Permission scopes.
//!
//! On the wire a scope is one flat object:
//! `{interface, method, protocol?, contextId?, protocolPath?, schema?}`.
//! In memory it is a [`PermissionScope`] sum type whose records variant
//! cannot represent an invalid combination of qualifiers. Conversion from
//! the wire shape ([`ScopeFields`]) goes through [`validate`], so a scope
//! that deserializes is always well formed.

use serde::{Deserialize, Serialize};

use palisade_core::{Interface, Method};

use crate::error::ScopeError;

/// The set of operations a grant authorizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ScopeFields", into = "ScopeFields")]
pub enum PermissionScope {
    /// Any interface/method pair other than Records Read/Write.
    Generic(GenericScope),

    /// Records Read or Write, optionally narrowed to a protocol or schema.
    Records(RecordsScope),
}

/// An interface/method pair that is not Records Read/Write.
///
/// Only built by [`PermissionScope::new`], which routes Records Read/Write
/// to [`PermissionScope::Records`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenericScope {
    interface: Interface,
    method: Method,
}

impl GenericScope {
    pub fn interface(&self) -> Interface {
        self.interface
    }

    pub fn method(&self) -> Method {
        self.method
    }
}

/// The two record methods that carry record-level qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordsMethod {
    Read,
    Write,
}

impl RecordsMethod {
    /// Map a generic method onto a record method, if it is one.
    pub fn from_method(method: Method) -> Option<Self> {
        match method {
            Method::Read => Some(RecordsMethod::Read),
            Method::Write => Some(RecordsMethod::Write),
            _ => None,
        }
    }
}

impl From<RecordsMethod> for Method {
    fn from(method: RecordsMethod) -> Self {
        match method {
            RecordsMethod::Read => Method::Read,
            RecordsMethod::Write => Method::Write,
        }
    }
}

/// Which records a records scope covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordsTarget {
    /// Every record for the scope's method.
    Any,

    /// Records of one protocol, optionally narrowed further.
    Protocol {
        protocol: String,
        limit: Option<ProtocolLimit>,
    },

    /// Records of one schema, regardless of protocol.
    Schema(String),
}

/// Narrows a protocol scope to a context subtree or a single protocol path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProtocolLimit {
    /// The context and every context below it.
    ContextId(String),

    /// Exactly one protocol path.
    ProtocolPath(String),
}

impl RecordsTarget {
    /// Records of `protocol`.
    pub fn protocol(protocol: impl Into<String>) -> Self {
        RecordsTarget::Protocol {
            protocol: protocol.into(),
            limit: None,
        }
    }

    /// Records of `protocol` within the `context_id` subtree.
    pub fn context(protocol: impl Into<String>, context_id: impl Into<String>) -> Self {
        RecordsTarget::Protocol {
            protocol: protocol.into(),
            limit: Some(ProtocolLimit::ContextId(context_id.into())),
        }
    }

    /// Records of `protocol` at exactly `protocol_path`.
    pub fn protocol_path(protocol: impl Into<String>, protocol_path: impl Into<String>) -> Self {
        RecordsTarget::Protocol {
            protocol: protocol.into(),
            limit: Some(ProtocolLimit::ProtocolPath(protocol_path.into())),
        }
    }

    /// Records of `schema`.
    pub fn schema(schema: impl Into<String>) -> Self {
        RecordsTarget::Schema(schema.into())
    }
}

/// A validated Records Read/Write scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordsScope {
    method: RecordsMethod,
    target: RecordsTarget,
}

impl RecordsScope {
    /// The record method this scope covers.
    pub fn method(&self) -> RecordsMethod {
        self.method
    }

    /// The records this scope covers.
    pub fn target(&self) -> &RecordsTarget {
        &self.target
    }

    /// True when no protocol or schema narrows the scope.
    pub fn is_unrestricted(&self) -> bool {
        matches!(self.target, RecordsTarget::Any)
    }
}

impl PermissionScope {
    /// A scope for an interface/method pair with no record qualifiers.
    ///
    /// Records Read/Write becomes an unrestricted records scope so it
    /// encodes and decodes to the same value.
    pub fn new(interface: Interface, method: Method) -> Self {
        match (interface, RecordsMethod::from_method(method)) {
            (Interface::Records, Some(method)) => PermissionScope::Records(RecordsScope {
                method,
                target: RecordsTarget::Any,
            }),
            _ => PermissionScope::Generic(GenericScope { interface, method }),
        }
    }

    /// A records scope narrowed to `target`.
    pub fn records(method: RecordsMethod, target: RecordsTarget) -> Result<Self, ScopeError> {
        let fields = ScopeFields::from(PermissionScope::Records(RecordsScope { method, target }));
        PermissionScope::try_from(fields)
    }

    /// The interface this scope covers.
    pub fn interface(&self) -> Interface {
        match self {
            PermissionScope::Generic(generic) => generic.interface,
            PermissionScope::Records(_) => Interface::Records,
        }
    }

    /// The method this scope covers.
    pub fn method(&self) -> Method {
        match self {
            PermissionScope::Generic(generic) => generic.method,
            PermissionScope::Records(records) => records.method.into(),
        }
    }
}

/// The flat wire shape of a scope. Field names are part of a message's
/// canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeFields {
    pub interface: Interface,
    pub method: Method,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl ScopeFields {
    /// Fields for an interface/method pair with no qualifiers.
    pub fn new(interface: Interface, method: Method) -> Self {
        Self {
            interface,
            method,
            protocol: None,
            context_id: None,
            protocol_path: None,
            schema: None,
        }
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    pub fn protocol_path(mut self, protocol_path: impl Into<String>) -> Self {
        self.protocol_path = Some(protocol_path.into());
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Check the fields against the scope invariants. See [`validate`].
    pub fn validate(&self) -> Result<(), ScopeError> {
        validate(self)
    }
}

/// Check scope fields against the structural invariants:
///
/// - record qualifiers only appear on a Records Read/Write scope
/// - qualifiers are non-empty
/// - `protocol` and `schema` are never both present
/// - `contextId` and `protocolPath` are never both present
/// - `contextId` and `protocolPath` require `protocol`
pub fn validate(fields: &ScopeFields) -> Result<(), ScopeError> {
    let qualifiers = [
        ("protocol", &fields.protocol),
        ("contextId", &fields.context_id),
        ("protocolPath", &fields.protocol_path),
        ("schema", &fields.schema),
    ];

    let is_records = fields.interface == Interface::Records
        && RecordsMethod::from_method(fields.method).is_some();

    for (name, value) in qualifiers {
        match value {
            Some(_) if !is_records => {
                return Err(ScopeError::QualifierOnGenericScope {
                    interface: fields.interface,
                    method: fields.method,
                    field: name,
                });
            }
            Some(v) if v.is_empty() => return Err(ScopeError::EmptyQualifier(name)),
            _ => {}
        }
    }

    if fields.protocol.is_some() && fields.schema.is_some() {
        return Err(ScopeError::ProtocolAndSchema);
    }
    if fields.context_id.is_some() && fields.protocol_path.is_some() {
        return Err(ScopeError::ContextIdAndProtocolPath);
    }
    if fields.protocol.is_none() {
        if fields.context_id.is_some() {
            return Err(ScopeError::ContextIdWithoutProtocol);
        }
        if fields.protocol_path.is_some() {
            return Err(ScopeError::ProtocolPathWithoutProtocol);
        }
    }

    Ok(())
}

impl TryFrom<ScopeFields> for PermissionScope {
    type Error = ScopeError;

    fn try_from(fields: ScopeFields) -> Result<Self, Self::Error> {
        validate(&fields)?;

        let Some(method) = RecordsMethod::from_method(fields.method)
            .filter(|_| fields.interface == Interface::Records)
        else {
            return Ok(PermissionScope::Generic(GenericScope {
                interface: fields.interface,
                method: fields.method,
            }));
        };

        let target = match (fields.protocol, fields.schema) {
            (Some(protocol), _) => {
                let limit = match (fields.context_id, fields.protocol_path) {
                    (Some(context_id), _) => Some(ProtocolLimit::ContextId(context_id)),
                    (None, Some(path)) => Some(ProtocolLimit::ProtocolPath(path)),
                    (None, None) => None,
                };
                RecordsTarget::Protocol { protocol, limit }
            }
            (None, Some(schema)) => RecordsTarget::Schema(schema),
            (None, None) => RecordsTarget::Any,
        };

        Ok(PermissionScope::Records(RecordsScope { method, target }))
    }
}

impl From<PermissionScope> for ScopeFields {
    fn from(scope: PermissionScope) -> Self {
        match scope {
            PermissionScope::Generic(GenericScope { interface, method }) => {
                ScopeFields::new(interface, method)
            }
            PermissionScope::Records(records) => {
                let fields = ScopeFields::new(Interface::Records, records.method.into());
                match records.target {
                    RecordsTarget::Any => fields,
                    RecordsTarget::Schema(schema) => fields.schema(schema),
                    RecordsTarget::Protocol { protocol, limit } => {
                        let fields = fields.protocol(protocol);
                        match limit {
                            None => fields,
                            Some(ProtocolLimit::ContextId(id)) => fields.context_id(id),
                            Some(ProtocolLimit::ProtocolPath(path)) => fields.protocol_path(path),
                        }
                    }
                }
            }
        }
    }
}
