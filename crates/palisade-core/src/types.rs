//! Strong type definitions for Palisade.
//!
//! All identifiers are newtypes to prevent misuse at compile time. A
//! [`MessageId`] can never be passed where a [`Did`] is expected and vice
//! versa.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte message identifier, computed as Blake3(canonical_bytes(message)).
///
/// This is the content-address of a message. Two messages with the same
/// descriptor and authorization will have the same MessageId.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(#[serde(with = "crate::hex_serde")] pub [u8; 32]);

/// The id of a `PermissionsGrant` message. Same representation as any other
/// message id; the alias marks grant positions in signatures.
pub type GrantId = MessageId;

impl MessageId {
    /// Create a new MessageId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for MessageId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for MessageId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A decentralized identifier naming a node owner, grantee, granter or signer.
///
/// Opaque to this crate: two identities are the same party iff their strings
/// are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Did(String);

impl Did {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Did({})", self.0)
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Did {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Did {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The interface a message or permission scope addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interface {
    Events,
    Messages,
    Permissions,
    Protocols,
    Records,
    Snapshots,
}

impl Interface {
    /// The wire name of the interface.
    pub const fn as_str(self) -> &'static str {
        match self {
            Interface::Events => "Events",
            Interface::Messages => "Messages",
            Interface::Permissions => "Permissions",
            Interface::Protocols => "Protocols",
            Interface::Records => "Records",
            Interface::Snapshots => "Snapshots",
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The method a message or permission scope addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Configure,
    Create,
    Delete,
    Get,
    Grant,
    Query,
    Read,
    Request,
    Revoke,
    Write,
}

impl Method {
    /// The wire name of the method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Configure => "Configure",
            Method::Create => "Create",
            Method::Delete => "Delete",
            Method::Get => "Get",
            Method::Grant => "Grant",
            Method::Query => "Query",
            Method::Read => "Read",
            Method::Request => "Request",
            Method::Revoke => "Revoke",
            Method::Write => "Write",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
