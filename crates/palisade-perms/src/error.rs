//! Error types for the permissions module.
//!
//! Construction-time errors ([`ScopeError`]) are kept apart from runtime
//! authorization verdicts ([`AuthorizationError`]).

use palisade_core::{CoreError, Did, GrantId, Interface, Method, ValidationError};
use thiserror::Error;

/// A permission scope violates one of its structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("scope sets both `protocol` and `schema`")]
    ProtocolAndSchema,

    #[error("scope sets both `contextId` and `protocolPath`")]
    ContextIdAndProtocolPath,

    #[error("scope sets `contextId` without `protocol`")]
    ContextIdWithoutProtocol,

    #[error("scope sets `protocolPath` without `protocol`")]
    ProtocolPathWithoutProtocol,

    #[error("{interface}{method} scope cannot set `{field}`")]
    QualifierOnGenericScope {
        interface: Interface,
        method: Method,
        field: &'static str,
    },

    #[error("scope field `{0}` is empty")]
    EmptyQualifier(&'static str),
}

/// A message does not satisfy the conditions attached to a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConditionViolation {
    #[error("grant requires the message to be published")]
    PublicationRequired,

    #[error("grant prohibits publishing the message")]
    PublicationProhibited,
}

/// Why a grant does not authorize an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("grant is for {granted_for}, operation targets {target}")]
    GranteeContextMismatch { granted_for: Did, target: Did },

    #[error("grant was issued to {granted_to}, operation is authored by {actor}")]
    GranteeMismatch { granted_to: Did, actor: Did },

    #[error("grant {grant_id} expired at {date_expires} (now {now})")]
    GrantExpired {
        grant_id: GrantId,
        date_expires: i64,
        now: i64,
    },

    #[error("grant {0} has been revoked")]
    GrantRevoked(GrantId),

    #[error("{interface}{method} operation is outside the scope of grant {grant_id}")]
    ScopeMismatch {
        grant_id: GrantId,
        interface: Interface,
        method: Method,
    },

    #[error("condition violated: {0}")]
    ConditionViolation(#[from] ConditionViolation),
}

/// A revocation cannot be recorded against a grant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevocationError {
    #[error("{signer} cannot revoke grant {grant_id} issued by {granted_by}")]
    UnauthorizedRevocation {
        grant_id: GrantId,
        granted_by: Did,
        signer: Did,
    },

    #[error("revocation targets grant {revokes}, not {grant_id}")]
    GrantIdMismatch { revokes: GrantId, grant_id: GrantId },
}

/// Errors that can occur during permission operations.
#[derive(Debug, Error)]
pub enum PermsError {
    /// Invalid scope.
    #[error("invalid scope: {0}")]
    Scope(#[from] ScopeError),

    /// Authorization denied.
    #[error("not authorized: {0}")]
    Authorization(#[from] AuthorizationError),

    /// Revocation rejected.
    #[error("revocation rejected: {0}")]
    Revocation(#[from] RevocationError),

    /// Malformed permission message.
    #[error("invalid message: {0}")]
    Validation(#[from] ValidationError),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
