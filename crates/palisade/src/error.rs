//! Error types for the permissions engine.

use palisade_core::{CoreError, Did, GrantId, MessageId, ValidationError};
use palisade_perms::{AuthorizationError, PermsError};
use thiserror::Error;

/// Errors raised by a [`MessageResolver`](crate::MessageResolver) backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// A lock guarding resolver state was poisoned by a panicking writer.
    #[error("resolver state poisoned")]
    Poisoned,

    /// Backend-specific failure.
    #[error("resolver backend error: {0}")]
    Backend(String),
}

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The message is addressed to a node other than the one this engine serves.
    #[error("message is for {granted_for}, this node is {tenant}")]
    WrongTenant { tenant: Did, granted_for: Did },

    /// The message was not signed by the party its descriptor names.
    #[error("message must be signed by {expected}, got {signer}")]
    AuthorMismatch { expected: Did, signer: Did },

    /// A grant issued by someone other than the tenant, with delegation disabled.
    #[error("delegated grants are disabled: granted by {granted_by}")]
    DelegationNotAllowed { granted_by: Did },

    /// A grant answers a request from a different grantee.
    #[error("request {request_id} was made by {requested_by}, grant is to {granted_to}")]
    RequestMismatch {
        request_id: MessageId,
        requested_by: Did,
        granted_to: Did,
    },

    /// No verification key is known for the message's signer.
    #[error("no key known for signer {0}")]
    UnknownSigner(Did),

    /// The message failed validation: wrong interface/method, bad timestamp
    /// or a signature that does not verify under the signer's key.
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] ValidationError),

    /// Referenced grant is not known to the resolver.
    #[error("grant not found: {0}")]
    GrantNotFound(GrantId),

    /// Referenced request is not known to the resolver.
    #[error("request not found: {0}")]
    RequestNotFound(MessageId),

    /// The invoked grant does not authorize the operation.
    #[error("not authorized: {0}")]
    Unauthorized(#[from] AuthorizationError),

    /// Resolver error.
    #[error("resolver error: {0}")]
    Resolver(#[from] ResolverError),

    /// Permission error.
    #[error("permission error: {0}")]
    Permission(PermsError),

    /// Encoding or signature error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl From<PermsError> for EngineError {
    fn from(err: PermsError) -> Self {
        match err {
            PermsError::Validation(err) => Self::InvalidMessage(err),
            PermsError::Authorization(err) => Self::Unauthorized(err),
            PermsError::Core(err) => Self::Core(err),
            other => Self::Permission(other),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
