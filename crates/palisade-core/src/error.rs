//! Error types for Palisade Core.

use thiserror::Error;

use crate::types::{Interface, Method};

/// Core errors that can occur during message operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Validation errors for message structure and signatures.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("signature verification failed")]
    SignatureFailed,

    #[error("expected a {expected_interface}{expected_method} descriptor, got {interface}{method}")]
    UnexpectedDescriptor {
        expected_interface: Interface,
        expected_method: Method,
        interface: Interface,
        method: Method,
    },

    #[error("negative message timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("structural error: {0}")]
    StructuralError(String),
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSignature | CoreError::InvalidPublicKey => {
                ValidationError::SignatureFailed
            }
            CoreError::MalformedMessage(msg)
            | CoreError::EncodingError(msg)
            | CoreError::DecodingError(msg) => ValidationError::StructuralError(msg),
        }
    }
}
