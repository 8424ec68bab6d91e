//! Message validation: descriptor header checks and signature verification.

use crate::crypto::Ed25519PublicKey;
use crate::error::ValidationError;
use crate::message::{Descriptor, Message};

/// Check that a descriptor carries the interface/method its type requires
/// and a non-negative timestamp.
pub fn validate_descriptor_header<D: Descriptor>(descriptor: &D) -> Result<(), ValidationError> {
    if descriptor.interface() != D::INTERFACE || descriptor.method() != D::METHOD {
        return Err(ValidationError::UnexpectedDescriptor {
            expected_interface: D::INTERFACE,
            expected_method: D::METHOD,
            interface: descriptor.interface(),
            method: descriptor.method(),
        });
    }

    if descriptor.message_timestamp() < 0 {
        return Err(ValidationError::InvalidTimestamp(
            descriptor.message_timestamp(),
        ));
    }

    Ok(())
}

/// Validate a message against the signer's resolved key.
///
/// This performs:
/// - Descriptor header check
/// - Signature verification
pub fn validate_message<D: Descriptor>(
    message: &Message<D>,
    signer_key: &Ed25519PublicKey,
) -> Result<(), ValidationError> {
    validate_descriptor_header(&message.descriptor)?;

    message
        .verify_signature(signer_key)
        .map_err(|_| ValidationError::SignatureFailed)?;

    Ok(())
}
