//! Signing keys for message authors.
//!
//! A [`Keypair`] signs descriptors. The matching [`Ed25519PublicKey`] is what
//! a node records for a [`Did`](crate::Did) and checks message
//! authorizations against. Verification is strict: small-order keys and
//! non-canonical signatures are rejected.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Context string for [`Keypair::derive`].
const SEED_CONTEXT: &str = "palisade 2025-01-14 keypair seed";

/// Blake3 digest used for content addressing.
pub(crate) fn content_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// The Ed25519 key a signer's messages are verified with.
///
/// Displays and parses as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ed25519PublicKey(#[serde(with = "crate::hex_serde")] pub [u8; 32]);

impl Ed25519PublicKey {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check `signature` over `input`.
    pub fn verify(&self, input: &[u8], signature: &Ed25519Signature) -> Result<(), CoreError> {
        let key = VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        key.verify_strict(input, &Signature::from_bytes(&signature.0))
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", hex::encode(&self.0[..8]))
    }
}

impl FromStr for Ed25519PublicKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| CoreError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }
}

/// Signature carried in a message's authorization.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ed25519Signature(#[serde(with = "crate::hex_serde")] pub [u8; 64]);

impl Ed25519Signature {
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({}..)", hex::encode(&self.0[..8]))
    }
}

/// A signer's secret key.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// A fresh random key.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// A key derived deterministically from arbitrary key material.
    ///
    /// The same material always yields the same key. Material must be
    /// secret for the key to be.
    pub fn derive(material: &[u8]) -> Self {
        Self::from_seed(&blake3::derive_key(SEED_CONTEXT, material))
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, input: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(input).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Keypair").field(&self.public_key()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_checks_input_and_key() {
        let signer = Keypair::from_seed(&[0x01; 32]);
        let other = Keypair::from_seed(&[0x02; 32]);
        let signature = signer.sign(b"grant");

        signer.public_key().verify(b"grant", &signature).unwrap();
        assert!(matches!(
            signer.public_key().verify(b"grant!", &signature),
            Err(CoreError::InvalidSignature)
        ));
        assert!(matches!(
            other.public_key().verify(b"grant", &signature),
            Err(CoreError::InvalidSignature)
        ));
    }

    #[test]
    fn test_zeroed_signature_rejected() {
        let signer = Keypair::generate();
        let zeroed = Ed25519Signature::from_bytes([0; 64]);
        assert!(signer.public_key().verify(b"grant", &zeroed).is_err());
    }

    #[test]
    fn test_small_order_key_rejected() {
        // The identity point: every signature "verifies" under a lax check.
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let key = Ed25519PublicKey::from_bytes(identity);
        let mut signature = [0u8; 64];
        signature[0] = 1;

        assert!(key
            .verify(b"anything", &Ed25519Signature::from_bytes(signature))
            .is_err());
    }

    #[test]
    fn test_derived_keys_are_stable_per_material() {
        let a1 = Keypair::derive(b"alice");
        let a2 = Keypair::derive(b"alice");
        let b = Keypair::derive(b"bob");

        assert_eq!(a1.public_key(), a2.public_key());
        assert_ne!(a1.public_key(), b.public_key());
    }

    #[test]
    fn test_public_key_hex_roundtrip() {
        let key = Keypair::from_seed(&[0x07; 32]).public_key();
        let text = key.to_string();

        assert_eq!(text.len(), 64);
        assert_eq!(text.parse::<Ed25519PublicKey>().unwrap(), key);
        assert!(matches!(
            "abcd".parse::<Ed25519PublicKey>(),
            Err(CoreError::InvalidPublicKey)
        ));
    }

    #[test]
    fn test_signature_json_is_hex() {
        let signature = Keypair::from_seed(&[0x07; 32]).sign(b"payload");
        let json = serde_json::to_string(&signature).unwrap();

        assert_eq!(json.len(), 128 + 2);
        let back: Ed25519Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signature);
    }
}
