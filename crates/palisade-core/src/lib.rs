//! # Palisade Core
//!
//! Pure primitives for Palisade: identities, content-addressed message ids,
//! signed message envelopes, and canonicalization.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Message`] - A descriptor plus its mandatory [`Authorization`]
//! - [`MessageId`] - Content-addressed identifier (Blake3 hash)
//! - [`Did`] - The identity of an owner, grantee, granter or signer
//! - [`Interface`] / [`Method`] - The operation a descriptor names
//!
//! ## Canonicalization
//!
//! Messages are encoded using deterministic CBOR. See [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod error;
pub(crate) mod hex_serde;
pub mod message;
pub mod types;
pub mod validation;

pub use canonical::{canonical_bytes, decode_canonical, signing_input, SIGN_DOMAIN};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{CoreError, ValidationError};
pub use message::{Authorization, Descriptor, Message};
pub use types::{Did, GrantId, Interface, MessageId, Method};
pub use validation::{validate_descriptor_header, validate_message};
