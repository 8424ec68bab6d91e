//! # Palisade
//!
//! The unified API for Palisade: scoped, expiring, revocable permission
//! grants for a personal data node.
//!
//! ## Overview
//!
//! A node owner (the *tenant*) delegates access to other parties by signing
//! grants. This crate ties the pieces together:
//!
//! - **Ingest**: accept Request, Grant and Revocation messages addressed to
//!   the tenant, verifying each signature under the key the resolver holds
//!   for its signer
//! - **Authorize**: decide whether an invocation is covered by the grant it
//!   names, at a caller-supplied time
//! - **Revocation state**: a shared tracker kept current on ingest and
//!   rebuildable from stored revocations
//!
//! Storage and key lookup are behind the async [`MessageResolver`] trait;
//! [`MemoryResolver`] is the in-memory implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use palisade::{EngineConfig, Invocation, MemoryResolver, PermissionsEngine};
//! use palisade::core::{Did, Interface, Keypair, Message, Method};
//! use palisade::perms::{Action, PermissionScope, PermissionsGrantDescriptor};
//!
//! async fn example() {
//!     let alice = Did::new("did:ex:alice");
//!     let keys = Keypair::generate();
//!     let resolver = MemoryResolver::new();
//!     resolver.register_key(alice.clone(), keys.public_key()).unwrap();
//!     let engine = PermissionsEngine::new(alice.clone(), resolver, EngineConfig::default());
//!
//!     let descriptor = PermissionsGrantDescriptor::new(
//!         alice.clone(),
//!         Did::new("did:ex:bob"),
//!         alice.clone(),
//!         PermissionScope::new(Interface::Records, Method::Read),
//!         1_800_000_000_000,
//!         1_736_870_400_000,
//!     );
//!     let message = Message::sign(descriptor, alice.clone(), &keys).unwrap();
//!     let grant_id = engine.ingest_grant(message).await.unwrap().id();
//!
//!     let action = Action::new(alice, Interface::Records, Method::Read);
//!     let invocation = Invocation::new(grant_id, "did:ex:bob", action);
//!     engine.authorize(&invocation, 1_736_870_500_000).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `palisade::core` - identifiers, canonical encoding, signed messages
//! - `palisade::perms` - scopes, grants, the authorizer and revocation tracking

pub mod engine;
pub mod error;
pub mod resolver;

// Re-export component crates
pub use palisade_core as core;
pub use palisade_perms as perms;

// Re-export main types for convenience
pub use engine::{EngineConfig, IngestResult, Invocation, PermissionsEngine};
pub use error::{EngineError, ResolverError, Result};
pub use resolver::{MemoryResolver, MessageResolver, PutOutcome, ResolverResult};

// Re-export commonly used types
pub use palisade_core::{
    Did, Ed25519PublicKey, GrantId, Interface, Keypair, Message, MessageId, Method,
};
pub use palisade_perms::{
    Action, AuthorizationError, Authorized, PermissionConditions, PermissionScope,
    PermissionsGrant, PermissionsRequest, PermissionsRevocation, RevocationOutcome,
    RevocationTracker,
};
