//! # Palisade Testkit
//!
//! Testing utilities for Palisade.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Decision vectors**: Known scope/action cases with expected verdicts
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Parties with deterministic keys and signed permission messages
//!
//! ## Decision Vectors
//!
//! ```rust
//! use palisade_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     assert_eq!(vector.evaluate(), Ok(vector.expected), "{}", vector.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use palisade_perms::matches;
//! use palisade_testkit::generators::{action, scope};
//!
//! proptest! {
//!     #[test]
//!     fn matching_is_deterministic(s in scope(), a in action("did:ex:alice".into())) {
//!         prop_assert_eq!(matches(&s, &a), matches(&s, &a));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use palisade_core::{Interface, Method};
//! use palisade_perms::PermissionScope;
//! use palisade_testkit::fixtures::PermissionsFixture;
//!
//! let fixture = PermissionsFixture::new();
//! let grant = fixture.grant(PermissionScope::new(Interface::Records, Method::Read));
//! assert_eq!(grant.granted_to(), &fixture.grantee.did);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{parties, Party, PermissionsFixture, DAY_MS, T0};
pub use generators::{action, scope, scope_fields};
pub use vectors::{all_vectors, invalid_scopes, verify_all_vectors, DecisionVector};
