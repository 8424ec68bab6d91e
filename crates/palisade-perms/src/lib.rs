//! # Palisade Permissions
//!
//! Scoped, expiring, revocable permission grants for a personal data node.
//!
//! ## Overview
//!
//! Access to another party's node is expressed as signed messages rather
//! than mutable ACL rows:
//!
//! - **Request**: a party asks the owner for a scoped permission
//! - **Grant**: the owner delegates a scope to a grantee until an expiry
//! - **Revocation**: the grantor permanently deactivates a grant
//!
//! Every operation a grantee invokes is checked with [`authorize`] against
//! the one grant it names. The decision is a pure function of the grant, the
//! action, the actor, the current time and the revocation state.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use palisade_core::{Did, Interface, Keypair, Method};
//! use palisade_perms::{
//!     authorize, Action, PermissionScope, PermissionsGrant, PermissionsGrantDescriptor,
//!     RecordsMethod, RecordsTarget, RevocationTracker,
//! };
//!
//! let owner = Did::new("did:ex:alice");
//! let keys = Keypair::generate();
//! let scope =
//!     PermissionScope::records(RecordsMethod::Write, RecordsTarget::protocol("chat")).unwrap();
//! let descriptor = PermissionsGrantDescriptor::new(
//!     owner.clone(),
//!     Did::new("did:ex:bob"),
//!     owner.clone(),
//!     scope,
//!     1_800_000_000_000,
//!     1_736_870_400_000,
//! );
//! let grant = PermissionsGrant::create(descriptor, owner.clone(), &keys).unwrap();
//!
//! let action = Action::new(owner, Interface::Records, Method::Write).protocol("chat");
//! let tracker = RevocationTracker::new();
//! let decision = authorize(&grant, &action, &Did::new("did:ex:bob"), 1_736_870_500_000, &tracker);
//! assert!(decision.is_ok());
//! ```

pub mod action;
pub mod authorizer;
pub mod conditions;
pub mod error;
pub mod grant;
pub mod matcher;
pub mod revocation;
pub mod scope;

pub use action::{Action, RecordFacts};
pub use authorizer::{authorize, Authorized};
pub use conditions::{enforce, PermissionConditions, Publication};
pub use error::{
    AuthorizationError, ConditionViolation, PermsError, Result, RevocationError, ScopeError,
};
pub use grant::{
    PermissionsGrant, PermissionsGrantDescriptor, PermissionsRequest,
    PermissionsRequestDescriptor, PermissionsRevocation, PermissionsRevokeDescriptor,
};
pub use matcher::{is_within_context, matches};
pub use revocation::{check_revocation, RevocationIndex, RevocationOutcome, RevocationTracker};
pub use scope::{
    validate as validate_scope, GenericScope, PermissionScope, ProtocolLimit, RecordsMethod,
    RecordsScope, RecordsTarget, ScopeFields,
};
