//! Test fixtures and helpers.
//!
//! Common setup code for permission tests: parties with deterministic keys
//! and a fixture that signs requests, grants and revocations between an
//! owner and a grantee at a fixed clock.
//!
//! Signing only fails on encoding errors, which these descriptor types
//! cannot produce, so the helpers panic rather than return `Result`.

use palisade_core::{Did, GrantId, Interface, Keypair, Message, Method};
use palisade_perms::{
    Action, PermissionScope, PermissionsGrant, PermissionsGrantDescriptor, PermissionsRequest,
    PermissionsRequestDescriptor, PermissionsRevocation, PermissionsRevokeDescriptor,
};

/// Fixed clock used by fixtures (2025-01-14T16:00:00Z).
pub const T0: i64 = 1_736_870_400_000;

/// One day in milliseconds.
pub const DAY_MS: i64 = 86_400_000;

/// A named identity with a deterministic signing key.
#[derive(Debug, Clone)]
pub struct Party {
    pub did: Did,
    pub keypair: Keypair,
}

impl Party {
    /// Create a party whose key is derived from its name.
    pub fn new(name: &str) -> Self {
        Self {
            did: Did::new(format!("did:ex:{name}")),
            keypair: Keypair::derive(name.as_bytes()),
        }
    }

    /// Create a party with an explicit key seed.
    pub fn with_seed(name: &str, seed: [u8; 32]) -> Self {
        Self {
            did: Did::new(format!("did:ex:{name}")),
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// Sign `descriptor` as this party.
    pub fn sign<D: palisade_core::Descriptor>(&self, descriptor: D) -> Message<D> {
        Message::sign(descriptor, self.did.clone(), &self.keypair)
            .expect("fixture descriptors always encode")
    }
}

/// An owner, a grantee and a clock.
#[derive(Debug, Clone)]
pub struct PermissionsFixture {
    pub owner: Party,
    pub grantee: Party,
    pub now: i64,
}

impl PermissionsFixture {
    /// Alice owns the node, Bob is the grantee, the clock reads [`T0`].
    pub fn new() -> Self {
        Self {
            owner: Party::new("alice"),
            grantee: Party::new("bob"),
            now: T0,
        }
    }

    /// A grant of `scope` from owner to grantee, expiring a day after `now`.
    pub fn grant_descriptor(&self, scope: PermissionScope) -> PermissionsGrantDescriptor {
        PermissionsGrantDescriptor::new(
            self.owner.did.clone(),
            self.grantee.did.clone(),
            self.owner.did.clone(),
            scope,
            self.now + DAY_MS,
            self.now - 1_000,
        )
    }

    /// A signed grant message for `scope`.
    pub fn grant_message(&self, scope: PermissionScope) -> Message<PermissionsGrantDescriptor> {
        self.owner.sign(self.grant_descriptor(scope))
    }

    /// A signed, identified grant for `scope`.
    pub fn grant(&self, scope: PermissionScope) -> PermissionsGrant {
        self.grant_from(self.grant_descriptor(scope))
    }

    /// Sign an arbitrary grant descriptor as the owner.
    pub fn grant_from(&self, descriptor: PermissionsGrantDescriptor) -> PermissionsGrant {
        PermissionsGrant::from_message(self.owner.sign(descriptor))
            .expect("fixture grants carry a valid header")
    }

    /// A request from the grantee to the owner for `scope`.
    pub fn request_message(&self, scope: PermissionScope) -> Message<PermissionsRequestDescriptor> {
        self.grantee.sign(PermissionsRequestDescriptor::new(
            self.owner.did.clone(),
            self.grantee.did.clone(),
            self.owner.did.clone(),
            scope,
            self.now - 2_000,
        ))
    }

    pub fn request(&self, scope: PermissionScope) -> PermissionsRequest {
        PermissionsRequest::from_message(self.request_message(scope))
            .expect("fixture requests carry a valid header")
    }

    /// A revocation of `grant_id` signed by the owner.
    pub fn revoke_message(&self, grant_id: GrantId) -> Message<PermissionsRevokeDescriptor> {
        self.owner
            .sign(PermissionsRevokeDescriptor::new(grant_id, self.now))
    }

    pub fn revocation(&self, grant_id: GrantId) -> PermissionsRevocation {
        PermissionsRevocation::from_message(self.revoke_message(grant_id))
            .expect("fixture revocations carry a valid header")
    }

    /// An operation on the owner's node.
    pub fn action(&self, interface: Interface, method: Method) -> Action {
        Action::new(self.owner.did.clone(), interface, method)
    }
}

impl Default for PermissionsFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple parties for multi-party tests.
pub fn parties(count: usize) -> Vec<Party> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            Party::with_seed(&format!("party-{i}"), seed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use palisade_core::{validate_message, Ed25519PublicKey};
    use palisade_perms::{RecordsMethod, RecordsTarget};

    fn chat() -> PermissionScope {
        PermissionScope::records(RecordsMethod::Write, RecordsTarget::protocol("chat")).unwrap()
    }

    #[test]
    fn test_party_keys_are_deterministic() {
        let a1 = Party::new("alice");
        let a2 = Party::new("alice");
        let b = Party::new("bob");

        assert_eq!(a1.keypair.public_key(), a2.keypair.public_key());
        assert_ne!(a1.keypair.public_key(), b.keypair.public_key());
        assert_eq!(a1.did.as_str(), "did:ex:alice");
    }

    #[test]
    fn test_fixture_messages_verify() {
        let fixture = PermissionsFixture::new();
        let owner_key: Ed25519PublicKey = fixture.owner.keypair.public_key();

        let grant = fixture.grant(chat());
        assert!(validate_message(grant.message(), &owner_key).is_ok());
        assert_eq!(grant.date_expires(), T0 + DAY_MS);

        let request = fixture.request(chat());
        assert!(validate_message(request.message(), &fixture.grantee.keypair.public_key()).is_ok());

        let revocation = fixture.revocation(grant.id());
        assert_eq!(revocation.permissions_grant_id(), grant.id());
        assert_eq!(revocation.signer(), &fixture.owner.did);
    }

    #[test]
    fn test_multi_party() {
        let parties = parties(3);

        let pks: Vec<_> = parties.iter().map(|p| p.keypair.public_key()).collect();
        assert_ne!(pks[0], pks[1]);
        assert_ne!(pks[1], pks[2]);
        assert_ne!(pks[0], pks[2]);
    }
}
