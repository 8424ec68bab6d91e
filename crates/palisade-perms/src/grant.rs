//! Request, Grant and Revocation messages.
//!
//! Permissions are expressed as signed messages. A Request asks for a grant,
//! a Grant delegates a scoped permission, and a Revocation permanently
//! deactivates a grant. None of them is ever mutated after signing.
//!
//! The descriptor types define the canonical encoding: their serde field
//! names and optionality are part of every message id.

use serde::{Deserialize, Serialize};

use palisade_core::{
    validate_descriptor_header, Descriptor, Did, GrantId, Interface, Keypair, Message, MessageId,
    Method,
};

use crate::conditions::PermissionConditions;
use crate::error::Result;
use crate::scope::PermissionScope;

/// Descriptor of a PermissionsRequest message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsRequestDescriptor {
    pub interface: Interface,
    pub method: Method,
    pub message_timestamp: i64,

    /// The node the grantee wants access to.
    pub granted_for: Did,

    /// The prospective grantee, usually the request's author.
    pub granted_to: Did,

    /// The party asked to grant: the owner or one of its delegates.
    pub granted_by: Did,

    /// What the grant would be used for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub scope: PermissionScope,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<PermissionConditions>,
}

/// Descriptor of a PermissionsGrant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsGrantDescriptor {
    pub interface: Interface,
    pub method: Method,
    pub message_timestamp: i64,

    /// Id of the PermissionsRequest this grant answers, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions_request_id: Option<MessageId>,

    /// When the grant stops being active (Unix milliseconds).
    pub date_expires: i64,

    pub granted_for: Did,
    pub granted_to: Did,
    pub granted_by: Did,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub scope: PermissionScope,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<PermissionConditions>,
}

/// Descriptor of a PermissionsRevoke message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsRevokeDescriptor {
    pub interface: Interface,
    pub method: Method,
    pub message_timestamp: i64,

    /// The grant being revoked.
    pub permissions_grant_id: GrantId,
}

macro_rules! impl_descriptor {
    ($ty:ty, $method:expr) => {
        impl Descriptor for $ty {
            const INTERFACE: Interface = Interface::Permissions;
            const METHOD: Method = $method;

            fn interface(&self) -> Interface {
                self.interface
            }

            fn method(&self) -> Method {
                self.method
            }

            fn message_timestamp(&self) -> i64 {
                self.message_timestamp
            }
        }
    };
}

impl_descriptor!(PermissionsRequestDescriptor, Method::Request);
impl_descriptor!(PermissionsGrantDescriptor, Method::Grant);
impl_descriptor!(PermissionsRevokeDescriptor, Method::Revoke);

impl PermissionsRequestDescriptor {
    /// A request for `scope` on `granted_for`'s node.
    pub fn new(
        granted_for: Did,
        granted_to: Did,
        granted_by: Did,
        scope: PermissionScope,
        message_timestamp: i64,
    ) -> Self {
        Self {
            interface: Interface::Permissions,
            method: Method::Request,
            message_timestamp,
            granted_for,
            granted_to,
            granted_by,
            description: None,
            scope,
            conditions: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_conditions(mut self, conditions: PermissionConditions) -> Self {
        self.conditions = Some(conditions);
        self
    }
}

impl PermissionsGrantDescriptor {
    /// A grant of `scope` on `granted_for`'s node, active until `date_expires`.
    pub fn new(
        granted_for: Did,
        granted_to: Did,
        granted_by: Did,
        scope: PermissionScope,
        date_expires: i64,
        message_timestamp: i64,
    ) -> Self {
        Self {
            interface: Interface::Permissions,
            method: Method::Grant,
            message_timestamp,
            permissions_request_id: None,
            date_expires,
            granted_for,
            granted_to,
            granted_by,
            description: None,
            scope,
            conditions: None,
        }
    }

    /// A grant answering `request` with the scope and conditions it asked for.
    pub fn from_request(
        request: &PermissionsRequest,
        date_expires: i64,
        message_timestamp: i64,
    ) -> Self {
        let asked = request.descriptor();
        Self {
            permissions_request_id: Some(request.id()),
            description: asked.description.clone(),
            conditions: asked.conditions.clone(),
            ..Self::new(
                asked.granted_for.clone(),
                asked.granted_to.clone(),
                asked.granted_by.clone(),
                asked.scope.clone(),
                date_expires,
                message_timestamp,
            )
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_conditions(mut self, conditions: PermissionConditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn with_request(mut self, request_id: MessageId) -> Self {
        self.permissions_request_id = Some(request_id);
        self
    }
}

impl PermissionsRevokeDescriptor {
    /// A revocation of `grant_id`.
    pub fn new(permissions_grant_id: GrantId, message_timestamp: i64) -> Self {
        Self {
            interface: Interface::Permissions,
            method: Method::Revoke,
            message_timestamp,
            permissions_grant_id,
        }
    }
}

/// Generates the identified wrapper around a signed permission message.
///
/// The wrapper is only built through `from_message`, which checks the
/// descriptor header and computes the content id once.
macro_rules! identified_message {
    ($(#[$doc:meta])* $name:ident, $descriptor:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            id: MessageId,
            message: Message<$descriptor>,
        }

        impl $name {
            /// Wrap a signed message, checking its header and computing its id.
            pub fn from_message(message: Message<$descriptor>) -> Result<Self> {
                validate_descriptor_header(&message.descriptor)?;
                let id = message.compute_id()?;
                Ok(Self { id, message })
            }

            /// Sign `descriptor` as `signer` and wrap the result.
            pub fn create(descriptor: $descriptor, signer: Did, keypair: &Keypair) -> Result<Self> {
                Self::from_message(Message::sign(descriptor, signer, keypair)?)
            }

            /// The content id of this message.
            pub fn id(&self) -> MessageId {
                self.id
            }

            pub fn descriptor(&self) -> &$descriptor {
                &self.message.descriptor
            }

            pub fn message(&self) -> &Message<$descriptor> {
                &self.message
            }

            /// The identity that signed this message.
            pub fn signer(&self) -> &Did {
                self.message.signer()
            }

            pub fn into_message(self) -> Message<$descriptor> {
                self.message
            }
        }
    };
}

identified_message!(
    /// A signed PermissionsRequest with its content id.
    PermissionsRequest,
    PermissionsRequestDescriptor
);

identified_message!(
    /// A signed PermissionsGrant with its content id (the grant id).
    PermissionsGrant,
    PermissionsGrantDescriptor
);

identified_message!(
    /// A signed PermissionsRevoke with its content id.
    PermissionsRevocation,
    PermissionsRevokeDescriptor
);

impl PermissionsGrant {
    pub fn granted_for(&self) -> &Did {
        &self.descriptor().granted_for
    }

    pub fn granted_to(&self) -> &Did {
        &self.descriptor().granted_to
    }

    pub fn granted_by(&self) -> &Did {
        &self.descriptor().granted_by
    }

    pub fn date_expires(&self) -> i64 {
        self.descriptor().date_expires
    }

    pub fn scope(&self) -> &PermissionScope {
        &self.descriptor().scope
    }

    pub fn conditions(&self) -> Option<&PermissionConditions> {
        self.descriptor().conditions.as_ref()
    }

    /// Check if the grant has expired at `now`. Expiry is exclusive: a grant
    /// is no longer active at exactly `date_expires`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.descriptor().date_expires
    }
}

impl PermissionsRevocation {
    /// The grant this revocation targets.
    pub fn permissions_grant_id(&self) -> GrantId {
        self.descriptor().permissions_grant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::Publication;
    use crate::error::PermsError;
    use crate::scope::{RecordsMethod, RecordsTarget};

    fn alice() -> (Did, Keypair) {
        (Did::new("did:ex:alice"), Keypair::from_seed(&[0x01; 32]))
    }

    fn bob() -> (Did, Keypair) {
        (Did::new("did:ex:bob"), Keypair::from_seed(&[0x02; 32]))
    }

    fn scope() -> PermissionScope {
        PermissionScope::records(RecordsMethod::Write, RecordsTarget::protocol("proto-x")).unwrap()
    }

    #[test]
    fn test_grant_id_is_deterministic() {
        let (alice, kp) = alice();
        let (bob, _) = bob();
        let descriptor =
            PermissionsGrantDescriptor::new(alice.clone(), bob, alice.clone(), scope(), 2000, 1000);

        let g1 = PermissionsGrant::create(descriptor.clone(), alice.clone(), &kp).unwrap();
        let g2 = PermissionsGrant::create(descriptor, alice, &kp).unwrap();

        assert_eq!(g1.id(), g2.id());
    }

    #[test]
    fn test_grant_id_changes_with_expiry() {
        let (alice, kp) = alice();
        let (bob, _) = bob();
        let d1 = PermissionsGrantDescriptor::new(
            alice.clone(),
            bob.clone(),
            alice.clone(),
            scope(),
            2000,
            1000,
        );
        let d2 =
            PermissionsGrantDescriptor::new(alice.clone(), bob, alice.clone(), scope(), 2001, 1000);

        let g1 = PermissionsGrant::create(d1, alice.clone(), &kp).unwrap();
        let g2 = PermissionsGrant::create(d2, alice, &kp).unwrap();

        assert_ne!(g1.id(), g2.id());
    }

    #[test]
    fn test_wrong_method_rejected() {
        let (alice, kp) = alice();
        let (bob, _) = bob();
        let mut descriptor =
            PermissionsGrantDescriptor::new(alice.clone(), bob, alice.clone(), scope(), 2000, 1000);
        descriptor.method = Method::Request;

        let result = PermissionsGrant::create(descriptor, alice, &kp);
        assert!(matches!(result, Err(PermsError::Validation(_))));
    }

    #[test]
    fn test_grant_from_request_links_request() {
        let (alice, _) = alice();
        let (bob, bob_kp) = bob();

        let request = PermissionsRequest::create(
            PermissionsRequestDescriptor::new(alice.clone(), bob.clone(), alice, scope(), 500)
                .with_description("sync my notes")
                .with_conditions(PermissionConditions::publication(Publication::Prohibited)),
            bob,
            &bob_kp,
        )
        .unwrap();

        let descriptor = PermissionsGrantDescriptor::from_request(&request, 5000, 1000);

        assert_eq!(descriptor.permissions_request_id, Some(request.id()));
        assert_eq!(descriptor.scope, request.descriptor().scope);
        assert_eq!(descriptor.granted_to.as_str(), "did:ex:bob");
        assert_eq!(descriptor.description.as_deref(), Some("sync my notes"));
        assert_eq!(
            descriptor.conditions,
            Some(PermissionConditions::publication(Publication::Prohibited))
        );
        assert_eq!(descriptor.method, Method::Grant);
    }

    #[test]
    fn test_expiry_is_exclusive() {
        let (alice, kp) = alice();
        let (bob, _) = bob();
        let grant = PermissionsGrant::create(
            PermissionsGrantDescriptor::new(alice.clone(), bob, alice.clone(), scope(), 2000, 1000),
            alice,
            &kp,
        )
        .unwrap();

        assert!(!grant.is_expired_at(1999));
        assert!(grant.is_expired_at(2000));
        assert!(grant.is_expired_at(2001));
    }

    #[test]
    fn test_grant_descriptor_wire_names() {
        let (alice, _) = alice();
        let (bob, _) = bob();
        let descriptor =
            PermissionsGrantDescriptor::new(alice.clone(), bob, alice, scope(), 2000, 1000)
                .with_request(MessageId::from_bytes([0x0a; 32]));

        let json = serde_json::to_value(&descriptor).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();

        for key in [
            "interface",
            "method",
            "messageTimestamp",
            "permissionsRequestId",
            "dateExpires",
            "grantedFor",
            "grantedTo",
            "grantedBy",
            "scope",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert!(!keys.contains(&"description"));
        assert!(!keys.contains(&"conditions"));
    }

    #[test]
    fn test_revocation_message_roundtrip() {
        let (alice, kp) = alice();
        let grant_id = MessageId::from_bytes([0x42; 32]);
        let revocation = PermissionsRevocation::create(
            PermissionsRevokeDescriptor::new(grant_id, 3000),
            alice,
            &kp,
        )
        .unwrap();

        let bytes = revocation.message().to_bytes().unwrap();
        let decoded =
            PermissionsRevocation::from_message(Message::from_bytes(&bytes).unwrap()).unwrap();

        assert_eq!(decoded.id(), revocation.id());
        assert_eq!(decoded.permissions_grant_id(), grant_id);
    }
}
