//! Message: a descriptor plus the authorization that signs it.
//!
//! A message is immutable. Its id is the Blake3 hash of the canonical CBOR
//! encoding of the whole message (descriptor and authorization), so any
//! change to either produces a different id.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_bytes, decode_canonical, signing_input};
use crate::crypto::{content_hash, Ed25519PublicKey, Ed25519Signature, Keypair};
use crate::error::CoreError;
use crate::types::{Did, Interface, Method, MessageId};

/// A message descriptor: the signed body of a message.
///
/// Each descriptor type names the interface/method pair it must carry.
pub trait Descriptor: Serialize + DeserializeOwned + Clone {
    /// The interface every descriptor of this type carries.
    const INTERFACE: Interface;
    /// The method every descriptor of this type carries.
    const METHOD: Method;

    /// The interface this descriptor claims.
    fn interface(&self) -> Interface;

    /// The method this descriptor claims.
    fn method(&self) -> Method;

    /// Author-claimed creation time (Unix milliseconds).
    fn message_timestamp(&self) -> i64;
}

/// Signature over a descriptor, plus the identity that claims to have made it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// The identity of the signer. Mapping it to a key is the caller's job.
    pub signer: Did,

    /// Ed25519 signature over `SIGN_DOMAIN || canonical(descriptor)`.
    pub signature: Ed25519Signature,
}

/// A complete message: descriptor + mandatory authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message<D> {
    /// The signed descriptor.
    pub descriptor: D,

    /// The authorization over the descriptor.
    pub authorization: Authorization,
}

impl<D: Descriptor> Message<D> {
    /// Sign a descriptor on behalf of `signer` with `keypair`.
    pub fn sign(descriptor: D, signer: Did, keypair: &Keypair) -> Result<Self, CoreError> {
        let input = signing_input(&descriptor)?;
        let signature = keypair.sign(&input);

        Ok(Self {
            descriptor,
            authorization: Authorization { signer, signature },
        })
    }

    /// Compute the message ID (Blake3 hash of canonical bytes).
    pub fn compute_id(&self) -> Result<MessageId, CoreError> {
        let bytes = canonical_bytes(self)?;
        Ok(MessageId(content_hash(&bytes)))
    }

    /// The identity that signed this message.
    pub fn signer(&self) -> &Did {
        &self.authorization.signer
    }

    /// Verify the authorization signature with the signer's resolved key.
    pub fn verify_signature(&self, key: &Ed25519PublicKey) -> Result<(), CoreError> {
        let input = signing_input(&self.descriptor)?;
        key.verify(&input, &self.authorization.signature)
    }

    /// Encode to canonical CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        canonical_bytes(self)
    }

    /// Decode from canonical CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        decode_canonical(bytes)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(crate) struct PingDescriptor {
        pub interface: Interface,
        pub method: Method,
        pub message_timestamp: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub note: Option<String>,
    }

    impl Descriptor for PingDescriptor {
        const INTERFACE: Interface = Interface::Messages;
        const METHOD: Method = Method::Get;

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

    pub(crate) fn ping(timestamp: i64) -> PingDescriptor {
        PingDescriptor {
            interface: Interface::Messages,
            method: Method::Get,
            message_timestamp: timestamp,
            note: None,
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let msg = Message::sign(ping(1_736_870_400_000), Did::new("did:ex:alice"), &keypair)
            .unwrap();

        assert_eq!(msg.signer().as_str(), "did:ex:alice");
        msg.verify_signature(&keypair.public_key()).unwrap();
    }

    #[test]
    fn test_tampered_descriptor_fails_verification() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let mut msg = Message::sign(ping(1000), Did::new("did:ex:alice"), &keypair).unwrap();
        msg.descriptor.message_timestamp = 1001;

        assert!(matches!(
            msg.verify_signature(&keypair.public_key()),
            Err(CoreError::InvalidSignature)
        ));
    }

    #[test]
    fn test_message_id_deterministic() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let m1 = Message::sign(ping(1000), Did::new("did:ex:alice"), &keypair).unwrap();
        let m2 = Message::sign(ping(1000), Did::new("did:ex:alice"), &keypair).unwrap();

        assert_eq!(m1.compute_id().unwrap(), m2.compute_id().unwrap());
    }

    #[test]
    fn test_message_id_covers_optional_fields() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let plain = Message::sign(ping(1000), Did::new("did:ex:alice"), &keypair).unwrap();

        let mut noted = ping(1000);
        noted.note = Some("hi".into());
        let noted = Message::sign(noted, Did::new("did:ex:alice"), &keypair).unwrap();

        assert_ne!(plain.compute_id().unwrap(), noted.compute_id().unwrap());
    }

    #[test]
    fn test_bytes_roundtrip_preserves_id() {
        let keypair = Keypair::from_seed(&[0x11; 32]);
        let msg = Message::sign(ping(5), Did::new("did:ex:bob"), &keypair).unwrap();

        let bytes = msg.to_bytes().unwrap();
        let back: Message<PingDescriptor> = Message::from_bytes(&bytes).unwrap();

        assert_eq!(back, msg);
        assert_eq!(back.compute_id().unwrap(), msg.compute_id().unwrap());
    }
}
