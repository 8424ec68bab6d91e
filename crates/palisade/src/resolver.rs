//! MessageResolver: the storage seam the engine resolves permission
//! messages through.
//!
//! Durable storage, indexing and DID resolution live outside this
//! workspace. The engine only needs to put accepted messages, look them up
//! by id and find the key a signer's messages verify under, so that is all
//! this trait asks for. [`MemoryResolver`] keeps everything in memory.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use palisade_core::{Did, Ed25519PublicKey, GrantId, MessageId};
use palisade_perms::{PermissionsGrant, PermissionsRequest, PermissionsRevocation};

use crate::error::ResolverError;

/// Result type for resolver operations.
pub type ResolverResult<T> = std::result::Result<T, ResolverError>;

/// Result of storing a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The message was new.
    Stored,
    /// A message with the same id was already stored (idempotent).
    AlreadyStored,
}

/// Async lookup and storage of permission messages.
///
/// Messages are content addressed, so putting the same message twice
/// returns `AlreadyStored` and changes nothing.
#[async_trait]
pub trait MessageResolver: Send + Sync {
    async fn put_request(&self, request: &PermissionsRequest) -> ResolverResult<PutOutcome>;

    async fn put_grant(&self, grant: &PermissionsGrant) -> ResolverResult<PutOutcome>;

    async fn put_revocation(&self, revocation: &PermissionsRevocation)
        -> ResolverResult<PutOutcome>;

    async fn get_request(&self, id: &MessageId) -> ResolverResult<Option<PermissionsRequest>>;

    async fn get_grant(&self, id: &GrantId) -> ResolverResult<Option<PermissionsGrant>>;

    /// All stored revocations, in the order they were stored.
    async fn list_revocations(&self) -> ResolverResult<Vec<PermissionsRevocation>>;

    /// The key `did` currently signs with, if it is known.
    async fn resolve_key(&self, did: &Did) -> ResolverResult<Option<Ed25519PublicKey>>;
}

#[async_trait]
impl<R: MessageResolver + ?Sized> MessageResolver for Arc<R> {
    async fn put_request(&self, request: &PermissionsRequest) -> ResolverResult<PutOutcome> {
        (**self).put_request(request).await
    }

    async fn put_grant(&self, grant: &PermissionsGrant) -> ResolverResult<PutOutcome> {
        (**self).put_grant(grant).await
    }

    async fn put_revocation(
        &self,
        revocation: &PermissionsRevocation,
    ) -> ResolverResult<PutOutcome> {
        (**self).put_revocation(revocation).await
    }

    async fn get_request(&self, id: &MessageId) -> ResolverResult<Option<PermissionsRequest>> {
        (**self).get_request(id).await
    }

    async fn get_grant(&self, id: &GrantId) -> ResolverResult<Option<PermissionsGrant>> {
        (**self).get_grant(id).await
    }

    async fn list_revocations(&self) -> ResolverResult<Vec<PermissionsRevocation>> {
        (**self).list_revocations().await
    }

    async fn resolve_key(&self, did: &Did) -> ResolverResult<Option<Ed25519PublicKey>> {
        (**self).resolve_key(did).await
    }
}

/// In-memory resolver.
///
/// All data is lost when the resolver is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    inner: RwLock<MemoryResolverInner>,
}

#[derive(Debug, Default)]
struct MemoryResolverInner {
    requests: HashMap<MessageId, PermissionsRequest>,
    grants: HashMap<GrantId, PermissionsGrant>,
    revocations: HashMap<MessageId, PermissionsRevocation>,
    /// Revocation ids in insertion order.
    revocation_log: Vec<MessageId>,
    keys: HashMap<Did, Ed25519PublicKey>,
}

impl MemoryResolver {
    /// Create a new empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the key `did` signs with.
    pub fn register_key(&self, did: impl Into<Did>, key: Ed25519PublicKey) -> ResolverResult<()> {
        self.write()?.keys.insert(did.into(), key);
        Ok(())
    }

    /// Number of stored grants.
    pub fn grant_count(&self) -> usize {
        self.read().map(|inner| inner.grants.len()).unwrap_or(0)
    }

    fn read(&self) -> ResolverResult<RwLockReadGuard<'_, MemoryResolverInner>> {
        self.inner.read().map_err(|_| ResolverError::Poisoned)
    }

    fn write(&self) -> ResolverResult<RwLockWriteGuard<'_, MemoryResolverInner>> {
        self.inner.write().map_err(|_| ResolverError::Poisoned)
    }
}

fn put<V: Clone>(map: &mut HashMap<MessageId, V>, id: MessageId, value: &V) -> PutOutcome {
    if map.contains_key(&id) {
        return PutOutcome::AlreadyStored;
    }
    map.insert(id, value.clone());
    PutOutcome::Stored
}

#[async_trait]
impl MessageResolver for MemoryResolver {
    async fn put_request(&self, request: &PermissionsRequest) -> ResolverResult<PutOutcome> {
        let mut inner = self.write()?;
        Ok(put(&mut inner.requests, request.id(), request))
    }

    async fn put_grant(&self, grant: &PermissionsGrant) -> ResolverResult<PutOutcome> {
        let mut inner = self.write()?;
        Ok(put(&mut inner.grants, grant.id(), grant))
    }

    async fn put_revocation(
        &self,
        revocation: &PermissionsRevocation,
    ) -> ResolverResult<PutOutcome> {
        let mut inner = self.write()?;
        let outcome = put(&mut inner.revocations, revocation.id(), revocation);
        if outcome == PutOutcome::Stored {
            inner.revocation_log.push(revocation.id());
        }
        Ok(outcome)
    }

    async fn get_request(&self, id: &MessageId) -> ResolverResult<Option<PermissionsRequest>> {
        Ok(self.read()?.requests.get(id).cloned())
    }

    async fn get_grant(&self, id: &GrantId) -> ResolverResult<Option<PermissionsGrant>> {
        Ok(self.read()?.grants.get(id).cloned())
    }

    async fn list_revocations(&self) -> ResolverResult<Vec<PermissionsRevocation>> {
        let inner = self.read()?;
        Ok(inner
            .revocation_log
            .iter()
            .filter_map(|id| inner.revocations.get(id).cloned())
            .collect())
    }

    async fn resolve_key(&self, did: &Did) -> ResolverResult<Option<Ed25519PublicKey>> {
        Ok(self.read()?.keys.get(did).copied())
    }
}
