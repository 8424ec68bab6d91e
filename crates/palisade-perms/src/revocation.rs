//! Revocation tracking.
//!
//! Grants are never mutated. Revocation messages form an append-only log and
//! the tracker is the derived projection of that log: the set of grant ids
//! that have been revoked. Entries are only ever added.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use palisade_core::{GrantId, MessageId};

use crate::error::RevocationError;
use crate::grant::{PermissionsGrant, PermissionsRevocation};

/// Read access to a set of revoked grant ids.
///
/// Implemented by the live [`RevocationTracker`] and by plain snapshots.
pub trait RevocationIndex {
    /// Check if a grant has been revoked.
    fn is_revoked(&self, grant_id: &GrantId) -> bool;
}

impl RevocationIndex for HashSet<GrantId> {
    fn is_revoked(&self, grant_id: &GrantId) -> bool {
        self.contains(grant_id)
    }
}

/// Check that `revocation` targets `grant` and is signed by its granter.
///
/// Changes no state, so callers can vet a revocation before persisting it.
pub fn check_revocation(
    revocation: &PermissionsRevocation,
    grant: &PermissionsGrant,
) -> Result<(), RevocationError> {
    if revocation.permissions_grant_id() != grant.id() {
        return Err(RevocationError::GrantIdMismatch {
            revokes: revocation.permissions_grant_id(),
            grant_id: grant.id(),
        });
    }

    if revocation.signer() != grant.granted_by() {
        return Err(RevocationError::UnauthorizedRevocation {
            grant_id: grant.id(),
            granted_by: grant.granted_by().clone(),
            signer: revocation.signer().clone(),
        });
    }

    Ok(())
}

/// Result of recording a revocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// The grant was active and is now revoked.
    Recorded,
    /// The grant was already revoked; nothing changed.
    AlreadyRevoked,
}

/// The set of revoked grants, safe to share across threads.
///
/// Writes are serialized by the lock, so concurrent duplicate revocations
/// of one grant record it exactly once. A revocation committed by
/// [`record_revocation`](Self::record_revocation) is visible to every
/// subsequent [`is_revoked`](RevocationIndex::is_revoked).
#[derive(Debug, Default)]
pub struct RevocationTracker {
    /// Revoked grant id -> id of the revocation that first revoked it.
    revoked: RwLock<HashMap<GrantId, MessageId>>,
}

impl RevocationTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tracker from already accepted `(grant id, revocation id)`
    /// pairs. The first pair seen for a grant wins.
    pub fn from_revoked<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (GrantId, MessageId)>,
    {
        let mut revoked = HashMap::new();
        for (grant_id, revocation_id) in entries {
            revoked.entry(grant_id).or_insert(revocation_id);
        }
        Self {
            revoked: RwLock::new(revoked),
        }
    }

    /// Record `revocation` against `grant`.
    ///
    /// The revocation must pass [`check_revocation`]. Re-recording an
    /// already revoked grant is a no-op success.
    pub fn record_revocation(
        &self,
        revocation: &PermissionsRevocation,
        grant: &PermissionsGrant,
    ) -> Result<RevocationOutcome, RevocationError> {
        check_revocation(revocation, grant)?;

        let mut revoked = self.write();
        if revoked.contains_key(&grant.id()) {
            return Ok(RevocationOutcome::AlreadyRevoked);
        }
        revoked.insert(grant.id(), revocation.id());
        Ok(RevocationOutcome::Recorded)
    }

    /// The revocation that revoked `grant_id`, if any.
    pub fn revoked_by(&self, grant_id: &GrantId) -> Option<MessageId> {
        self.read().get(grant_id).copied()
    }

    /// A point-in-time copy of the revoked grant ids.
    pub fn revoked_ids(&self) -> HashSet<GrantId> {
        self.read().keys().copied().collect()
    }

    /// Number of revoked grants.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // The map is only ever inserted into, so a poisoned lock still guards a
    // consistent set.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<GrantId, MessageId>> {
        self.revoked.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<GrantId, MessageId>> {
        self.revoked.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RevocationIndex for RevocationTracker {
    fn is_revoked(&self, grant_id: &GrantId) -> bool {
        self.read().contains_key(grant_id)
    }
}
