//! Grant authorization: the pass/fail decision for one operation against
//! one candidate grant.
//!
//! The caller names the grant being invoked; nothing here searches a set of
//! grants. All inputs (grant, action, actor, current time, revocation
//! state) are resolved before the call, so the decision is deterministic and
//! does no I/O.

use palisade_core::{Did, GrantId};

use crate::action::Action;
use crate::conditions::enforce;
use crate::error::AuthorizationError;
use crate::grant::PermissionsGrant;
use crate::matcher::matches;
use crate::revocation::RevocationIndex;

/// Proof that an operation is covered by a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorized {
    pub grant_id: GrantId,
}

/// Decide whether `grant` authorizes `actor` to perform `action` at `now`.
///
/// Checks run in order and the first failure is returned:
/// 1. the grant is for the node the action targets
/// 2. the grant was issued to `actor`
/// 3. `now` is before the grant's expiry
/// 4. the grant has not been revoked
/// 5. the grant's scope covers the action
/// 6. the action satisfies the grant's conditions
pub fn authorize<R>(
    grant: &PermissionsGrant,
    action: &Action,
    actor: &Did,
    now: i64,
    revocations: &R,
) -> Result<Authorized, AuthorizationError>
where
    R: RevocationIndex + ?Sized,
{
    if grant.granted_for() != &action.owner {
        return Err(AuthorizationError::GranteeContextMismatch {
            granted_for: grant.granted_for().clone(),
            target: action.owner.clone(),
        });
    }

    if grant.granted_to() != actor {
        return Err(AuthorizationError::GranteeMismatch {
            granted_to: grant.granted_to().clone(),
            actor: actor.clone(),
        });
    }

    if grant.is_expired_at(now) {
        return Err(AuthorizationError::GrantExpired {
            grant_id: grant.id(),
            date_expires: grant.date_expires(),
            now,
        });
    }

    if revocations.is_revoked(&grant.id()) {
        return Err(AuthorizationError::GrantRevoked(grant.id()));
    }

    if !matches(grant.scope(), action) {
        return Err(AuthorizationError::ScopeMismatch {
            grant_id: grant.id(),
            interface: action.interface,
            method: action.method,
        });
    }

    enforce(grant.conditions(), action)?;

    Ok(Authorized {
        grant_id: grant.id(),
    })
}
