//! The PermissionsEngine: permission message ingest and authorization for
//! one tenant's node.
//!
//! The engine is the glue between the pure decision functions in
//! `palisade-perms` and the outside world: it verifies incoming permission
//! messages under their signer's resolved key, checks them against the
//! tenant, stores them through a [`MessageResolver`], keeps the shared
//! [`RevocationTracker`] current, and resolves the grant an invocation names
//! before handing everything to [`authorize`].

use std::sync::Arc;

use palisade_core::{validate_message, Descriptor, Did, GrantId, Message, MessageId};
use palisade_perms::{
    authorize, check_revocation, Action, Authorized, PermissionsGrant, PermissionsGrantDescriptor,
    PermissionsRequest, PermissionsRequestDescriptor, PermissionsRevocation,
    PermissionsRevokeDescriptor, PermsError, RevocationIndex, RevocationOutcome,
    RevocationTracker,
};

use crate::error::{EngineError, Result};
use crate::resolver::{MessageResolver, PutOutcome};

/// Configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether to check tenant and authorship of messages on ingest.
    /// Signatures are verified either way.
    pub validate_on_ingest: bool,
    /// Accept grants issued by parties other than the tenant.
    pub allow_delegated_grants: bool,
    /// Reject grants whose referenced request is unknown or mismatched.
    pub require_known_request: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validate_on_ingest: true,
            allow_delegated_grants: false,
            require_known_request: false,
        }
    }
}

/// Result of ingesting a permission message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestResult {
    /// Message was accepted and stored.
    Accepted(MessageId),
    /// Message was already known (idempotent).
    Duplicate(MessageId),
}

impl IngestResult {
    pub fn id(&self) -> MessageId {
        match self {
            Self::Accepted(id) | Self::Duplicate(id) => *id,
        }
    }

    fn from_put(outcome: PutOutcome, id: MessageId) -> Self {
        match outcome {
            PutOutcome::Stored => Self::Accepted(id),
            PutOutcome::AlreadyStored => Self::Duplicate(id),
        }
    }
}

/// An operation a grantee wants to perform under a named grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The grant the caller claims to act under.
    pub grant_id: GrantId,
    /// The resolved identity performing the operation.
    pub actor: Did,
    pub action: Action,
}

impl Invocation {
    pub fn new(grant_id: GrantId, actor: impl Into<Did>, action: Action) -> Self {
        Self {
            grant_id,
            actor: actor.into(),
            action,
        }
    }
}

/// Permission state and decisions for a single tenant.
pub struct PermissionsEngine<R: MessageResolver> {
    /// The DID that owns the node this engine serves.
    tenant: Did,
    resolver: R,
    revocations: Arc<RevocationTracker>,
    config: EngineConfig,
}

impl<R: MessageResolver> PermissionsEngine<R> {
    /// Create an engine with an empty revocation tracker.
    pub fn new(tenant: impl Into<Did>, resolver: R, config: EngineConfig) -> Self {
        Self::with_tracker(tenant, resolver, Arc::new(RevocationTracker::new()), config)
    }

    /// Create an engine sharing an existing revocation tracker.
    pub fn with_tracker(
        tenant: impl Into<Did>,
        resolver: R,
        revocations: Arc<RevocationTracker>,
        config: EngineConfig,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            resolver,
            revocations,
            config,
        }
    }

    pub fn tenant(&self) -> &Did {
        &self.tenant
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The live revocation state.
    pub fn revocations(&self) -> &Arc<RevocationTracker> {
        &self.revocations
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ingest Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Ingest a PermissionsRequest addressed to this node.
    ///
    /// The request must be signed by the party asking for the grant.
    pub async fn ingest_request(
        &self,
        message: Message<PermissionsRequestDescriptor>,
    ) -> Result<IngestResult> {
        let request = PermissionsRequest::from_message(message)?;
        self.verify_signature(request.message()).await?;

        if self.config.validate_on_ingest {
            let descriptor = request.descriptor();
            self.check_tenant(&descriptor.granted_for)?;
            check_author(request.signer(), &descriptor.granted_to)?;
        }

        let outcome = self.resolver.put_request(&request).await?;
        tracing::debug!(
            request_id = %request.id(),
            granted_to = %request.descriptor().granted_to,
            ?outcome,
            "ingested permissions request"
        );
        Ok(IngestResult::from_put(outcome, request.id()))
    }

    /// Ingest a PermissionsGrant for this node.
    ///
    /// The grant must be signed by its granter, who must be the tenant
    /// unless delegated grants are allowed.
    pub async fn ingest_grant(
        &self,
        message: Message<PermissionsGrantDescriptor>,
    ) -> Result<IngestResult> {
        let grant = PermissionsGrant::from_message(message)?;
        self.verify_signature(grant.message()).await?;

        if self.config.validate_on_ingest {
            self.check_tenant(grant.granted_for())?;
            check_author(grant.signer(), grant.granted_by())?;

            if !self.config.allow_delegated_grants && grant.granted_by() != &self.tenant {
                return Err(EngineError::DelegationNotAllowed {
                    granted_by: grant.granted_by().clone(),
                });
            }
        }

        if self.config.require_known_request {
            if let Some(request_id) = grant.descriptor().permissions_request_id {
                self.check_request(&grant, request_id).await?;
            }
        }

        let outcome = self.resolver.put_grant(&grant).await?;
        tracing::info!(
            grant_id = %grant.id(),
            granted_to = %grant.granted_to(),
            date_expires = grant.date_expires(),
            ?outcome,
            "ingested permissions grant"
        );
        Ok(IngestResult::from_put(outcome, grant.id()))
    }

    /// Ingest a PermissionsRevocation.
    ///
    /// The revoked grant must already be known. A revocation is persisted
    /// before the tracker commits it, so a failed write leaves the grant
    /// active and the same revocation can be retried. Revoking an already
    /// revoked grant is accepted and stores nothing.
    pub async fn ingest_revocation(
        &self,
        message: Message<PermissionsRevokeDescriptor>,
    ) -> Result<RevocationOutcome> {
        let revocation = PermissionsRevocation::from_message(message)?;
        self.verify_signature(revocation.message()).await?;
        let grant_id = revocation.permissions_grant_id();

        let grant = self
            .resolver
            .get_grant(&grant_id)
            .await?
            .ok_or(EngineError::GrantNotFound(grant_id))?;

        check_revocation(&revocation, &grant).map_err(PermsError::from)?;
        if self.revocations.is_revoked(&grant_id) {
            tracing::debug!(%grant_id, "grant already revoked");
            return Ok(RevocationOutcome::AlreadyRevoked);
        }

        self.resolver.put_revocation(&revocation).await?;
        let outcome = self
            .revocations
            .record_revocation(&revocation, &grant)
            .map_err(PermsError::from)?;

        if outcome == RevocationOutcome::Recorded {
            tracing::info!(
                %grant_id,
                revocation_id = %revocation.id(),
                "grant revoked"
            );
        } else {
            tracing::debug!(%grant_id, "grant revoked concurrently");
        }

        Ok(outcome)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Authorize an invocation against the grant it names, at `now`
    /// (Unix milliseconds).
    pub async fn authorize(&self, invocation: &Invocation, now: i64) -> Result<Authorized> {
        let grant = self
            .resolver
            .get_grant(&invocation.grant_id)
            .await?
            .ok_or(EngineError::GrantNotFound(invocation.grant_id))?;

        let verdict = authorize(
            &grant,
            &invocation.action,
            &invocation.actor,
            now,
            self.revocations.as_ref(),
        );

        match &verdict {
            Ok(_) => tracing::debug!(
                grant_id = %invocation.grant_id,
                actor = %invocation.actor,
                interface = %invocation.action.interface,
                method = %invocation.action.method,
                "authorized"
            ),
            Err(err) => tracing::warn!(
                grant_id = %invocation.grant_id,
                actor = %invocation.actor,
                "denied: {}",
                err
            ),
        }

        verdict.map_err(EngineError::from)
    }

    /// Authorize an invocation at the current wall-clock time.
    pub async fn authorize_now(&self, invocation: &Invocation) -> Result<Authorized> {
        self.authorize(invocation, now_millis()).await
    }

    /// Replay every stored revocation into the tracker.
    ///
    /// Returns the number of grants newly marked revoked. Revocations whose
    /// grant can no longer be resolved are skipped.
    pub async fn rebuild_revocations(&self) -> Result<usize> {
        let mut recorded = 0;

        for revocation in self.resolver.list_revocations().await? {
            let grant_id = revocation.permissions_grant_id();
            let Some(grant) = self.resolver.get_grant(&grant_id).await? else {
                tracing::warn!(%grant_id, "stored revocation for unknown grant");
                continue;
            };

            let outcome = self
                .revocations
                .record_revocation(&revocation, &grant)
                .map_err(PermsError::from)?;
            if outcome == RevocationOutcome::Recorded {
                recorded += 1;
            }
        }

        tracing::info!(recorded, total = self.revocations.len(), "rebuilt revocations");
        Ok(recorded)
    }

    /// Verify `message` under the key its signer resolves to.
    async fn verify_signature<D: Descriptor + Sync>(&self, message: &Message<D>) -> Result<()> {
        let signer = message.signer();
        let key = self
            .resolver
            .resolve_key(signer)
            .await?
            .ok_or_else(|| EngineError::UnknownSigner(signer.clone()))?;

        validate_message(message, &key).map_err(|err| {
            tracing::warn!(%signer, "rejected message: {}", err);
            EngineError::from(err)
        })
    }

    fn check_tenant(&self, granted_for: &Did) -> Result<()> {
        if granted_for != &self.tenant {
            return Err(EngineError::WrongTenant {
                tenant: self.tenant.clone(),
                granted_for: granted_for.clone(),
            });
        }
        Ok(())
    }

    async fn check_request(&self, grant: &PermissionsGrant, request_id: MessageId) -> Result<()> {
        let request = self
            .resolver
            .get_request(&request_id)
            .await?
            .ok_or(EngineError::RequestNotFound(request_id))?;

        if &request.descriptor().granted_to != grant.granted_to() {
            return Err(EngineError::RequestMismatch {
                request_id,
                requested_by: request.descriptor().granted_to.clone(),
                granted_to: grant.granted_to().clone(),
            });
        }
        Ok(())
    }
}

fn check_author(signer: &Did, expected: &Did) -> Result<()> {
    if signer != expected {
        return Err(EngineError::AuthorMismatch {
            expected: expected.clone(),
            signer: signer.clone(),
        });
    }
    Ok(())
}

/// Get current time in milliseconds.
///
/// A clock set before the epoch reads as the far future, so every grant
/// looks expired.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|elapsed| i64::try_from(elapsed.as_millis()).ok())
        .unwrap_or(i64::MAX)
}
