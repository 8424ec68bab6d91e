//! End-to-end permission lifecycle through the engine: request, grant,
//! authorize, revoke, restart.

use std::sync::Arc;

use palisade::core::{Did, Ed25519Signature, Interface, Method, ValidationError};
use palisade::perms::{
    AuthorizationError, PermissionConditions, PermissionScope, PermissionsGrantDescriptor,
    Publication, RecordsMethod, RecordsTarget, RevocationOutcome,
};
use palisade::{
    EngineConfig, EngineError, IngestResult, Invocation, MemoryResolver, MessageResolver,
    PermissionsEngine,
};
use palisade_testkit::fixtures::{Party, PermissionsFixture, DAY_MS};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A resolver holding the owner's and the grantee's keys.
fn resolver_for(fixture: &PermissionsFixture) -> MemoryResolver {
    let resolver = MemoryResolver::new();
    for party in [&fixture.owner, &fixture.grantee] {
        resolver
            .register_key(party.did.clone(), party.keypair.public_key())
            .unwrap();
    }
    resolver
}

fn engine_for(
    fixture: &PermissionsFixture,
    config: EngineConfig,
) -> PermissionsEngine<MemoryResolver> {
    PermissionsEngine::new(fixture.owner.did.clone(), resolver_for(fixture), config)
}

fn requests_required() -> EngineConfig {
    EngineConfig {
        require_known_request: true,
        ..EngineConfig::default()
    }
}

fn chat_write() -> PermissionScope {
    let target = RecordsTarget::protocol("https://chat.example");
    PermissionScope::records(RecordsMethod::Write, target).unwrap()
}

#[tokio::test]
async fn test_request_grant_authorize_revoke() {
    init_tracing();
    let fixture = PermissionsFixture::new();
    let engine = engine_for(&fixture, requests_required());

    let request = fixture.request(chat_write());
    let ingested = engine.ingest_request(request.message().clone()).await.unwrap();
    assert_eq!(ingested, IngestResult::Accepted(request.id()));

    let descriptor =
        PermissionsGrantDescriptor::from_request(&request, fixture.now + DAY_MS, fixture.now);
    let grant_id = engine
        .ingest_grant(fixture.owner.sign(descriptor))
        .await
        .unwrap()
        .id();

    let action = fixture
        .action(Interface::Records, Method::Write)
        .protocol("https://chat.example")
        .protocol_path("thread/message");
    let invocation = Invocation::new(grant_id, fixture.grantee.did.clone(), action);

    let authorized = engine.authorize(&invocation, fixture.now).await.unwrap();
    assert_eq!(authorized.grant_id, grant_id);

    let outcome = engine
        .ingest_revocation(fixture.revoke_message(grant_id))
        .await
        .unwrap();
    assert_eq!(outcome, RevocationOutcome::Recorded);

    let result = engine.authorize(&invocation, fixture.now).await;
    assert!(matches!(
        result,
        Err(EngineError::Unauthorized(AuthorizationError::GrantRevoked(id))) if id == grant_id
    ));
}

#[tokio::test]
async fn test_grant_for_unknown_request_rejected() {
    let fixture = PermissionsFixture::new();
    let engine = engine_for(&fixture, requests_required());

    let request = fixture.request(chat_write());
    let descriptor =
        PermissionsGrantDescriptor::from_request(&request, fixture.now + DAY_MS, fixture.now);

    let result = engine.ingest_grant(fixture.owner.sign(descriptor)).await;
    assert!(matches!(result, Err(EngineError::RequestNotFound(id)) if id == request.id()));
}

#[tokio::test]
async fn test_grant_to_other_party_than_requester_rejected() {
    let fixture = PermissionsFixture::new();
    let engine = engine_for(&fixture, requests_required());

    let request = fixture.request(chat_write());
    engine.ingest_request(request.message().clone()).await.unwrap();

    let mut descriptor =
        PermissionsGrantDescriptor::from_request(&request, fixture.now + DAY_MS, fixture.now);
    descriptor.granted_to = Did::new("did:ex:mallory");

    let result = engine.ingest_grant(fixture.owner.sign(descriptor)).await;
    assert!(matches!(result, Err(EngineError::RequestMismatch { .. })));
}

#[tokio::test]
async fn test_request_signed_by_someone_else_rejected() {
    let fixture = PermissionsFixture::new();
    let engine = engine_for(&fixture, EngineConfig::default());

    let mut message = fixture.request_message(chat_write());
    let mallory = Party::new("mallory");
    engine
        .resolver()
        .register_key(mallory.did.clone(), mallory.keypair.public_key())
        .unwrap();
    message = mallory.sign(message.descriptor);

    let result = engine.ingest_request(message).await;
    assert!(matches!(result, Err(EngineError::AuthorMismatch { .. })));
}

#[tokio::test]
async fn test_unvalidated_ingest_skips_tenant_checks() {
    let fixture = PermissionsFixture::new();
    let engine = PermissionsEngine::new(
        "did:ex:someone-else",
        resolver_for(&fixture),
        EngineConfig {
            validate_on_ingest: false,
            ..EngineConfig::default()
        },
    );

    let result = engine.ingest_grant(fixture.grant_message(chat_write())).await;
    assert!(matches!(result, Ok(IngestResult::Accepted(_))));

    let read_all = PermissionScope::new(Interface::Records, Method::Read);
    let mut unsigned = fixture.grant_message(read_all);
    unsigned.authorization.signature = Ed25519Signature::from_bytes([0; 64]);
    let result = engine.ingest_grant(unsigned).await;
    assert!(matches!(
        result,
        Err(EngineError::InvalidMessage(ValidationError::SignatureFailed))
    ));
}

#[tokio::test]
async fn test_grant_claiming_owner_as_signer_never_authorizes() {
    init_tracing();
    let fixture = PermissionsFixture::new();
    let engine = engine_for(&fixture, EngineConfig::default());
    let mallory = Party::new("mallory");
    engine
        .resolver()
        .register_key(mallory.did.clone(), mallory.keypair.public_key())
        .unwrap();

    // Mallory writes herself a grant on alice's node and puts alice's name
    // on the authorization.
    let mut descriptor = fixture.grant_descriptor(chat_write());
    descriptor.granted_to = mallory.did.clone();
    let mut forged = mallory.sign(descriptor);
    forged.authorization.signer = fixture.owner.did.clone();
    let forged_id = forged.compute_id().unwrap();

    for signature in [forged.authorization.signature, Ed25519Signature::from_bytes([0; 64])] {
        forged.authorization.signature = signature;
        let result = engine.ingest_grant(forged.clone()).await;
        assert!(matches!(
            result,
            Err(EngineError::InvalidMessage(ValidationError::SignatureFailed))
        ));
    }

    let action = fixture
        .action(Interface::Records, Method::Write)
        .protocol("https://chat.example");
    let invocation = Invocation::new(forged_id, mallory.did.clone(), action);
    assert!(matches!(
        engine.authorize(&invocation, fixture.now).await,
        Err(EngineError::GrantNotFound(_))
    ));
}

#[tokio::test]
async fn test_grant_from_unregistered_signer_rejected() {
    let fixture = PermissionsFixture::new();
    let engine = PermissionsEngine::new(
        fixture.owner.did.clone(),
        MemoryResolver::new(),
        EngineConfig::default(),
    );

    let result = engine.ingest_grant(fixture.grant_message(chat_write())).await;
    assert!(matches!(result, Err(EngineError::UnknownSigner(did)) if did == fixture.owner.did));
}

#[tokio::test]
async fn test_publication_condition_enforced() {
    let fixture = PermissionsFixture::new();
    let engine = engine_for(&fixture, EngineConfig::default());

    let descriptor = fixture
        .grant_descriptor(PermissionScope::new(Interface::Records, Method::Write))
        .with_conditions(PermissionConditions::publication(Publication::Prohibited));
    let grant_id = engine
        .ingest_grant(fixture.owner.sign(descriptor))
        .await
        .unwrap()
        .id();

    let private = fixture.action(Interface::Records, Method::Write);
    let public = private.clone().public(true);

    let allowed = Invocation::new(grant_id, fixture.grantee.did.clone(), private);
    assert!(engine.authorize(&allowed, fixture.now).await.is_ok());

    let denied = Invocation::new(grant_id, fixture.grantee.did.clone(), public);
    assert!(matches!(
        engine.authorize(&denied, fixture.now).await,
        Err(EngineError::Unauthorized(AuthorizationError::ConditionViolation(_)))
    ));
}

#[tokio::test]
async fn test_expiry_boundary() {
    let fixture = PermissionsFixture::new();
    let engine = engine_for(&fixture, EngineConfig::default());
    let grant_id = engine
        .ingest_grant(fixture.grant_message(chat_write()))
        .await
        .unwrap()
        .id();

    let action = fixture
        .action(Interface::Records, Method::Write)
        .protocol("https://chat.example");
    let invocation = Invocation::new(grant_id, fixture.grantee.did.clone(), action);
    let expires = fixture.now + DAY_MS;

    assert!(engine.authorize(&invocation, expires - 1).await.is_ok());
    for now in [expires, expires + 1] {
        assert!(matches!(
            engine.authorize(&invocation, now).await,
            Err(EngineError::Unauthorized(AuthorizationError::GrantExpired { .. }))
        ));
    }
}

#[tokio::test]
async fn test_concurrent_revocations_record_once() {
    let fixture = PermissionsFixture::new();
    let engine = Arc::new(engine_for(&fixture, EngineConfig::default()));
    let grant_id = engine
        .ingest_grant(fixture.grant_message(chat_write()))
        .await
        .unwrap()
        .id();

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = Arc::clone(&engine);
        let mut fixture = fixture.clone();
        fixture.now += i;
        handles.push(tokio::spawn(async move {
            engine.ingest_revocation(fixture.revoke_message(grant_id)).await
        }));
    }

    let mut recorded = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() == RevocationOutcome::Recorded {
            recorded += 1;
        }
    }

    assert_eq!(recorded, 1);
    assert_eq!(engine.revocations().len(), 1);

    // Racing writers may each persist their revocation; all of them target
    // the grant and one of them is the recorded one.
    let stored = engine.resolver().list_revocations().await.unwrap();
    assert!(!stored.is_empty());
    assert!(stored.iter().all(|r| r.permissions_grant_id() == grant_id));
    let revoked_by = engine.revocations().revoked_by(&grant_id);
    assert!(stored.iter().any(|r| Some(r.id()) == revoked_by));
}

#[tokio::test]
async fn test_restart_rebuilds_revocations() {
    init_tracing();
    let fixture = PermissionsFixture::new();
    let resolver = Arc::new(resolver_for(&fixture));
    let restart = || {
        PermissionsEngine::new(
            fixture.owner.did.clone(),
            Arc::clone(&resolver),
            EngineConfig::default(),
        )
    };

    let grant_id = {
        let engine = restart();
        let grant_id = engine
            .ingest_grant(fixture.grant_message(chat_write()))
            .await
            .unwrap()
            .id();
        engine
            .ingest_revocation(fixture.revoke_message(grant_id))
            .await
            .unwrap();
        grant_id
    };

    let engine = restart();
    assert_eq!(engine.rebuild_revocations().await.unwrap(), 1);

    let action = fixture
        .action(Interface::Records, Method::Write)
        .protocol("https://chat.example");
    let invocation = Invocation::new(grant_id, fixture.grantee.did.clone(), action);
    assert!(matches!(
        engine.authorize(&invocation, fixture.now).await,
        Err(EngineError::Unauthorized(AuthorizationError::GrantRevoked(_)))
    ));
}
