//! Proptest generators for property-based testing.

use proptest::prelude::*;

use palisade_core::{Did, Interface, Method};
use palisade_perms::{
    Action, PermissionScope, ProtocolLimit, RecordsMethod, RecordsTarget, ScopeFields,
};

/// Generate a DID from a small alphabet so collisions are likely.
pub fn did() -> impl Strategy<Value = Did> {
    "[a-d]".prop_map(|name| Did::new(format!("did:ex:{name}")))
}

pub fn interface() -> impl Strategy<Value = Interface> {
    prop_oneof![
        Just(Interface::Events),
        Just(Interface::Messages),
        Just(Interface::Permissions),
        Just(Interface::Protocols),
        Just(Interface::Records),
        Just(Interface::Snapshots),
    ]
}

pub fn method() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::Configure),
        Just(Method::Create),
        Just(Method::Delete),
        Just(Method::Get),
        Just(Method::Grant),
        Just(Method::Query),
        Just(Method::Read),
        Just(Method::Request),
        Just(Method::Revoke),
        Just(Method::Write),
    ]
}

pub fn records_method() -> impl Strategy<Value = RecordsMethod> {
    prop_oneof![Just(RecordsMethod::Read), Just(RecordsMethod::Write)]
}

/// A protocol or schema URI from a small set.
pub fn uri() -> impl Strategy<Value = String> {
    "[xyz]".prop_map(|s| format!("https://example.com/{s}"))
}

/// A `/`-separated path of one to three short segments.
pub fn path() -> impl Strategy<Value = String> {
    prop::collection::vec("[ab]{1,2}", 1..=3).prop_map(|segments| segments.join("/"))
}

/// Generate any valid records target.
pub fn records_target() -> impl Strategy<Value = RecordsTarget> {
    let limit = prop_oneof![
        Just(None::<ProtocolLimit>),
        path().prop_map(|p| Some(ProtocolLimit::ContextId(p))),
        path().prop_map(|p| Some(ProtocolLimit::ProtocolPath(p))),
    ];

    prop_oneof![
        Just(RecordsTarget::Any),
        uri().prop_map(RecordsTarget::Schema),
        (uri(), limit).prop_map(|(protocol, limit)| RecordsTarget::Protocol { protocol, limit }),
    ]
}

/// Generate any valid scope.
pub fn scope() -> impl Strategy<Value = PermissionScope> {
    prop_oneof![
        (interface(), method()).prop_map(|(i, m)| PermissionScope::new(i, m)),
        (records_method(), records_target()).prop_filter_map("valid records scope", |(m, t)| {
            PermissionScope::records(m, t).ok()
        }),
    ]
}

/// Generate scope fields with every qualifier independently present or
/// absent. Most are invalid.
pub fn scope_fields() -> impl Strategy<Value = ScopeFields> {
    (
        interface(),
        method(),
        proptest::option::of(uri()),
        proptest::option::of(path()),
        proptest::option::of(path()),
        proptest::option::of(uri()),
    )
        .prop_map(|(interface, method, protocol, context_id, protocol_path, schema)| {
            ScopeFields {
                interface,
                method,
                protocol,
                context_id,
                protocol_path,
                schema,
            }
        })
}

/// Generate an action against `owner`'s node with arbitrary record facts.
pub fn action(owner: Did) -> impl Strategy<Value = Action> {
    (
        interface(),
        method(),
        proptest::option::of(uri()),
        proptest::option::of(path()),
        proptest::option::of(path()),
        proptest::option::of(uri()),
        any::<bool>(),
    )
        .prop_map(
            move |(interface, method, protocol, context_id, protocol_path, schema, public)| {
                let mut action = Action::new(owner.clone(), interface, method).public(public);
                action.record.protocol = protocol;
                action.record.context_id = context_id;
                action.record.protocol_path = protocol_path;
                action.record.schema = schema;
                action
            },
        )
}
