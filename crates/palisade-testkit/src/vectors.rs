//! Decision vectors: table-driven scope/action expectations.
//!
//! Every implementation of scope matching must agree with these. Each
//! vector pairs a scope in its flat wire form with the record facts of an
//! operation and the expected verdict.

use serde::Serialize;

use palisade_core::{Interface, Method};
use palisade_perms::{matches, Action, PermissionScope, ScopeError, ScopeFields};

/// A single decision vector.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionVector {
    pub name: &'static str,
    pub scope: ScopeFields,
    pub interface: Interface,
    pub method: Method,
    pub protocol: Option<&'static str>,
    pub context_id: Option<&'static str>,
    pub protocol_path: Option<&'static str>,
    pub schema: Option<&'static str>,
    pub expected: bool,
}

/// Owner of the node every vector targets.
pub const VECTOR_OWNER: &str = "did:ex:alice";

fn records(method: Method) -> ScopeFields {
    ScopeFields::new(Interface::Records, method)
}

fn write(name: &'static str, scope: ScopeFields, expected: bool) -> DecisionVector {
    DecisionVector {
        name,
        scope,
        interface: Interface::Records,
        method: Method::Write,
        protocol: None,
        context_id: None,
        protocol_path: None,
        schema: None,
        expected,
    }
}

/// All decision vectors.
pub fn all_vectors() -> Vec<DecisionVector> {
    vec![
        DecisionVector {
            protocol: Some("proto-x"),
            protocol_path: Some("a/b"),
            ..write("protocol_scope_any_path", records(Method::Write).protocol("proto-x"), true)
        },
        DecisionVector {
            protocol: Some("proto-y"),
            protocol_path: Some("a/b"),
            ..write(
                "protocol_scope_other_protocol",
                records(Method::Write).protocol("proto-x"),
                false,
            )
        },
        DecisionVector {
            method: Method::Read,
            protocol: Some("p"),
            context_id: Some("root/child/leaf"),
            ..write(
                "context_scope_descendant",
                records(Method::Read).protocol("p").context_id("root/child"),
                true,
            )
        },
        DecisionVector {
            method: Method::Read,
            protocol: Some("p"),
            context_id: Some("root/childish"),
            ..write(
                "context_scope_sibling_prefix",
                records(Method::Read).protocol("p").context_id("root/child"),
                false,
            )
        },
        DecisionVector {
            method: Method::Read,
            protocol: Some("p"),
            context_id: Some("root"),
            ..write(
                "context_scope_ancestor",
                records(Method::Read).protocol("p").context_id("root/child"),
                false,
            )
        },
        DecisionVector {
            protocol: Some("p"),
            protocol_path: Some("thread/reply"),
            ..write(
                "path_scope_exact",
                records(Method::Write).protocol("p").protocol_path("thread/reply"),
                true,
            )
        },
        DecisionVector {
            protocol: Some("p"),
            protocol_path: Some("thread/reply/like"),
            ..write(
                "path_scope_child_path",
                records(Method::Write).protocol("p").protocol_path("thread/reply"),
                false,
            )
        },
        DecisionVector {
            schema: Some("https://schema.example/photo"),
            ..write(
                "schema_scope_match",
                records(Method::Write).schema("https://schema.example/photo"),
                true,
            )
        },
        DecisionVector {
            schema: Some("https://schema.example/note"),
            ..write(
                "schema_scope_other_schema",
                records(Method::Write).schema("https://schema.example/photo"),
                false,
            )
        },
        DecisionVector {
            protocol: Some("anything"),
            context_id: Some("c"),
            ..write("unrestricted_records_scope", records(Method::Write), true)
        },
        DecisionVector {
            method: Method::Read,
            ..write("method_mismatch", records(Method::Write), false)
        },
        DecisionVector {
            interface: Interface::Protocols,
            method: Method::Query,
            ..write(
                "generic_scope_match",
                ScopeFields::new(Interface::Protocols, Method::Query),
                true,
            )
        },
        DecisionVector {
            interface: Interface::Protocols,
            method: Method::Configure,
            ..write(
                "generic_scope_other_method",
                ScopeFields::new(Interface::Protocols, Method::Query),
                false,
            )
        },
    ]
}

/// Scope field combinations that must be rejected, with the expected error.
pub fn invalid_scopes() -> Vec<(&'static str, ScopeFields, ScopeError)> {
    vec![
        (
            "protocol_and_schema",
            records(Method::Write).protocol("p").schema("s"),
            ScopeError::ProtocolAndSchema,
        ),
        (
            "context_and_path",
            records(Method::Read).protocol("p").context_id("c").protocol_path("a"),
            ScopeError::ContextIdAndProtocolPath,
        ),
        (
            "context_without_protocol",
            records(Method::Read).context_id("c"),
            ScopeError::ContextIdWithoutProtocol,
        ),
        (
            "path_without_protocol",
            records(Method::Read).protocol_path("a"),
            ScopeError::ProtocolPathWithoutProtocol,
        ),
        (
            "qualifier_on_generic",
            ScopeFields::new(Interface::Protocols, Method::Query).protocol("p"),
            ScopeError::QualifierOnGenericScope {
                interface: Interface::Protocols,
                method: Method::Query,
                field: "protocol",
            },
        ),
        (
            "empty_protocol",
            records(Method::Write).protocol(""),
            ScopeError::EmptyQualifier("protocol"),
        ),
    ]
}

impl DecisionVector {
    /// The operation this vector describes.
    pub fn action(&self) -> Action {
        let mut action = Action::new(VECTOR_OWNER, self.interface, self.method);
        action.record.protocol = self.protocol.map(String::from);
        action.record.context_id = self.context_id.map(String::from);
        action.record.protocol_path = self.protocol_path.map(String::from);
        action.record.schema = self.schema.map(String::from);
        action
    }

    /// Evaluate the vector. Errors if its scope is not valid.
    pub fn evaluate(&self) -> Result<bool, ScopeError> {
        let scope = PermissionScope::try_from(self.scope.clone())?;
        Ok(matches(&scope, &self.action()))
    }
}

/// Evaluate every vector, reporting `(name, passed)`.
pub fn verify_all_vectors() -> Vec<(&'static str, bool)> {
    all_vectors()
        .iter()
        .map(|v| (v.name, v.evaluate() == Ok(v.expected)))
        .collect()
}

/// The vectors as pretty JSON, for sharing with other implementations.
pub fn vectors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&all_vectors())
}
