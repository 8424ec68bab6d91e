//! Scope matching: does a grant's scope cover an operation.
//!
//! Pure and total over every well-formed scope and action.

use crate::action::{Action, RecordFacts};
use crate::scope::{PermissionScope, ProtocolLimit, RecordsScope, RecordsTarget};

/// Check if `scope` covers `action`.
pub fn matches(scope: &PermissionScope, action: &Action) -> bool {
    if scope.interface() != action.interface || scope.method() != action.method {
        return false;
    }

    match scope {
        PermissionScope::Generic(_) => true,
        PermissionScope::Records(records) => records_match(records, &action.record),
    }
}

fn records_match(scope: &RecordsScope, record: &RecordFacts) -> bool {
    match scope.target() {
        RecordsTarget::Any => true,
        RecordsTarget::Schema(schema) => record.schema.as_deref() == Some(schema.as_str()),
        RecordsTarget::Protocol { protocol, limit } => {
            if record.protocol.as_deref() != Some(protocol.as_str()) {
                return false;
            }

            match limit {
                None => true,
                Some(ProtocolLimit::ContextId(root)) => record
                    .context_id
                    .as_deref()
                    .is_some_and(|context_id| is_within_context(context_id, root)),
                // A path grant covers exactly one path, not the subtree below it.
                Some(ProtocolLimit::ProtocolPath(path)) => {
                    record.protocol_path.as_deref() == Some(path.as_str())
                }
            }
        }
    }
}

/// True if `context_id` is `root` or a descendant of it.
///
/// Context ids are `/`-separated; `a/bc` is not inside `a/b`.
pub fn is_within_context(context_id: &str, root: &str) -> bool {
    match context_id.strip_prefix(root) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}
