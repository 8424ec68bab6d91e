//! Grant conditions and their enforcement.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ConditionViolation;

/// Whether a message written under a grant must or must not be public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Publication {
    Required,
    Prohibited,
}

/// Additional constraints a message must satisfy to be covered by a grant.
///
/// An absent field leaves that aspect unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionConditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication: Option<Publication>,
}

impl PermissionConditions {
    /// Conditions with a publication requirement.
    pub fn publication(publication: Publication) -> Self {
        Self {
            publication: Some(publication),
        }
    }
}

/// Check an action against a grant's conditions.
pub fn enforce(
    conditions: Option<&PermissionConditions>,
    action: &Action,
) -> Result<(), ConditionViolation> {
    let Some(conditions) = conditions else {
        return Ok(());
    };

    match conditions.publication {
        Some(Publication::Required) if !action.is_public => {
            Err(ConditionViolation::PublicationRequired)
        }
        Some(Publication::Prohibited) if action.is_public => {
            Err(ConditionViolation::PublicationProhibited)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palisade_core::{Interface, Method};

    fn write(is_public: bool) -> Action {
        Action::new("did:ex:alice", Interface::Records, Method::Write).public(is_public)
    }

    #[test]
    fn test_publication_required() {
        let cond = PermissionConditions::publication(Publication::Required);

        assert_eq!(
            enforce(Some(&cond), &write(false)),
            Err(ConditionViolation::PublicationRequired)
        );
        assert_eq!(enforce(Some(&cond), &write(true)), Ok(()));
    }

    #[test]
    fn test_publication_prohibited() {
        let cond = PermissionConditions::publication(Publication::Prohibited);

        assert_eq!(
            enforce(Some(&cond), &write(true)),
            Err(ConditionViolation::PublicationProhibited)
        );
        assert_eq!(enforce(Some(&cond), &write(false)), Ok(()));
    }

    #[test]
    fn test_absent_conditions_always_pass() {
        for public in [true, false] {
            assert_eq!(enforce(None, &write(public)), Ok(()));
            assert_eq!(
                enforce(Some(&PermissionConditions::default()), &write(public)),
                Ok(())
            );
        }
    }

    #[test]
    fn test_empty_conditions_encode_as_empty_object() {
        let json = serde_json::to_string(&PermissionConditions::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
