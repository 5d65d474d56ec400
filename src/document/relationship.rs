use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Links, ResourceIdentifier};

// -----------------------------------------------------------------------------
// IdentifierData

/// The `data` member of a relationship: one identifier (has-one) or an ordered
/// sequence of identifiers (has-many).
///
/// Order in the `Many` case is significant; it mirrors the domain collection's
/// iteration order on output and the JSON array order on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentifierData {
    /// `"data": [ {"type": ..., "id": ...}, ... ]`
    Many(Vec<ResourceIdentifier>),
    /// `"data": {"type": ..., "id": ...}`
    One(ResourceIdentifier),
}

// -----------------------------------------------------------------------------
// Relationship

/// A named reference from one resource object to others, expressed as
/// identifiers rather than embedded bodies.
///
/// A to-one relationship with no related entity keeps an explicit
/// `"data": null` on the wire, which is distinct from the relationship being
/// absent altogether.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// The referenced identifier(s); `None` encodes `"data": null`.
    pub data: Option<IdentifierData>,

    /// Relationship-level links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,

    /// Relationship-level meta, stored opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Relationship {
    /// A to-one relationship with no related entity (`"data": null`).
    pub fn empty_to_one() -> Self {
        Self::default()
    }

    /// A to-one relationship referencing a single identifier.
    pub fn to_one(identifier: ResourceIdentifier) -> Self {
        Self {
            data: Some(IdentifierData::One(identifier)),
            ..Self::default()
        }
    }

    /// A to-many relationship referencing identifiers in collection order.
    pub fn to_many(identifiers: Vec<ResourceIdentifier>) -> Self {
        Self {
            data: Some(IdentifierData::Many(identifiers)),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_data_round_trips_as_empty_to_one() {
        let relationship: Relationship = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert_eq!(relationship, Relationship::empty_to_one());
        assert_eq!(
            serde_json::to_string(&relationship).unwrap(),
            r#"{"data":null}"#
        );
    }

    #[test]
    fn one_and_many_are_distinguished_by_shape() {
        let one: Relationship =
            serde_json::from_str(r#"{"data":{"type":"dog","id":"1"}}"#).unwrap();
        assert_eq!(one, Relationship::to_one(ResourceIdentifier::new("dog", "1")));

        let many: Relationship =
            serde_json::from_str(r#"{"data":[{"type":"dog","id":"2"}]}"#).unwrap();
        assert_eq!(
            many,
            Relationship::to_many(vec![ResourceIdentifier::new("dog", "2")])
        );

        let empty: Relationship = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert_eq!(empty, Relationship::to_many(Vec::new()));
    }
}
