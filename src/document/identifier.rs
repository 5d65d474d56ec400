use core::fmt;

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// ResourceIdentifier

/// The `(type, id)` pair uniquely referencing a resource object within a
/// document.
///
/// This is the atomic cross-reference unit: relationships carry identifiers,
/// never embedded resource bodies, and equality/hashing over the pair is the
/// deduplication key across an entire document.
///
/// # Examples
///
/// ```
/// use jsonapi_graph::document::ResourceIdentifier;
///
/// let a = ResourceIdentifier::new("dog", "1");
/// let b: ResourceIdentifier = serde_json::from_str(r#"{"type":"dog","id":"1"}"#).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// The resource type name.
    #[serde(rename = "type")]
    pub ty: String,
    /// The resource id.
    pub id: String,
}

impl ResourceIdentifier {
    /// Creates an identifier from a type name and id.
    pub fn new(ty: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ty, self.id)
    }
}
