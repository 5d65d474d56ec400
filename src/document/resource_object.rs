use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Links, Relationship, ResourceIdentifier};

// -----------------------------------------------------------------------------
// ResourceObject

/// One resource object: the JSON:API unit representing a single entity
/// instance.
///
/// A resource object never embeds another resource object; related entities
/// appear only as [`ResourceIdentifier`]s inside [`Relationship`] values. That
/// invariant is what makes flattening into `included` and deduplication by
/// `(type, id)` possible.
///
/// The `attributes` payload is opaque structured data, not domain-typed; the
/// registry's value codec decodes it into concrete field values. Relationship
/// fields never appear inside `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    /// The resource type name.
    #[serde(rename = "type")]
    pub ty: String,

    /// The resource id.
    pub id: String,

    /// Schema-declared plain attributes, serialized by the value codec.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,

    /// Relationship-field-name → relationship reference(s).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,

    /// Resource-level links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,

    /// Resource-level meta, stored opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ResourceObject {
    /// Creates an empty resource object for the given type and id.
    pub fn new(ty: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    /// The `(type, id)` identifier of this resource object.
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.ty.clone(), self.id.clone())
    }
}
