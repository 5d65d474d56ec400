//! The typed representation of a JSON:API payload.
//!
//! These types are the shared intermediate representation between the
//! domain-object graph and the wire bytes: the [`Serializer`](crate::ser::Serializer)
//! produces a [`Document`], the [`Deserializer`](crate::de::Deserializer)
//! consumes one, and an external JSON codec (`serde_json`) moves documents to
//! and from bytes without either side depending on generated code.
//!
//! Field names and nesting follow the JSON:API document structure exactly so
//! that encoded output is bit-compatible with any JSON:API-consuming service.

mod error_object;
mod identifier;
mod links;
mod relationship;
mod resource_object;

pub use error_object::ErrorObject;
pub use identifier::ResourceIdentifier;
pub use links::Links;
pub use relationship::{IdentifierData, Relationship};
pub use resource_object::ResourceObject;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// -----------------------------------------------------------------------------
// PrimaryData

/// The top-level `data` member: a single resource object or an ordered
/// collection of them.
///
/// An error-only document carries no primary data at all; that case is
/// represented as `Option<PrimaryData>` on [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    /// `"data": [ ... ]`
    Many(Vec<ResourceObject>),
    /// `"data": { ... }`
    One(ResourceObject),
}

impl PrimaryData {
    /// Iterates the primary resource objects regardless of cardinality.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceObject> {
        match self {
            PrimaryData::Many(objects) => objects.iter(),
            PrimaryData::One(object) => core::slice::from_ref(object).iter(),
        }
    }
}

// -----------------------------------------------------------------------------
// Document

/// A complete JSON:API document.
///
/// `data` holds the primary resource(s), `included` the flat deduplicated set
/// of related resource objects reachable from them. A document is constructed
/// fresh per serialize/deserialize call and never mutated concurrently once
/// handed to a caller.
///
/// Input documents are not required to keep `included` free of duplicates;
/// the deserializer resolves duplicate `(type, id)` entries deterministically
/// (first occurrence wins). Serialized output always carries each reachable
/// resource exactly once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The primary resource object(s). Absent on error-only documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,

    /// Related resource objects referenced (transitively) from `data`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,

    /// Error objects, stored pass-through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorObject>>,

    /// Document-level links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,

    /// Document-level meta, kept opaque until a caller decodes it via
    /// [`Deserialized::meta`](crate::access::Deserialized::meta).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Document {
    /// Returns the single primary resource object, if `data` holds exactly one.
    pub fn primary(&self) -> Option<&ResourceObject> {
        match &self.data {
            Some(PrimaryData::One(object)) => Some(object),
            _ => None,
        }
    }
}
