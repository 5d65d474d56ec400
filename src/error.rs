//! Typed failure values produced by the serializer and deserializer.
//!
//! Fatal kinds abort the current call and surface to the immediate caller;
//! [`Diagnostic`]s are non-fatal, accumulated during deserialization, and
//! returned alongside the best-effort result so callers decide whether a
//! partially-satisfied relationship graph is acceptable for their use case.

use thiserror::Error;

use crate::document::ResourceIdentifier;

// -----------------------------------------------------------------------------
// SerializeError

/// An error outcome of serializing a domain graph into a document.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// An entity of an unregistered domain type was reached during traversal.
    ///
    /// Not recoverable: it indicates the caller is operating on a domain type
    /// the registry was never built with.
    #[error("no schema registered for resource type `{0}`")]
    SchemaNotFound(String),

    /// The value codec failed to encode an entity's attribute payload.
    #[error("failed to encode attributes of `{identifier}`")]
    AttributeEncode {
        identifier: ResourceIdentifier,
        #[source]
        source: serde_json::Error,
    },
}

// -----------------------------------------------------------------------------
// DeserializeError

/// A fatal error outcome of reconstructing a domain graph from a document.
///
/// Unresolvable relationship references are deliberately *not* in this enum;
/// they are reported as [`Diagnostic`]s next to the successfully-built result.
#[derive(Debug, Error)]
pub enum DeserializeError {
    /// The primary resource's `type` does not equal the expected root type.
    ///
    /// Raised before any attribute decoding; no partial recovery is attempted.
    #[error("expected root resource of type `{expected}`, found `{actual}`")]
    TypeMismatch { expected: String, actual: String },

    /// A resource object's type has no registered schema.
    #[error("no schema registered for resource type `{0}`")]
    SchemaNotFound(String),

    /// The value codec failed to decode a resource object's attribute payload.
    #[error("failed to decode attributes of `{identifier}`")]
    AttributeDecode {
        identifier: ResourceIdentifier,
        #[source]
        source: serde_json::Error,
    },

    /// The document carries no primary `data` at all.
    #[error("document has no primary data")]
    MissingPrimaryData,

    /// The primary data is a collection, but a single resource was requested.
    #[error("expected a single primary resource, found a collection")]
    ExpectedSingleResource,

    /// The primary data is a single resource, but a collection was requested.
    #[error("expected a primary resource collection, found a single resource")]
    ExpectedResourceCollection,
}

// -----------------------------------------------------------------------------
// Diagnostic

/// A non-fatal condition observed while reconstructing a domain graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A relationship referenced an identifier that could not be resolved
    /// against the document's `data` ∪ `included` set (or whose type does not
    /// match the field's declared related type).
    ///
    /// The affected has-one field is left absent; the affected has-many entry
    /// is skipped.
    MissingRelated {
        /// The relationship field on the referencing resource.
        field: String,
        /// The identifier that failed to resolve.
        identifier: ResourceIdentifier,
    },
}

impl Diagnostic {
    pub(crate) fn missing_related(field: &str, identifier: &ResourceIdentifier) -> Self {
        Diagnostic::MissingRelated {
            field: field.to_owned(),
            identifier: identifier.clone(),
        }
    }
}
