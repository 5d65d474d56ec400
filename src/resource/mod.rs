//! The seam between domain types and the document transformation.
//!
//! [`Resource`] is the object-safe view the serializer walks; [`ResourceTyped`]
//! is the statically-known side the deserializer constructs through the
//! registry's vtable. Implementations of both are the output of the build-time
//! schema-discovery mechanism, which is outside this crate; the
//! [`testing`](crate::testing) domain shows the exact shape such generated
//! code takes.
//!
//! Relationship fields on domain types use the cell types in this module
//! ([`HasOne`], [`HasMany`], [`BackRef`]) so the deserializer can wire edges
//! after an entity is constructed, and so reference cycles are closed with a
//! weak back-reference instead of an ownership cycle.

mod fields;

pub use fields::{BackRef, HasMany, HasOne};

use core::any::Any;
use core::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::document::ResourceIdentifier;
use crate::registry::{ResourceSchema, SchemaRegistry};

// -----------------------------------------------------------------------------
// Entity

/// A shared handle to a domain entity of erased concrete type.
///
/// Entities have no inherent identity beyond their `(type, id)` pair; the
/// handle exists so one entity instance can be reached through multiple
/// relationship paths.
pub type Entity = Rc<dyn Resource>;

// -----------------------------------------------------------------------------
// Resource

/// The object-safe view of a domain entity.
///
/// The serializer traverses the entity graph exclusively through this trait:
/// the schema says which relationship fields exist, [`relation`](Resource::relation)
/// yields the referenced entities, and
/// [`encode_attributes`](Resource::encode_attributes) produces the opaque
/// attribute payload via the value codec.
pub trait Resource: Any {
    /// The static schema of this entity's domain type.
    fn schema(&self) -> &'static ResourceSchema;

    /// The resource id.
    fn resource_id(&self) -> String;

    /// Encodes the schema-declared attribute fields. Relationship fields are
    /// never part of the payload.
    fn encode_attributes(&self) -> Result<Map<String, Value>, serde_json::Error>;

    /// Returns the current value of the named relationship field, or `None`
    /// if the field is not a relationship of this type.
    fn relation(&self, field: &str) -> Option<Relation>;

    fn as_any(&self) -> &dyn Any;

    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl dyn Resource {
    /// The `(type, id)` identifier of this entity.
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.schema().type_name, self.resource_id())
    }
}

// -----------------------------------------------------------------------------
// ResourceTyped

/// The statically-known side of a domain type, registered into the
/// [`SchemaRegistry`](crate::registry::SchemaRegistry).
///
/// The deserializer never names concrete domain types; it reaches these hooks
/// through the monomorphized vtable stored in
/// [`ResourceMeta`](crate::registry::ResourceMeta).
pub trait ResourceTyped: Resource + Sized {
    /// The static schema produced by the discovery mechanism.
    fn type_schema() -> &'static ResourceSchema;

    /// Constructs an instance from a resource object's id and attribute
    /// payload. Relationship fields start out absent/empty; the deserializer
    /// wires them afterwards through [`set_relation`](Self::set_relation).
    fn from_attributes(id: &str, attributes: &Map<String, Value>)
    -> Result<Self, serde_json::Error>;

    /// Stores a resolved relationship value into the named field.
    ///
    /// Takes `&self`: relationship fields are interior-mutable cells so that
    /// edges can be wired after the entity has been published to the
    /// resolution index (which is what makes cyclic graphs constructible).
    fn set_relation(&self, field: &str, value: Relation);

    /// Registers the related domain types this type references.
    fn register_dependencies(_registry: &mut SchemaRegistry) {}
}

// -----------------------------------------------------------------------------
// Relation

/// The value of one relationship field, read from or written to a domain
/// entity.
#[derive(Clone)]
pub enum Relation {
    /// A has-one field: at most one related entity.
    One(Option<Entity>),
    /// A has-many field: related entities in collection order.
    Many(Vec<Entity>),
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::One(None) => write!(f, "One(None)"),
            Relation::One(Some(entity)) => write!(f, "One({})", entity.identifier()),
            Relation::Many(entities) => {
                write!(f, "Many[")?;
                for (i, entity) in entities.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", entity.identifier())?;
                }
                write!(f, "]")
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Value codec helpers

/// Encodes a `Serialize` attribute projection into an attribute payload.
///
/// The projection must serialize to a JSON object.
pub fn to_attribute_map<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format_args!(
            "attribute payload must be an object, got {other}"
        ))),
    }
}

/// Decodes an attribute payload into a `Deserialize` attribute projection.
pub fn from_attribute_map<T: DeserializeOwned>(
    attributes: &Map<String, Value>,
) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(attributes.clone()))
}
