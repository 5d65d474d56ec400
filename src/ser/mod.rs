//! Serialization: domain graph → [`Document`].
//!
//! Collapses a nested (possibly cyclic) entity graph into a flat document:
//! the root entity becomes the primary `data` resource object, and every
//! transitively reachable related entity lands in `included` exactly once,
//! deduplicated by `(type, id)`. Relationships always carry identifiers, so a
//! parent cross-references a child even when the child's body was already
//! emitted earlier in the traversal (or is the root itself).
//!
//! This is a pure transform: no I/O, no shared state, cost linear in the
//! number of entities and relationship edges.

use std::collections::HashSet;

use crate::document::{Document, PrimaryData, Relationship, ResourceIdentifier, ResourceObject};
use crate::error::SerializeError;
use crate::registry::SchemaRegistry;
use crate::resource::{Entity, Relation, Resource};

// -----------------------------------------------------------------------------
// Serializer

/// Serializer for domain-entity graphs.
///
/// Borrows the registry only; each call builds its own visited-set and
/// document, so one serializer may be used for any number of calls and
/// separate calls never share mutable state.
///
/// # Example
///
/// ```ignore
/// let registry = SchemaRegistry::new();
/// // ... register domain types ...
/// let document = Serializer::new(&registry).serialize(&person)?;
/// let bytes = serde_json::to_vec(&document)?;
/// ```
pub struct Serializer<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Serializer<'a> {
    /// Creates a serializer over the given registry.
    #[inline]
    pub const fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Serializes one root entity into a single-resource document.
    ///
    /// The root is placed in `data`, never in `included`, even when another
    /// reachable entity references it relationally; such a reference is
    /// emitted as an identifier pointing back at the root.
    pub fn serialize(&self, root: &dyn Resource) -> Result<Document, SerializeError> {
        let mut visited = HashSet::new();
        let mut included = Vec::new();

        visited.insert(root.identifier());
        let object = self.emit(root, &mut visited, &mut included)?;

        Ok(Document {
            data: Some(PrimaryData::One(object)),
            included,
            ..Document::default()
        })
    }

    /// Serializes a collection of root entities into an array document.
    ///
    /// All roots go into `data` (in slice order) and none into `included`;
    /// related entities shared between roots are still emitted only once.
    pub fn serialize_slice(&self, roots: &[Entity]) -> Result<Document, SerializeError> {
        let mut visited: HashSet<ResourceIdentifier> =
            roots.iter().map(|root| root.identifier()).collect();
        let mut included = Vec::new();

        let mut objects = Vec::with_capacity(roots.len());
        for root in roots {
            objects.push(self.emit(&**root, &mut visited, &mut included)?);
        }

        Ok(Document {
            data: Some(PrimaryData::Many(objects)),
            included,
            ..Document::default()
        })
    }

    fn emit(
        &self,
        resource: &dyn Resource,
        visited: &mut HashSet<ResourceIdentifier>,
        included: &mut Vec<ResourceObject>,
    ) -> Result<ResourceObject, SerializeError> {
        let schema = resource.schema();
        if !self.registry.contains(schema.type_name) {
            return Err(SerializeError::SchemaNotFound(schema.type_name.to_owned()));
        }

        let mut object = ResourceObject::new(schema.type_name, resource.resource_id());
        object.attributes =
            resource
                .encode_attributes()
                .map_err(|source| SerializeError::AttributeEncode {
                    identifier: object.identifier(),
                    source,
                })?;

        for field in schema.has_one {
            let relationship = match resource.relation(field.field) {
                Some(Relation::One(Some(entity))) => {
                    let relationship = Relationship::to_one(entity.identifier());
                    self.reach(&entity, visited, included)?;
                    relationship
                }
                // Empty to-one keeps an explicit `data: null`.
                _ => Relationship::empty_to_one(),
            };
            object
                .relationships
                .insert(field.field.to_owned(), relationship);
        }

        for field in schema.has_many {
            let mut identifiers = Vec::new();
            if let Some(Relation::Many(entities)) = resource.relation(field.field) {
                identifiers.reserve(entities.len());
                for entity in &entities {
                    identifiers.push(entity.identifier());
                    self.reach(entity, visited, included)?;
                }
            }
            object
                .relationships
                .insert(field.field.to_owned(), Relationship::to_many(identifiers));
        }

        Ok(object)
    }

    // Emits the entity's body into `included` unless its identifier was
    // already visited; the identifier itself was recorded by the caller's
    // relationship either way. Marking before emission is what terminates
    // cycles.
    fn reach(
        &self,
        entity: &Entity,
        visited: &mut HashSet<ResourceIdentifier>,
        included: &mut Vec<ResourceObject>,
    ) -> Result<(), SerializeError> {
        if !visited.insert(entity.identifier()) {
            return Ok(());
        }
        let object = self.emit(&**entity, visited, included)?;
        included.push(object);
        Ok(())
    }
}

/// Serializes one root entity into a document. Convenience for
/// [`Serializer::serialize`].
pub fn to_document(
    root: &dyn Resource,
    registry: &SchemaRegistry,
) -> Result<Document, SerializeError> {
    Serializer::new(registry).serialize(root)
}
