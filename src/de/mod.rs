//! Deserialization: [`Document`] → domain graph.
//!
//! Reconstructs a nested entity graph from a flat, possibly-incomplete,
//! possibly-malformed resource list. Each relationship reference is resolved
//! against an index over `data` ∪ `included`; references that cannot be
//! resolved do not fail the call — the affected field is left absent and a
//! non-fatal [`Diagnostic`] is recorded, so callers can consume payloads
//! whose relationships are only partially satisfied.
//!
//! Fatal conditions (wrong root type, unregistered type, malformed attribute
//! payload, missing primary data) abort the call with a typed
//! [`DeserializeError`].

use std::collections::HashMap;
use std::rc::Rc;

use crate::access::{Deserialized, DeserializedList};
use crate::document::{Document, IdentifierData, PrimaryData, ResourceIdentifier, ResourceObject};
use crate::error::{DeserializeError, Diagnostic};
use crate::registry::{RelationField, SchemaRegistry};
use crate::resource::{Entity, Relation, ResourceTyped};

// -----------------------------------------------------------------------------
// Deserializer

/// Deserializer for JSON:API documents.
///
/// Borrows the registry only; each call builds its own resolution index and
/// diagnostics, so separate calls never share mutable state.
///
/// # Example
///
/// ```ignore
/// let document: Document = serde_json::from_slice(&bytes)?;
/// let person = Deserializer::new(&registry).one::<Person>(document)?;
/// assert!(person.diagnostics().is_empty());
/// ```
pub struct Deserializer<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Deserializer<'a> {
    /// Creates a deserializer over the given registry.
    #[inline]
    pub const fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Reconstructs the single primary entity of a document.
    ///
    /// The primary resource's `type` is checked against `T`'s schema before
    /// any attribute is decoded; a mismatch fails with
    /// [`DeserializeError::TypeMismatch`] and no partial recovery.
    pub fn one<T: ResourceTyped>(
        &self,
        document: Document,
    ) -> Result<Deserialized<T>, DeserializeError> {
        let expected = T::type_schema().type_name;
        let (entity, diagnostics) = {
            let object = match &document.data {
                None => return Err(DeserializeError::MissingPrimaryData),
                Some(PrimaryData::Many(_)) => return Err(DeserializeError::ExpectedSingleResource),
                Some(PrimaryData::One(object)) => object,
            };
            expect_type(object, expected)?;

            let mut resolver = Resolver::new(self.registry, &document);
            let entity = resolver.build(object)?;
            (entity, resolver.diagnostics)
        };

        Ok(Deserialized::single(
            document,
            downcast_root::<T>(entity),
            diagnostics,
        ))
    }

    /// Reconstructs every primary entity of an array document.
    ///
    /// Every element is type-checked before anything is decoded. Entities
    /// shared between elements (directly or via `included`) resolve to the
    /// same instance.
    pub fn many<T: ResourceTyped>(
        &self,
        document: Document,
    ) -> Result<DeserializedList<T>, DeserializeError> {
        let expected = T::type_schema().type_name;
        let (entities, diagnostics) = {
            let objects = match &document.data {
                None => return Err(DeserializeError::MissingPrimaryData),
                Some(PrimaryData::One(_)) => {
                    return Err(DeserializeError::ExpectedResourceCollection);
                }
                Some(PrimaryData::Many(objects)) => objects,
            };
            for object in objects {
                expect_type(object, expected)?;
            }

            let mut resolver = Resolver::new(self.registry, &document);
            let mut entities = Vec::with_capacity(objects.len());
            for object in objects {
                entities.push(downcast_root::<T>(resolver.build(object)?));
            }
            (entities, resolver.diagnostics)
        };

        Ok(DeserializedList::new(document, entities, diagnostics))
    }

    /// Type-erased reconstruction of the primary entity or entities, for
    /// callers that select the root type by name at runtime.
    ///
    /// Returns the entities in primary-data order together with the
    /// accumulated non-fatal diagnostics.
    pub fn resolve(
        &self,
        document: &Document,
        expected_type: &str,
    ) -> Result<(Vec<Entity>, Vec<Diagnostic>), DeserializeError> {
        let data = document
            .data
            .as_ref()
            .ok_or(DeserializeError::MissingPrimaryData)?;
        for object in data.iter() {
            expect_type(object, expected_type)?;
        }

        let mut resolver = Resolver::new(self.registry, document);
        let mut entities = Vec::new();
        for object in data.iter() {
            entities.push(resolver.build(object)?);
        }
        Ok((entities, resolver.diagnostics))
    }
}

/// Reconstructs the single primary entity of a document. Convenience for
/// [`Deserializer::one`].
pub fn from_document<T: ResourceTyped>(
    document: Document,
    registry: &SchemaRegistry,
) -> Result<Deserialized<T>, DeserializeError> {
    Deserializer::new(registry).one::<T>(document)
}

fn expect_type(object: &ResourceObject, expected: &str) -> Result<(), DeserializeError> {
    if object.ty == expected {
        Ok(())
    } else {
        Err(DeserializeError::TypeMismatch {
            expected: expected.to_owned(),
            actual: object.ty.clone(),
        })
    }
}

// The resolver only builds entities through the meta registered for the
// expected type name, so a failing downcast means the registry maps that name
// to a different Rust type than the caller's `T`. That is registry
// misconfiguration, not document data, hence the panic.
fn downcast_root<T: ResourceTyped>(entity: Entity) -> Rc<T> {
    let type_name = T::type_schema().type_name;
    entity.into_any_rc().downcast::<T>().unwrap_or_else(|_| {
        panic!("resource type `{type_name}` is registered for a different Rust type")
    })
}

// -----------------------------------------------------------------------------
// Resolver

// Per-call resolution state: the first-wins `(type, id)` index over the
// document's resource objects, the entities built so far, and the non-fatal
// diagnostics collected along the way.
struct Resolver<'d> {
    registry: &'d SchemaRegistry,
    index: HashMap<(&'d str, &'d str), &'d ResourceObject>,
    built: HashMap<ResourceIdentifier, Entity>,
    diagnostics: Vec<Diagnostic>,
}

impl<'d> Resolver<'d> {
    fn new(registry: &'d SchemaRegistry, document: &'d Document) -> Self {
        let mut index = HashMap::new();

        // Primary data first, then `included`, first occurrence winning on
        // duplicate keys: a duplicate of the root inside `included` can never
        // shadow the root, and repeated `included` entries resolve
        // deterministically.
        let objects = document
            .data
            .iter()
            .flat_map(PrimaryData::iter)
            .chain(document.included.iter());
        for object in objects {
            index
                .entry((object.ty.as_str(), object.id.as_str()))
                .or_insert(object);
        }

        Self {
            registry,
            index,
            built: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    // Builds the entity for a resource object, decoding its attributes and
    // recursively resolving its relationships. Re-entrant references are
    // satisfied from `built`, which the entity is published to *before* its
    // relationships are wired — that substitution is what makes reference
    // cycles constructible.
    fn build(&mut self, object: &'d ResourceObject) -> Result<Entity, DeserializeError> {
        let identifier = object.identifier();
        if let Some(existing) = self.built.get(&identifier) {
            return Ok(existing.clone());
        }

        let meta = self
            .registry
            .get(&object.ty)
            .ok_or_else(|| DeserializeError::SchemaNotFound(object.ty.clone()))?;

        let entity = meta
            .from_attributes(&object.id, &object.attributes)
            .map_err(|source| DeserializeError::AttributeDecode {
                identifier: identifier.clone(),
                source,
            })?;
        self.built.insert(identifier, entity.clone());

        let schema = meta.schema();
        for field in schema.has_one {
            let value = match relationship_data(object, field.field) {
                Some(IdentifierData::One(target)) => self.resolve_reference(field, target)?,
                // Absent relationship, `data: null`, or an array where the
                // schema declares has-one: the field stays absent.
                _ => None,
            };
            meta.set_relation(&*entity, field.field, Relation::One(value));
        }
        for field in schema.has_many {
            let mut related = Vec::new();
            if let Some(IdentifierData::Many(targets)) = relationship_data(object, field.field) {
                for target in targets {
                    // Unresolved entries are skipped; resolved entries keep
                    // the input array's order.
                    if let Some(entity) = self.resolve_reference(field, target)? {
                        related.push(entity);
                    }
                }
            }
            meta.set_relation(&*entity, field.field, Relation::Many(related));
        }

        Ok(entity)
    }

    // Resolves one identifier to an entity, or records a `MissingRelated`
    // diagnostic and yields `None`. Errors are reserved for fatal conditions
    // in the referenced object itself.
    fn resolve_reference(
        &mut self,
        field: &RelationField,
        target: &'d ResourceIdentifier,
    ) -> Result<Option<Entity>, DeserializeError> {
        if target.ty != field.related_type {
            self.diagnostics
                .push(Diagnostic::missing_related(field.field, target));
            return Ok(None);
        }
        if let Some(existing) = self.built.get(target) {
            return Ok(Some(existing.clone()));
        }
        match self
            .index
            .get(&(target.ty.as_str(), target.id.as_str()))
            .copied()
        {
            Some(object) => self.build(object).map(Some),
            None => {
                self.diagnostics
                    .push(Diagnostic::missing_related(field.field, target));
                Ok(None)
            }
        }
    }
}

fn relationship_data<'d>(object: &'d ResourceObject, field: &str) -> Option<&'d IdentifierData> {
    object
        .relationships
        .get(field)
        .and_then(|relationship| relationship.data.as_ref())
}
