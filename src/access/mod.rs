//! Read access to document metadata after deserialization.
//!
//! Links and meta are document artifacts, not domain fields: a `Person` has a
//! name and an age, but "the URL this person was fetched from" belongs to the
//! payload that carried it. [`Deserialized`] keeps a non-owning association
//! from the reconstructed entity back to its source [`Document`] so callers
//! can read those members without the domain types knowing about them. The
//! association is deliberately not part of the entity's own equality.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::document::{Document, Links, ResourceObject};
use crate::error::Diagnostic;

// -----------------------------------------------------------------------------
// Deserialized

/// A reconstructed entity paired with the document it came from.
///
/// Produced by [`Deserializer::one`](crate::de::Deserializer::one), or as one
/// element of a [`DeserializedList`]. The entity itself is shared (`Rc`);
/// dropping this wrapper does not invalidate it.
///
/// # Example
///
/// ```ignore
/// let person = Deserializer::new(&registry).one::<Person>(document)?;
/// if let Some(links) = person.root_links() {
///     println!("fetched from {:?}", links.self_link);
/// }
/// let entity = person.into_entity();
/// ```
pub struct Deserialized<T> {
    document: Rc<Document>,
    // Index into the primary data, so list elements can address their own
    // resource object. Always 0 for a single-resource document.
    position: usize,
    entity: Rc<T>,
    diagnostics: Vec<Diagnostic>,
}

impl<T> Deserialized<T> {
    pub(crate) fn single(document: Document, entity: Rc<T>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            document: Rc::new(document),
            position: 0,
            entity,
            diagnostics,
        }
    }

    fn element(document: Rc<Document>, position: usize, entity: Rc<T>) -> Self {
        Self {
            document,
            position,
            entity,
            diagnostics: Vec::new(),
        }
    }

    /// The reconstructed entity.
    #[inline]
    pub fn entity(&self) -> &Rc<T> {
        &self.entity
    }

    /// Unwraps into the entity, dropping the document association.
    #[inline]
    pub fn into_entity(self) -> Rc<T> {
        self.entity
    }

    /// Non-fatal diagnostics accumulated while resolving relationships.
    ///
    /// For an element of a [`DeserializedList`] this is empty; the list
    /// carries the call-level diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The source document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Document-level links (`links` at the top level).
    pub fn root_links(&self) -> Option<&Links> {
        self.document.links.as_ref()
    }

    /// Links attached to this entity's own resource object.
    pub fn resource_links(&self) -> Option<&Links> {
        self.resource_object()?.links.as_ref()
    }

    /// Links attached to this entity's relationships, keyed by field name.
    /// Relationships without links are omitted.
    pub fn relationships_links(&self) -> BTreeMap<&str, &Links> {
        let Some(object) = self.resource_object() else {
            return BTreeMap::new();
        };
        object
            .relationships
            .iter()
            .filter_map(|(field, relationship)| {
                relationship.links.as_ref().map(|links| (field.as_str(), links))
            })
            .collect()
    }

    /// Decodes the document-level `meta` into `M`.
    ///
    /// Absent or undecodable meta yields `None`, never an error.
    pub fn meta<M: DeserializeOwned>(&self) -> Option<M> {
        decode_meta(self.document.meta.as_ref())
    }

    /// Decodes the `meta` of this entity's own resource object into `M`.
    ///
    /// Absent or undecodable meta yields `None`, never an error.
    pub fn resource_meta<M: DeserializeOwned>(&self) -> Option<M> {
        decode_meta(self.resource_object()?.meta.as_ref())
    }

    fn resource_object(&self) -> Option<&ResourceObject> {
        self.document.data.as_ref()?.iter().nth(self.position)
    }
}

impl<T> Clone for Deserialized<T> {
    fn clone(&self) -> Self {
        Self {
            document: Rc::clone(&self.document),
            position: self.position,
            entity: Rc::clone(&self.entity),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Deserialized<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Deserialized")
            .field("entity", &self.entity)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// DeserializedList

/// The result of deserializing a collection document: one [`Deserialized`]
/// per primary resource, in primary-data order, plus the diagnostics of the
/// whole call.
pub struct DeserializedList<T> {
    document: Rc<Document>,
    entries: Vec<Deserialized<T>>,
    diagnostics: Vec<Diagnostic>,
}

impl<T> DeserializedList<T> {
    pub(crate) fn new(document: Document, entities: Vec<Rc<T>>, diagnostics: Vec<Diagnostic>) -> Self {
        let document = Rc::new(document);
        let entries = entities
            .into_iter()
            .enumerate()
            .map(|(position, entity)| Deserialized::element(Rc::clone(&document), position, entity))
            .collect();
        Self {
            document,
            entries,
            diagnostics,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The element at `index`, in primary-data order.
    pub fn get(&self, index: usize) -> Option<&Deserialized<T>> {
        self.entries.get(index)
    }

    pub fn first(&self) -> Option<&Deserialized<T>> {
        self.entries.first()
    }

    /// Iterates the elements in primary-data order.
    pub fn iter(&self) -> core::slice::Iter<'_, Deserialized<T>> {
        self.entries.iter()
    }

    /// Iterates just the entities, without their document associations.
    pub fn entities(&self) -> impl Iterator<Item = &Rc<T>> {
        self.entries.iter().map(Deserialized::entity)
    }

    /// Non-fatal diagnostics accumulated across the whole call.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The source document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Document-level links (`links` at the top level).
    pub fn root_links(&self) -> Option<&Links> {
        self.document.links.as_ref()
    }

    /// Decodes the document-level `meta` into `M`.
    ///
    /// Absent or undecodable meta yields `None`, never an error.
    pub fn meta<M: DeserializeOwned>(&self) -> Option<M> {
        decode_meta(self.document.meta.as_ref())
    }
}

impl<'a, T> IntoIterator for &'a DeserializedList<T> {
    type Item = &'a Deserialized<T>;
    type IntoIter = core::slice::Iter<'a, Deserialized<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for DeserializedList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeserializedList")
            .field("entries", &self.entries)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

fn decode_meta<M: DeserializeOwned>(meta: Option<&Value>) -> Option<M> {
    serde_json::from_value(meta?.clone()).ok()
}
