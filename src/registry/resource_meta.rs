use core::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::ResourceSchema;
use crate::resource::{Entity, Relation, Resource, ResourceTyped};

// -----------------------------------------------------------------------------
// ResourceMeta

/// One registry entry: a domain type's static schema plus the monomorphized
/// construction hooks the deserializer reaches it through.
///
/// An instance is created with [`ResourceMeta::of`], which captures the
/// `ResourceTyped` implementation of a concrete type as plain function
/// pointers. The registry stores only these entries, so neither direction of
/// the transformation ever names a concrete domain type.
pub struct ResourceMeta {
    schema: &'static ResourceSchema,
    from_attributes: fn(&str, &Map<String, Value>) -> Result<Entity, serde_json::Error>,
    set_relation: fn(&dyn Resource, &str, Relation),
}

impl ResourceMeta {
    /// Creates the registry entry for a domain type.
    pub fn of<T: ResourceTyped>() -> Self {
        fn construct<T: ResourceTyped>(
            id: &str,
            attributes: &Map<String, Value>,
        ) -> Result<Entity, serde_json::Error> {
            T::from_attributes(id, attributes).map(|value| Rc::new(value) as Entity)
        }

        fn wire<T: ResourceTyped>(resource: &dyn Resource, field: &str, value: Relation) {
            // The resolver only hands out entities built by `construct::<T>`,
            // so the downcast holds whenever the registry is consistent.
            if let Some(concrete) = resource.as_any().downcast_ref::<T>() {
                concrete.set_relation(field, value);
            }
        }

        Self {
            schema: T::type_schema(),
            from_attributes: construct::<T>,
            set_relation: wire::<T>,
        }
    }

    /// The static schema of the registered type.
    #[inline]
    pub const fn schema(&self) -> &'static ResourceSchema {
        self.schema
    }

    /// The registered resource type name.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.schema.type_name
    }

    /// Constructs an entity from a resource object's id and attributes, with
    /// all relationship fields absent/empty.
    pub(crate) fn from_attributes(
        &self,
        id: &str,
        attributes: &Map<String, Value>,
    ) -> Result<Entity, serde_json::Error> {
        (self.from_attributes)(id, attributes)
    }

    /// Stores a resolved relationship value into the named field of an entity
    /// of the registered type.
    pub(crate) fn set_relation(&self, resource: &dyn Resource, field: &str, value: Relation) {
        (self.set_relation)(resource, field, value);
    }
}

impl fmt::Debug for ResourceMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceMeta")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
