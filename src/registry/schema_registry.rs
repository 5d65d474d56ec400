use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::ResourceMeta;
use crate::resource::ResourceTyped;

// -----------------------------------------------------------------------------
// SchemaRegistry

/// The lookup from domain-type name to its [`ResourceMeta`].
///
/// A registry is built once at process/library initialization from the
/// discovery mechanism's output and is read-only afterwards. A missing entry
/// for a type encountered during serialize/deserialize is a hard
/// `SchemaNotFound` error, never recovered from: it means a caller is
/// operating on an unregistered domain type.
///
/// # Example
///
/// ```
/// use jsonapi_graph::registry::SchemaRegistry;
///
/// let registry = SchemaRegistry::new();
/// assert!(registry.get("person").is_none());
/// ```
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    table: HashMap<&'static str, ResourceMeta>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Registers the domain type `T` if its type name is not yet present.
    ///
    /// This also recursively registers `T`'s relationship dependencies via
    /// [`ResourceTyped::register_dependencies`]; mutually-referencing types
    /// terminate because an already-present name is never re-entered.
    pub fn register<T: ResourceTyped>(&mut self) {
        if self.try_insert_meta(ResourceMeta::of::<T>()) {
            T::register_dependencies(self);
        }
    }

    /// Try add or do nothing.
    ///
    /// - If the entry's type name is already registered, does nothing and
    ///   returns `false` (the first registration wins).
    /// - Otherwise inserts the entry and returns `true`.
    ///
    /// This method does _not_ register type dependencies; use
    /// [`register`](Self::register) for that.
    pub fn try_insert_meta(&mut self, meta: ResourceMeta) -> bool {
        match self.table.entry(meta.type_name()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(meta);
                true
            }
        }
    }

    /// Whether the given type name has been registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.table.contains_key(type_name)
    }

    /// Returns the entry registered for the given type name, if any.
    pub fn get(&self, type_name: &str) -> Option<&ResourceMeta> {
        self.table.get(type_name)
    }

    /// The number of registered types.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterates the registered entries in arbitrary order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ResourceMeta> {
        self.table.values()
    }

    /// Registers every resource declared via
    /// [`submit_resource!`](crate::submit_resource), including each one's
    /// dependencies. Repeated calls are cheap and never insert duplicates.
    ///
    /// Returns `true` if collected registration is available; with the
    /// `auto_register` feature disabled this is a no-op returning `false`.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&mut self) -> bool {
        for entry in inventory::iter::<AutoRegisteredResource> {
            (entry.register)(self);
        }
        true
    }

    /// Registers every resource declared via
    /// [`submit_resource!`](crate::submit_resource). The `auto_register`
    /// feature is disabled, so this is a no-op returning `false`.
    #[cfg(not(feature = "auto_register"))]
    #[inline(always)]
    pub fn auto_register(&mut self) -> bool {
        false
    }
}

// -----------------------------------------------------------------------------
// SchemaRegistryArc

/// A shared, lockable handle to a [`SchemaRegistry`].
///
/// The intended lifecycle is write-then-publish: build the registry through
/// [`write`](Self::write) during initialization, then hand out clones for
/// concurrent [`read`](Self::read) access. The lock exists for the build
/// step, not for steady-state mutation.
#[derive(Clone, Default)]
pub struct SchemaRegistryArc {
    /// The wrapped [`SchemaRegistry`].
    pub internal: Arc<RwLock<SchemaRegistry>>,
}

impl SchemaRegistryArc {
    /// Takes a read lock on the underlying [`SchemaRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, SchemaRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`SchemaRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, SchemaRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for SchemaRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set()
            .entries(
                self.internal
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .table
                    .keys(),
            )
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Auto registration

/// A registration hook collected by [`submit_resource!`](crate::submit_resource).
#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub struct AutoRegisteredResource {
    register: fn(&mut SchemaRegistry),
}

#[cfg(feature = "auto_register")]
impl AutoRegisteredResource {
    pub const fn new<T: ResourceTyped>() -> Self {
        Self {
            register: SchemaRegistry::register::<T>,
        }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(AutoRegisteredResource);

/// Declares a domain type for collected registration, so that any registry
/// can pick it up with [`SchemaRegistry::auto_register`].
///
/// ```ignore
/// submit_resource!(Person);
///
/// let mut registry = SchemaRegistry::new();
/// registry.auto_register();
/// assert!(registry.contains("person"));
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_resource {
    ($ty:ty) => {
        $crate::__private::inventory::submit! {
            $crate::registry::AutoRegisteredResource::new::<$ty>()
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Dog, Person};

    #[test]
    fn register_pulls_in_dependencies() {
        let mut registry = SchemaRegistry::new();
        registry.register::<Person>();

        // Person references Dog, and Dog references Person back; both land
        // exactly once.
        assert!(registry.contains("person"));
        assert!(registry.contains("dog"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = SchemaRegistry::new();
        assert!(registry.try_insert_meta(ResourceMeta::of::<Dog>()));
        assert!(!registry.try_insert_meta(ResourceMeta::of::<Dog>()));

        // An already-present name is never re-entered, so dependencies of a
        // re-registered type are not pulled in either.
        registry.register::<Dog>();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_misses_return_none() {
        let registry = SchemaRegistry::new();
        assert!(registry.get("person").is_none());
        assert!(!registry.contains("person"));
    }

    #[test]
    fn arc_handle_builds_then_reads() {
        let shared = SchemaRegistryArc::default();
        shared.write().register::<Person>();
        assert!(shared.read().contains("dog"));
        assert!(format!("{shared:?}").contains("person"));
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_register_collects_submitted_types() {
        let mut registry = SchemaRegistry::new();
        assert!(registry.auto_register());
        assert!(registry.contains("person"));
        assert!(registry.contains("dog"));
    }
}
