//! Interior-mutable relationship cells for domain types.
//!
//! The deserializer constructs every entity from its attributes first and
//! wires relationship edges afterwards, so relationship fields must be
//! assignable through a shared reference. Forward edges use the strong cells
//! [`HasOne`] / [`HasMany`]; an edge that would otherwise close an ownership
//! cycle uses the weak [`BackRef`] cell.

use core::cell::RefCell;
use core::fmt;
use std::rc::{Rc, Weak};

use super::{Entity, Relation, Resource};

fn downcast<T: Resource>(entity: Entity) -> Option<Rc<T>> {
    entity.into_any_rc().downcast::<T>().ok()
}

// Shared Debug body for the to-one cells: print the target identifier, never
// the target itself, so cyclic graphs can be formatted.
macro_rules! fmt_by_identifier {
    ($name:literal) => {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self.get() {
                Some(entity) => write!(
                    f,
                    concat!($name, "({})"),
                    (entity.as_ref() as &dyn Resource).identifier()
                ),
                None => write!(f, concat!($name, "(None)")),
            }
        }
    };
}

// -----------------------------------------------------------------------------
// HasOne

/// A has-one relationship field holding a strong reference.
pub struct HasOne<T: Resource> {
    slot: RefCell<Option<Rc<T>>>,
}

impl<T: Resource> HasOne<T> {
    /// A field with no related entity.
    pub fn empty() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }

    pub fn new(value: Option<Rc<T>>) -> Self {
        Self {
            slot: RefCell::new(value),
        }
    }

    /// The related entity, if any.
    pub fn get(&self) -> Option<Rc<T>> {
        self.slot.borrow().clone()
    }

    pub fn set(&self, value: Option<Rc<T>>) {
        *self.slot.borrow_mut() = value;
    }

    /// Stores a resolved edge, dropping values of the wrong cardinality or
    /// concrete type. Called from `ResourceTyped::set_relation` hooks.
    pub fn assign(&self, value: Relation) {
        if let Relation::One(entity) = value {
            self.set(entity.and_then(downcast::<T>));
        }
    }

    /// The field's value as a type-erased [`Relation`], for
    /// `Resource::relation` hooks.
    pub fn to_relation(&self) -> Relation {
        Relation::One(self.get().map(|entity| entity as Entity))
    }
}

impl<T: Resource> Default for HasOne<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Resource> Clone for HasOne<T> {
    fn clone(&self) -> Self {
        Self {
            slot: RefCell::new(self.get()),
        }
    }
}

impl<T: Resource + PartialEq> PartialEq for HasOne<T> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<T: Resource> fmt::Debug for HasOne<T> {
    fmt_by_identifier!("HasOne");
}

// -----------------------------------------------------------------------------
// HasMany

/// A has-many relationship field holding strong references in collection
/// order.
pub struct HasMany<T: Resource> {
    items: RefCell<Vec<Rc<T>>>,
}

impl<T: Resource> HasMany<T> {
    /// A field with no related entities.
    pub fn empty() -> Self {
        Self {
            items: RefCell::new(Vec::new()),
        }
    }

    pub fn new(items: Vec<Rc<T>>) -> Self {
        Self {
            items: RefCell::new(items),
        }
    }

    /// The related entities, in collection order.
    pub fn get(&self) -> Vec<Rc<T>> {
        self.items.borrow().clone()
    }

    pub fn set(&self, items: Vec<Rc<T>>) {
        *self.items.borrow_mut() = items;
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Stores resolved edges, dropping values of the wrong cardinality or
    /// concrete type. Called from `ResourceTyped::set_relation` hooks.
    pub fn assign(&self, value: Relation) {
        if let Relation::Many(entities) = value {
            self.set(entities.into_iter().filter_map(downcast::<T>).collect());
        }
    }

    /// The field's value as a type-erased [`Relation`], for
    /// `Resource::relation` hooks.
    pub fn to_relation(&self) -> Relation {
        Relation::Many(
            self.get()
                .into_iter()
                .map(|entity| entity as Entity)
                .collect(),
        )
    }
}

impl<T: Resource> Default for HasMany<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Resource> Clone for HasMany<T> {
    fn clone(&self) -> Self {
        Self {
            items: RefCell::new(self.get()),
        }
    }
}

impl<T: Resource + PartialEq> PartialEq for HasMany<T> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<T: Resource> fmt::Debug for HasMany<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.items.borrow();
        write!(f, "HasMany[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", (item.as_ref() as &dyn Resource).identifier())?;
        }
        write!(f, "]")
    }
}

// -----------------------------------------------------------------------------
// BackRef

/// A has-one relationship field holding a weak back-reference.
///
/// Used for the cycle-closing edge of a cyclic graph (relation + lookup, not
/// ownership): the target stays reachable only while something else owns it.
/// Equality compares `(type, id)` identity rather than value, so comparing
/// cyclic graphs terminates.
pub struct BackRef<T: Resource> {
    slot: RefCell<Option<Weak<T>>>,
}

impl<T: Resource> BackRef<T> {
    /// A field with no related entity.
    pub fn empty() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }

    /// The related entity, if it is still alive.
    pub fn get(&self) -> Option<Rc<T>> {
        self.slot.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn set(&self, value: Option<Rc<T>>) {
        *self.slot.borrow_mut() = value.map(|entity| Rc::downgrade(&entity));
    }

    /// Stores a resolved edge (weakly), dropping values of the wrong
    /// cardinality or concrete type.
    pub fn assign(&self, value: Relation) {
        if let Relation::One(entity) = value {
            self.set(entity.and_then(downcast::<T>));
        }
    }

    /// The field's value as a type-erased [`Relation`]. A dead target reads
    /// as absent.
    pub fn to_relation(&self) -> Relation {
        Relation::One(self.get().map(|entity| entity as Entity))
    }
}

impl<T: Resource> Default for BackRef<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Resource> Clone for BackRef<T> {
    fn clone(&self) -> Self {
        Self {
            slot: RefCell::new(self.slot.borrow().clone()),
        }
    }
}

impl<T: Resource> PartialEq for BackRef<T> {
    fn eq(&self, other: &Self) -> bool {
        let identity = |value: &Self| {
            value
                .get()
                .map(|entity| (entity.as_ref() as &dyn Resource).identifier())
        };
        identity(self) == identity(other)
    }
}

impl<T: Resource> fmt::Debug for BackRef<T> {
    fmt_by_identifier!("BackRef");
}
