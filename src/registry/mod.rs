//! The schema registry: the process-wide lookup from domain-type name to its
//! static schema and construction hooks.
//!
//! Entries are produced by the external, build-time discovery mechanism (a
//! derive, reflection pass, or code generator); this crate only consumes the
//! result. A registry is built once at initialization and is read-only
//! afterwards, which is what makes concurrent serialize/deserialize calls
//! safe without coordination.

mod resource_meta;
mod schema;
mod schema_registry;

pub use resource_meta::ResourceMeta;
pub use schema::{RelationField, ResourceSchema};
pub use schema_registry::{SchemaRegistry, SchemaRegistryArc};

#[cfg(feature = "auto_register")]
pub use schema_registry::AutoRegisteredResource;
