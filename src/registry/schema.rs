// -----------------------------------------------------------------------------
// RelationField

/// One relationship field of a domain type: its name and the resource type it
/// points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationField {
    /// The relationship field name as it appears on the wire.
    pub field: &'static str,
    /// The related resource type name.
    pub related_type: &'static str,
}

// -----------------------------------------------------------------------------
// ResourceSchema

/// The static schema of one domain type, as produced by the build-time
/// discovery mechanism.
///
/// Everything here is `'static` data: the discovery mechanism runs before the
/// program does, and a schema never changes while a registry holding it is in
/// use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSchema {
    /// The resource type name (the wire `type` member).
    pub type_name: &'static str,
    /// Names of the plain attribute fields.
    pub attribute_fields: &'static [&'static str],
    /// The has-one relationship fields.
    pub has_one: &'static [RelationField],
    /// The has-many relationship fields.
    pub has_many: &'static [RelationField],
}

impl ResourceSchema {
    /// Looks up a has-one field by name.
    pub fn has_one_field(&self, name: &str) -> Option<&'static RelationField> {
        self.has_one.iter().find(|field| field.field == name)
    }

    /// Looks up a has-many field by name.
    pub fn has_many_field(&self, name: &str) -> Option<&'static RelationField> {
        self.has_many.iter().find(|field| field.field == name)
    }

    /// Iterates all relationship fields, has-one first.
    pub fn relation_fields(&self) -> impl Iterator<Item = &'static RelationField> {
        self.has_one.iter().chain(self.has_many.iter())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::PERSON_SCHEMA;

    #[test]
    fn field_lookup_distinguishes_cardinality() {
        assert_eq!(
            PERSON_SCHEMA.has_one_field("myFavoriteDog").map(|f| f.related_type),
            Some("dog")
        );
        assert!(PERSON_SCHEMA.has_one_field("allMyDogs").is_none());
        assert!(PERSON_SCHEMA.has_many_field("allMyDogs").is_some());
        assert_eq!(PERSON_SCHEMA.relation_fields().count(), 2);
    }
}
