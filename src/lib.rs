#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod access;
pub mod de;
pub mod document;
pub mod registry;
pub mod resource;
pub mod ser;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use access::{Deserialized, DeserializedList};
pub use de::{Deserializer, from_document};
pub use document::Document;
pub use error::{DeserializeError, Diagnostic, SerializeError};
pub use registry::{SchemaRegistry, SchemaRegistryArc};
pub use resource::{Entity, Resource, ResourceTyped};
pub use ser::{Serializer, to_document};

/// Implementation details of the exported macros. Not public API.
#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __private {
    pub use inventory;
}

// -----------------------------------------------------------------------------
// Test domain

/// A small Person/Dog domain shared by the unit tests, hand-written exactly
/// the way the build-time discovery mechanism would emit it: static schemas,
/// serde attribute projections, and mechanical `Resource`/`ResourceTyped`
/// impls dispatching on schema field names.
///
/// `Person.allMyDogs`/`Person.myFavoriteDog` hold dogs strongly; the reverse
/// `Dog.owner` edge is the cycle-closing one, so it is a weak [`BackRef`].
#[cfg(test)]
pub(crate) mod testing {
    use std::rc::Rc;

    use serde::{Deserialize, Serialize};
    use serde_json::{Map, Value};

    use crate::registry::{RelationField, ResourceSchema, SchemaRegistry};
    use crate::resource::{
        BackRef, HasMany, HasOne, Relation, Resource, ResourceTyped, from_attribute_map,
        to_attribute_map,
    };

    // -------------------------------------------------------------------------
    // Schemas

    pub static PERSON_SCHEMA: ResourceSchema = ResourceSchema {
        type_name: "person",
        attribute_fields: &["name", "surname", "age"],
        has_one: &[RelationField {
            field: "myFavoriteDog",
            related_type: "dog",
        }],
        has_many: &[RelationField {
            field: "allMyDogs",
            related_type: "dog",
        }],
    };

    pub static DOG_SCHEMA: ResourceSchema = ResourceSchema {
        type_name: "dog",
        attribute_fields: &["name", "age"],
        has_one: &[RelationField {
            field: "owner",
            related_type: "person",
        }],
        has_many: &[],
    };

    // -------------------------------------------------------------------------
    // Person

    #[derive(Debug, Clone, PartialEq)]
    pub struct Person {
        pub id: String,
        pub name: String,
        pub surname: String,
        pub age: i64,
        pub all_my_dogs: HasMany<Dog>,
        pub my_favorite_dog: HasOne<Dog>,
    }

    #[derive(Serialize, Deserialize)]
    struct PersonAttributes {
        name: String,
        surname: String,
        age: i64,
    }

    impl Resource for Person {
        fn schema(&self) -> &'static ResourceSchema {
            &PERSON_SCHEMA
        }

        fn resource_id(&self) -> String {
            self.id.clone()
        }

        fn encode_attributes(&self) -> Result<Map<String, Value>, serde_json::Error> {
            to_attribute_map(&PersonAttributes {
                name: self.name.clone(),
                surname: self.surname.clone(),
                age: self.age,
            })
        }

        fn relation(&self, field: &str) -> Option<Relation> {
            match field {
                "myFavoriteDog" => Some(self.my_favorite_dog.to_relation()),
                "allMyDogs" => Some(self.all_my_dogs.to_relation()),
                _ => None,
            }
        }

        fn as_any(&self) -> &dyn core::any::Any {
            self
        }

        fn into_any_rc(self: Rc<Self>) -> Rc<dyn core::any::Any> {
            self
        }
    }

    impl ResourceTyped for Person {
        fn type_schema() -> &'static ResourceSchema {
            &PERSON_SCHEMA
        }

        fn from_attributes(
            id: &str,
            attributes: &Map<String, Value>,
        ) -> Result<Self, serde_json::Error> {
            let attributes: PersonAttributes = from_attribute_map(attributes)?;
            Ok(Self {
                id: id.to_owned(),
                name: attributes.name,
                surname: attributes.surname,
                age: attributes.age,
                all_my_dogs: HasMany::empty(),
                my_favorite_dog: HasOne::empty(),
            })
        }

        fn set_relation(&self, field: &str, value: Relation) {
            match field {
                "myFavoriteDog" => self.my_favorite_dog.assign(value),
                "allMyDogs" => self.all_my_dogs.assign(value),
                _ => {}
            }
        }

        fn register_dependencies(registry: &mut SchemaRegistry) {
            registry.register::<Dog>();
        }
    }

    #[cfg(feature = "auto_register")]
    crate::submit_resource!(Person);

    // -------------------------------------------------------------------------
    // Dog

    #[derive(Debug, Clone, PartialEq)]
    pub struct Dog {
        pub id: String,
        pub name: String,
        pub age: i64,
        pub owner: BackRef<Person>,
    }

    #[derive(Serialize, Deserialize)]
    struct DogAttributes {
        name: String,
        age: i64,
    }

    impl Resource for Dog {
        fn schema(&self) -> &'static ResourceSchema {
            &DOG_SCHEMA
        }

        fn resource_id(&self) -> String {
            self.id.clone()
        }

        fn encode_attributes(&self) -> Result<Map<String, Value>, serde_json::Error> {
            to_attribute_map(&DogAttributes {
                name: self.name.clone(),
                age: self.age,
            })
        }

        fn relation(&self, field: &str) -> Option<Relation> {
            match field {
                "owner" => Some(self.owner.to_relation()),
                _ => None,
            }
        }

        fn as_any(&self) -> &dyn core::any::Any {
            self
        }

        fn into_any_rc(self: Rc<Self>) -> Rc<dyn core::any::Any> {
            self
        }
    }

    impl ResourceTyped for Dog {
        fn type_schema() -> &'static ResourceSchema {
            &DOG_SCHEMA
        }

        fn from_attributes(
            id: &str,
            attributes: &Map<String, Value>,
        ) -> Result<Self, serde_json::Error> {
            let attributes: DogAttributes = from_attribute_map(attributes)?;
            Ok(Self {
                id: id.to_owned(),
                name: attributes.name,
                age: attributes.age,
                owner: BackRef::empty(),
            })
        }

        fn set_relation(&self, field: &str, value: Relation) {
            if field == "owner" {
                self.owner.assign(value);
            }
        }

        fn register_dependencies(registry: &mut SchemaRegistry) {
            registry.register::<Person>();
        }
    }

    #[cfg(feature = "auto_register")]
    crate::submit_resource!(Dog);

    // -------------------------------------------------------------------------
    // Helpers

    /// Document-level meta payload used by the accessor tests.
    #[derive(Debug, PartialEq, Deserialize)]
    pub struct PersonMeta {
        pub owner: String,
    }

    /// A registry with the whole test domain registered.
    pub fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register::<Person>();
        registry
    }

    fn dog(id: &str, name: &str, age: i64) -> Rc<Dog> {
        Rc::new(Dog {
            id: id.to_owned(),
            name: name.to_owned(),
            age,
            owner: BackRef::empty(),
        })
    }

    /// Stef with favorite dog Bella (dog/1) and allMyDogs \[Bongo (dog/2),
    /// Sonic (dog/3)\]. The dogs' `owner` fields are left unset.
    pub fn sample_person() -> Rc<Person> {
        Rc::new(Person {
            id: "1".into(),
            name: "Stef".into(),
            surname: "Banek".into(),
            age: 28,
            all_my_dogs: HasMany::new(vec![dog("2", "Bongo", 2), dog("3", "Sonic", 3)]),
            my_favorite_dog: HasOne::new(Some(dog("1", "Bella", 1))),
        })
    }

    /// [`sample_person`] with every dog's `owner` pointing back at the
    /// person, forming reference cycles through each dog.
    pub fn cyclic_person() -> Rc<Person> {
        let person = sample_person();
        person
            .my_favorite_dog
            .get()
            .into_iter()
            .chain(person.all_my_dogs.get())
            .for_each(|dog| dog.owner.set(Some(person.clone())));
        person
    }

    // -------------------------------------------------------------------------
    // Fixtures

    /// Wire payloads for the test domain.
    pub mod fixtures {
        /// Stef with Bella (favorite), Bongo and Sonic, all present in
        /// `included`.
        pub const PERSON: &str = r#"
        {
          "data": {
            "type": "person",
            "id": "1",
            "attributes": {
              "age": 28,
              "name": "Stef",
              "surname": "Banek"
            },
            "relationships": {
              "allMyDogs": {
                "data": [
                  {
                    "type": "dog",
                    "id": "2"
                  },
                  {
                    "type": "dog",
                    "id": "3"
                  }
                ]
              },
              "myFavoriteDog": {
                "data": {
                  "type": "dog",
                  "id": "1"
                }
              }
            }
          },
          "included": [
            {
              "type": "dog",
              "id": "1",
              "attributes": {
                "age": 1,
                "name": "Bella"
              },
              "relationships": {
                "owner": {
                  "data": null
                }
              }
            },
            {
              "type": "dog",
              "id": "2",
              "attributes": {
                "age": 2,
                "name": "Bongo"
              },
              "relationships": {
                "owner": {
                  "data": null
                }
              }
            },
            {
              "type": "dog",
              "id": "3",
              "attributes": {
                "age": 3,
                "name": "Sonic"
              },
              "relationships": {
                "owner": {
                  "data": null
                }
              }
            }
          ],
          "errors": null
        }"#;

        /// The favorite dog (dog/1) is referenced but absent from `included`.
        pub const PERSON_WITH_MISSING_DOG: &str = r#"
        {
          "data": {
            "type": "person",
            "id": "1",
            "attributes": {
              "age": 28,
              "name": "Stef",
              "surname": "Banek"
            },
            "relationships": {
              "allMyDogs": {
                "data": [
                  {
                    "type": "dog",
                    "id": "2"
                  },
                  {
                    "type": "dog",
                    "id": "3"
                  }
                ]
              },
              "myFavoriteDog": {
                "data": {
                  "type": "dog",
                  "id": "1"
                }
              }
            }
          },
          "included": [
            {
              "type": "dog",
              "id": "2",
              "attributes": {
                "age": 2,
                "name": "Bongo"
              },
              "relationships": {
                "owner": {
                  "data": null
                }
              }
            },
            {
              "type": "dog",
              "id": "3",
              "attributes": {
                "age": 3,
                "name": "Sonic"
              },
              "relationships": {
                "owner": {
                  "data": null
                }
              }
            }
          ],
          "errors": null
        }"#;

        /// The primary resource is a dog, not a person.
        pub const PERSON_WRONG_TYPE: &str = r#"
        {
          "data": {
            "type": "dog",
            "id": "1",
            "attributes": {
              "age": 1,
              "name": "Bella"
            },
            "relationships": {
              "owner": {
                "data": null
              }
            }
          },
          "errors": null
        }"#;

        /// A collection document with document-level links/meta and
        /// resource/relationship-level links on the first element.
        pub const PERSON_LIST: &str = r#"
        {
          "data": [
            {
              "type": "person",
              "id": "1",
              "attributes": {
                "age": 28,
                "name": "Stef",
                "surname": "Banek"
              },
              "relationships": {
                "allMyDogs": {
                  "data": [
                    {
                      "type": "dog",
                      "id": "2"
                    },
                    {
                      "type": "dog",
                      "id": "3"
                    }
                  ],
                  "links": {
                    "related": "https://example.com/persons/1/dogs"
                  }
                },
                "myFavoriteDog": {
                  "data": {
                    "type": "dog",
                    "id": "1"
                  }
                }
              },
              "links": {
                "self": "https://example.com/persons/1"
              }
            },
            {
              "type": "person",
              "id": "2",
              "attributes": {
                "age": 31,
                "name": "Ana",
                "surname": "Horvat"
              },
              "relationships": {
                "allMyDogs": {
                  "data": [
                    {
                      "type": "dog",
                      "id": "2"
                    }
                  ]
                },
                "myFavoriteDog": {
                  "data": null
                }
              }
            }
          ],
          "included": [
            {
              "type": "dog",
              "id": "1",
              "attributes": {
                "age": 1,
                "name": "Bella"
              }
            },
            {
              "type": "dog",
              "id": "2",
              "attributes": {
                "age": 2,
                "name": "Bongo"
              }
            },
            {
              "type": "dog",
              "id": "3",
              "attributes": {
                "age": 3,
                "name": "Sonic"
              }
            }
          ],
          "links": {
            "self": "https://example.com/persons"
          },
          "meta": {
            "owner": "registry-team"
          }
        }"#;
    }
}

// -----------------------------------------------------------------------------
// Round-trip properties

#[cfg(test)]
mod round_trip {
    use std::rc::Rc;

    use crate::de::Deserializer;
    use crate::ser::Serializer;
    use crate::testing::{Person, cyclic_person, registry, sample_person};

    #[test]
    fn serialize_then_deserialize_restores_the_graph() {
        let registry = registry();
        let original = sample_person();

        let document = Serializer::new(&registry)
            .serialize(original.as_ref())
            .unwrap();
        let restored = Deserializer::new(&registry)
            .one::<Person>(document)
            .unwrap();

        assert!(restored.diagnostics().is_empty());
        assert_eq!(*restored.entity().as_ref(), *original);
    }

    #[test]
    fn reserialization_is_idempotent() {
        let registry = registry();
        let original = sample_person();

        let first = Serializer::new(&registry)
            .serialize(original.as_ref())
            .unwrap();
        let restored = Deserializer::new(&registry)
            .one::<Person>(first.clone())
            .unwrap();
        let second = Serializer::new(&registry)
            .serialize(restored.entity().as_ref())
            .unwrap();

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn cyclic_graph_round_trips() {
        let registry = registry();
        let original = cyclic_person();

        let document = Serializer::new(&registry)
            .serialize(original.as_ref())
            .unwrap();
        let restored = Deserializer::new(&registry)
            .one::<Person>(document)
            .unwrap();

        let person = restored.entity();
        assert_eq!(person.name, original.name);

        // Every dog's owner edge closes back on the restored root instance.
        let bella = person.my_favorite_dog.get().unwrap();
        assert!(Rc::ptr_eq(&bella.owner.get().unwrap(), person));
        for dog in person.all_my_dogs.get() {
            assert!(Rc::ptr_eq(&dog.owner.get().unwrap(), person));
        }

        // Equality also holds: BackRef compares by (type, id) identity, so
        // comparing the cyclic graphs terminates.
        assert_eq!(*person.as_ref(), *original);
    }
}
