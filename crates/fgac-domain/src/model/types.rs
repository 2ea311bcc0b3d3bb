//! Core type definitions for the compiled authorization model.
//!
//! Serialization follows the OpenFGA JSON layout: relation rewrites are
//! single-key objects (`this`, `computedUserset`, `tupleToUserset`, `union`,
//! `intersection`, `difference`) and subject restrictions live under
//! `metadata.relations.<name>.directly_related_user_types`.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// An authorization model compiled from DSL text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationModel {
    /// Schema version (e.g., "1.1"), `None` when the text declares none.
    pub schema_version: Option<String>,
    /// Type definitions in declaration order.
    pub type_definitions: Vec<TypeDefinition>,
}

impl AuthorizationModel {
    /// Looks up a type definition by name.
    pub fn type_definition(&self, type_name: &str) -> Option<&TypeDefinition> {
        self.type_definitions
            .iter()
            .find(|td| td.type_name == type_name)
    }
}

/// A type definition within the authorization model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    /// The type name (e.g., "document", "folder").
    #[serde(rename = "type")]
    pub type_name: String,
    /// Relation rewrites keyed by relation name, in declaration order.
    pub relations: IndexMap<String, Userset>,
    /// Subject restrictions; `None` iff `relations` is empty.
    pub metadata: Option<Metadata>,
}

impl TypeDefinition {
    /// Returns the rewrite for a relation on this type.
    pub fn relation(&self, name: &str) -> Option<&Userset> {
        self.relations.get(name)
    }

    /// Returns the directly related user types declared for a relation.
    pub fn directly_related_user_types(&self, relation: &str) -> Option<&[RelationReference]> {
        self.metadata
            .as_ref()?
            .relations
            .get(relation)
            .map(|m| m.directly_related_user_types.as_slice())
    }
}

/// Per-type metadata: the subject restrictions of each relation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub relations: IndexMap<String, RelationMetadata>,
}

/// Subject restrictions for a single relation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationMetadata {
    pub directly_related_user_types: Vec<RelationReference>,
}

/// A subject type allowed to be directly related through a relation.
///
/// Written in the DSL as `user`, `user:*` or `group#member`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationReference {
    /// The subject type name.
    pub type_name: String,
    /// Optional wildcard or relation qualifier.
    pub qualifier: Option<TypeQualifier>,
}

/// Qualifier on a [`RelationReference`]. At most one is present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeQualifier {
    /// `type:*`: every subject of the type.
    Wildcard,
    /// `type#relation`: the userset of a relation on the type.
    Relation(String),
}

impl RelationReference {
    /// A plain type reference (`user`).
    pub fn direct(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            qualifier: None,
        }
    }

    /// A wildcard reference (`user:*`).
    pub fn wildcard(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            qualifier: Some(TypeQualifier::Wildcard),
        }
    }

    /// A userset reference (`group#member`).
    pub fn userset(type_name: impl Into<String>, relation: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            qualifier: Some(TypeQualifier::Relation(relation.into())),
        }
    }
}

impl fmt::Display for RelationReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            None => write!(f, "{}", self.type_name),
            Some(TypeQualifier::Wildcard) => write!(f, "{}:*", self.type_name),
            Some(TypeQualifier::Relation(relation)) => {
                write!(f, "{}#{}", self.type_name, relation)
            }
        }
    }
}

impl Serialize for RelationReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.qualifier.is_some() { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", &self.type_name)?;
        match &self.qualifier {
            None => {}
            Some(TypeQualifier::Wildcard) => map.serialize_entry("wildcard", &Empty {})?,
            Some(TypeQualifier::Relation(relation)) => map.serialize_entry("relation", relation)?,
        }
        map.end()
    }
}

/// A userset rewrite: how the subjects of a relation are computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Userset {
    /// Direct assignment (`[user, ...]`).
    This,
    /// Another relation on the same object.
    ComputedUserset { relation: String },
    /// `computed_userset from tupleset`.
    TupleToUserset {
        tupleset: String,
        computed_userset: String,
    },
    /// Union of multiple usersets.
    Union { children: Vec<Userset> },
    /// Intersection of multiple usersets.
    Intersection { children: Vec<Userset> },
    /// `base but not subtract`.
    Difference {
        base: Box<Userset>,
        subtract: Box<Userset>,
    },
}

impl Userset {
    pub fn computed(relation: impl Into<String>) -> Self {
        Self::ComputedUserset {
            relation: relation.into(),
        }
    }

    pub fn tuple_to_userset(
        tupleset: impl Into<String>,
        computed_userset: impl Into<String>,
    ) -> Self {
        Self::TupleToUserset {
            tupleset: tupleset.into(),
            computed_userset: computed_userset.into(),
        }
    }

    pub fn difference(base: Userset, subtract: Userset) -> Self {
        Self::Difference {
            base: Box::new(base),
            subtract: Box::new(subtract),
        }
    }

    /// Key used for this node in the serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            Userset::This => "this",
            Userset::ComputedUserset { .. } => "computedUserset",
            Userset::TupleToUserset { .. } => "tupleToUserset",
            Userset::Union { .. } => "union",
            Userset::Intersection { .. } => "intersection",
            Userset::Difference { .. } => "difference",
        }
    }
}

#[derive(Serialize)]
struct Empty {}

/// `{"object": "", "relation": ...}`; the object is resolved by consumers.
#[derive(Serialize)]
struct ObjectRelation<'a> {
    object: &'a str,
    relation: &'a str,
}

impl<'a> ObjectRelation<'a> {
    fn new(relation: &'a str) -> Self {
        Self {
            object: "",
            relation,
        }
    }
}

#[derive(Serialize)]
struct Children<'a> {
    child: &'a [Userset],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TupleToUsersetBody<'a> {
    tupleset: ObjectRelation<'a>,
    computed_userset: ObjectRelation<'a>,
}

#[derive(Serialize)]
struct DifferenceBody<'a> {
    base: &'a Userset,
    subtract: &'a Userset,
}

impl Serialize for Userset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        let key = self.kind();
        match self {
            Userset::This => map.serialize_entry(key, &Empty {})?,
            Userset::ComputedUserset { relation } => {
                map.serialize_entry(key, &ObjectRelation::new(relation))?
            }
            Userset::TupleToUserset {
                tupleset,
                computed_userset,
            } => map.serialize_entry(
                key,
                &TupleToUsersetBody {
                    tupleset: ObjectRelation::new(tupleset),
                    computed_userset: ObjectRelation::new(computed_userset),
                },
            )?,
            Userset::Union { children } | Userset::Intersection { children } => {
                map.serialize_entry(key, &Children { child: children })?
            }
            Userset::Difference { base, subtract } => map.serialize_entry(
                key,
                &DifferenceBody {
                    base: base.as_ref(),
                    subtract: subtract.as_ref(),
                },
            )?,
        }
        map.end()
    }
}
