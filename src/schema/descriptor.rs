//! Field and kind descriptors.

use serde::Serialize;
use std::fmt;

/// Cardinality of a relationship field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arity {
    /// Not a relationship
    None,
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Arity {
    /// The arity the opposite side of a bidirectional relationship must have.
    #[must_use]
    pub const fn mirror(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::OneToOne => Self::OneToOne,
            Self::OneToMany => Self::ManyToOne,
            Self::ManyToOne => Self::OneToMany,
            Self::ManyToMany => Self::ManyToMany,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        };
        f.write_str(name)
    }
}

/// Declared ownership of a relationship field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ownership {
    /// This side is authoritative
    Owning,
    /// This side mirrors the field named by the relationship's inverse
    NonOwning,
    /// Not declared; resolved against the inverse side when the registry is built
    Unspecified,
}

/// Relationship metadata of a field pointing at another kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub arity: Arity,
    /// Kind the field points at
    pub target: String,
    /// Field on the target kind that mirrors this one, if bidirectional
    pub inverse: Option<String>,
    pub ownership: Ownership,
}

/// Capability to answer ownership questions about a field.
pub trait RelationshipMetadata {
    /// Whether this field is authoritative for the relationship it takes part in.
    fn is_owning_side(&self) -> bool;

    /// Cardinality of the relationship; [`Arity::None`] for plain fields.
    fn relationship_arity(&self) -> Arity;
}

/// Descriptor of one declared field of a composite kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Transient, derived or otherwise non-persistent
    pub transient: bool,
    pub relationship: Option<Relationship>,
    /// Ownership after resolution against the inverse side
    pub(crate) owning: bool,
}

impl FieldDescriptor {
    /// A plain (non-relationship) field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transient: false,
            relationship: None,
            owning: true,
        }
    }

    fn relation(name: impl Into<String>, arity: Arity, target: impl Into<String>) -> Self {
        Self {
            relationship: Some(Relationship {
                arity,
                target: target.into(),
                inverse: None,
                ownership: Ownership::Unspecified,
            }),
            ..Self::new(name)
        }
    }

    pub fn one_to_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::relation(name, Arity::OneToOne, target)
    }

    pub fn one_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::relation(name, Arity::OneToMany, target)
    }

    pub fn many_to_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::relation(name, Arity::ManyToOne, target)
    }

    pub fn many_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::relation(name, Arity::ManyToMany, target)
    }

    /// Mark the field transient: it is never compared.
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Declare this side authoritative.
    #[must_use]
    pub fn owning(mut self) -> Self {
        if let Some(rel) = self.relationship.as_mut() {
            rel.ownership = Ownership::Owning;
        }
        self
    }

    /// Name the field on the target kind that mirrors this one.
    #[must_use]
    pub fn inverse(mut self, field: impl Into<String>) -> Self {
        if let Some(rel) = self.relationship.as_mut() {
            rel.inverse = Some(field.into());
        }
        self
    }

    /// Declare this side a mirror of `field` on the target kind.
    #[must_use]
    pub fn mapped_by(mut self, field: impl Into<String>) -> Self {
        if let Some(rel) = self.relationship.as_mut() {
            rel.inverse = Some(field.into());
            rel.ownership = Ownership::NonOwning;
            self.owning = false;
        }
        self
    }

    /// Whether the walker must skip this field.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.transient || !self.is_owning_side()
    }
}

impl RelationshipMetadata for FieldDescriptor {
    fn is_owning_side(&self) -> bool {
        self.owning
    }

    fn relationship_arity(&self) -> Arity {
        self.relationship.as_ref().map_or(Arity::None, |r| r.arity)
    }
}

/// Explicit schema of one composite kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindSchema {
    pub name: String,
    /// Ancestor kind whose fields are inherited
    pub parent: Option<String>,
    /// Name of the field holding the persistent identifier
    pub identifier: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl KindSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            identifier: None,
            fields: Vec::new(),
        }
    }

    /// Inherit the fields of `parent`.
    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declare `field` as the persistent identifier. The field must be declared
    /// on this kind or an ancestor.
    #[must_use]
    pub fn identifier(mut self, field: impl Into<String>) -> Self {
        self.identifier = Some(field.into());
        self
    }

    /// Declare a field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a plain field by name.
    #[must_use]
    pub fn scalar(self, name: impl Into<String>) -> Self {
        self.field(FieldDescriptor::new(name))
    }

    /// Descriptor of a field declared directly on this kind.
    #[must_use]
    pub fn declared_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
