//! Immutable registry of kind schemas.

use super::descriptor::{FieldDescriptor, KindSchema, Ownership};
use crate::error::{FixtureError, Result, SchemaErrorKind};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Registry of every composite kind the engine can compare.
///
/// Built once through [`SchemaRegistryBuilder`], validated, and never mutated
/// afterwards, so any number of comparisons may consult it concurrently.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    kinds: IndexMap<String, KindSchema>,
}

impl SchemaRegistry {
    /// Start building a registry.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Schema of a kind, if registered.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&KindSchema> {
        self.kinds.get(kind)
    }

    /// The kind followed by its ancestors, most specific first.
    pub fn kind_chain(&self, kind: &str) -> Result<Vec<&KindSchema>> {
        let mut chain = Vec::new();
        let mut current = Some(kind);
        while let Some(name) = current {
            let schema = self
                .kinds
                .get(name)
                .ok_or_else(|| FixtureError::unknown_kind(name))?;
            chain.push(schema);
            current = schema.parent.as_deref();
        }
        Ok(chain)
    }

    /// Every field declared by the kind and its ancestors, most specific kind first.
    pub fn declared_fields(&self, kind: &str) -> Result<Vec<&FieldDescriptor>> {
        Ok(self
            .kind_chain(kind)?
            .into_iter()
            .flat_map(|schema| schema.fields.iter())
            .collect())
    }

    /// Descriptor of a field declared on the kind or one of its ancestors.
    #[must_use]
    pub fn field(&self, kind: &str, name: &str) -> Option<&FieldDescriptor> {
        self.kind_chain(kind)
            .ok()?
            .into_iter()
            .find_map(|schema| schema.declared_field(name))
    }

    /// Name of the identifier field, looked up through the ancestors.
    #[must_use]
    pub fn identifier_field(&self, kind: &str) -> Option<&str> {
        self.kind_chain(kind)
            .ok()?
            .into_iter()
            .find_map(|schema| schema.identifier.as_deref())
    }

    /// Whether `kind` is `ancestor` or inherits from it.
    #[must_use]
    pub fn is_assignable(&self, kind: &str, ancestor: &str) -> bool {
        self.kind_chain(kind)
            .map(|chain| chain.iter().any(|schema| schema.name == ancestor))
            .unwrap_or(false)
    }

    /// All registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &KindSchema> {
        self.kinds.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Builder for [`SchemaRegistry`].
#[derive(Debug, Default)]
#[must_use]
pub struct SchemaRegistryBuilder {
    kinds: Vec<KindSchema>,
}

impl SchemaRegistryBuilder {
    /// Register a kind.
    pub fn kind(mut self, schema: KindSchema) -> Self {
        self.kinds.push(schema);
        self
    }

    /// Validate every kind and relationship and resolve field ownership.
    pub fn build(self) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::default();
        for schema in self.kinds {
            if registry.kinds.contains_key(&schema.name) {
                return Err(FixtureError::schema(
                    "registering kinds",
                    SchemaErrorKind::DuplicateKind(schema.name),
                ));
            }
            registry.kinds.insert(schema.name.clone(), schema);
        }

        check_hierarchy(&registry)?;
        check_fields(&registry)?;
        let resolved = resolve_ownership(&registry)?;

        for (kind, field, owning) in resolved {
            if let Some(descriptor) = registry
                .kinds
                .get_mut(&kind)
                .and_then(|schema| schema.fields.iter_mut().find(|f| f.name == field))
            {
                descriptor.owning = owning;
            }
        }

        tracing::debug!("Schema registry built with {} kinds", registry.len());
        Ok(registry)
    }
}

/// Every parent exists and no kind inherits from itself.
fn check_hierarchy(registry: &SchemaRegistry) -> Result<()> {
    for schema in registry.kinds.values() {
        let mut seen = HashSet::new();
        let mut current = Some(schema);
        while let Some(kind) = current {
            if !seen.insert(kind.name.as_str()) {
                return Err(FixtureError::schema(
                    "checking inheritance",
                    SchemaErrorKind::InheritanceCycle(schema.name.clone()),
                ));
            }
            current = match kind.parent.as_deref() {
                Some(parent) => Some(registry.kinds.get(parent).ok_or_else(|| {
                    FixtureError::schema(
                        "checking inheritance",
                        SchemaErrorKind::UnknownParent {
                            kind: kind.name.clone(),
                            parent: parent.to_string(),
                        },
                    )
                })?),
                None => None,
            };
        }
    }
    Ok(())
}

/// No field is declared twice along a kind chain and identifiers name declared fields.
fn check_fields(registry: &SchemaRegistry) -> Result<()> {
    for schema in registry.kinds.values() {
        let mut names = HashSet::new();
        for field in registry.declared_fields(&schema.name)? {
            if !names.insert(field.name.as_str()) {
                return Err(FixtureError::schema(
                    "checking fields",
                    SchemaErrorKind::DuplicateField {
                        kind: schema.name.clone(),
                        field: field.name.clone(),
                    },
                ));
            }
        }
        if let Some(id_field) = schema.identifier.as_deref() {
            if !names.contains(id_field) {
                return Err(FixtureError::schema(
                    "checking identifiers",
                    SchemaErrorKind::UnknownIdentifierField {
                        kind: schema.name.clone(),
                        field: id_field.to_string(),
                    },
                ));
            }
        }
    }
    Ok(())
}

/// Check every relationship against its inverse and decide which side owns it.
///
/// Returns `(kind, field, owning)` for every relationship field.
fn resolve_ownership(registry: &SchemaRegistry) -> Result<Vec<(String, String, bool)>> {
    let mut resolved = Vec::new();

    for schema in registry.kinds.values() {
        for field in &schema.fields {
            let Some(rel) = field.relationship.as_ref() else {
                continue;
            };
            let kind = schema.name.as_str();

            if !registry.kinds.contains_key(&rel.target) {
                return Err(FixtureError::schema(
                    "checking relationships",
                    SchemaErrorKind::UnknownTarget {
                        kind: kind.to_string(),
                        field: field.name.clone(),
                        target: rel.target.clone(),
                    },
                ));
            }

            let Some(inverse_name) = rel.inverse.as_deref() else {
                if rel.ownership == Ownership::NonOwning {
                    return Err(FixtureError::schema(
                        "checking relationships",
                        SchemaErrorKind::MissingInverse {
                            kind: kind.to_string(),
                            field: field.name.clone(),
                        },
                    ));
                }
                resolved.push((kind.to_string(), field.name.clone(), true));
                continue;
            };

            let pair = |source| {
                FixtureError::schema(
                    format!("checking relationship {kind}.{}", field.name),
                    source,
                )
            };

            let inverse = registry
                .field(&rel.target, inverse_name)
                .ok_or_else(|| {
                    pair(SchemaErrorKind::UnknownInverse {
                        kind: kind.to_string(),
                        field: field.name.clone(),
                        target: rel.target.clone(),
                        inverse: inverse_name.to_string(),
                        suggestion: suggest(registry, &rel.target, inverse_name),
                    })
                })?;

            let mismatch = || {
                pair(SchemaErrorKind::InverseMismatch {
                    kind: kind.to_string(),
                    field: field.name.clone(),
                    target: rel.target.clone(),
                    inverse: inverse_name.to_string(),
                })
            };
            let inverse_rel = inverse.relationship.as_ref().ok_or_else(mismatch)?;
            let points_back = registry.is_assignable(kind, &inverse_rel.target)
                && inverse_rel
                    .inverse
                    .as_deref()
                    .map_or(true, |name| name == field.name);
            if !points_back {
                return Err(mismatch());
            }

            if inverse_rel.arity != rel.arity.mirror() {
                return Err(pair(SchemaErrorKind::ArityMismatch {
                    kind: kind.to_string(),
                    field: field.name.clone(),
                    arity: rel.arity.to_string(),
                    target: rel.target.clone(),
                    inverse: inverse_name.to_string(),
                    inverse_arity: inverse_rel.arity.to_string(),
                }));
            }

            let sides = || {
                (
                    kind.to_string(),
                    field.name.clone(),
                    rel.target.clone(),
                    inverse_name.to_string(),
                )
            };
            let owning = match (rel.ownership, inverse_rel.ownership) {
                (Ownership::NonOwning, Ownership::NonOwning) => {
                    let (kind, field, target, inverse) = sides();
                    return Err(pair(SchemaErrorKind::BothSidesNonOwning {
                        kind,
                        field,
                        target,
                        inverse,
                    }));
                }
                (Ownership::Owning, Ownership::Owning) => {
                    let (kind, field, target, inverse) = sides();
                    return Err(pair(SchemaErrorKind::BothSidesOwning {
                        kind,
                        field,
                        target,
                        inverse,
                    }));
                }
                (Ownership::Unspecified, Ownership::Unspecified) => {
                    let (kind, field, target, inverse) = sides();
                    return Err(pair(SchemaErrorKind::NeitherSideOwning {
                        kind,
                        field,
                        target,
                        inverse,
                    }));
                }
                (Ownership::Owning, _) => true,
                (Ownership::NonOwning, _) => false,
                (Ownership::Unspecified, other) => other == Ownership::NonOwning,
            };
            resolved.push((kind.to_string(), field.name.clone(), owning));
        }
    }

    Ok(resolved)
}

/// " (did you mean 'x'?)" for the closest field name on `kind`, or empty.
fn suggest(registry: &SchemaRegistry, kind: &str, wanted: &str) -> String {
    registry
        .declared_fields(kind)
        .unwrap_or_default()
        .into_iter()
        .map(|f| (strsim::jaro_winkler(&f.name, wanted), f.name.as_str()))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, name)| format!(" (did you mean '{name}'?)"))
        .unwrap_or_default()
}
