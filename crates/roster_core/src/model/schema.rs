//! Variant schemas and the registry that binds them to discriminator tags.
//!
//! # Responsibility
//! - Declare the typed required fields every variant inherits.
//! - Declare each variant's own required fields.
//! - Build typed `Record` values from loose attribute maps.
//!
//! # Invariants
//! - A tag is registered at most once.
//! - A variant never redeclares a base field.

use crate::model::record::{Record, RecordType, RecordValidationError, DISCRIMINATOR_KEY};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// JSON shape a required field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty string.
    Text,
    /// Whole number representable as `i64`.
    Integer,
    /// Any JSON number.
    Number,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Integer => value.as_i64().is_some(),
            Self::Number => value.is_number(),
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Integer => f.write_str("an integer"),
            Self::Number => f.write_str("a number"),
        }
    }
}

/// A required, typed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Canonical document key.
    pub name: &'static str,
    /// Alternative input keys, checked after `name`.
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            aliases: &[],
            kind,
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// `null` counts as absent. An empty string yields to a later non-empty
    /// key, and is returned only when no key carries anything else.
    fn lookup<'a>(&self, attributes: &'a Map<String, Value>) -> Option<&'a Value> {
        let mut candidates = std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .filter_map(|key| attributes.get(key).filter(|value| !value.is_null()));
        let first = candidates.next()?;
        if first.as_str() != Some("") {
            return Some(first);
        }
        candidates
            .find(|value| value.as_str() != Some(""))
            .or(Some(first))
    }
}

/// Fields shared by every variant.
pub const BASE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", FieldKind::Text),
    FieldSpec::new("gender", FieldKind::Text),
    FieldSpec::new("age", FieldKind::Integer),
];

const STUDENT_FIELDS: &[FieldSpec] = &[FieldSpec::new("grade", FieldKind::Integer)];

const EMPLOYEE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("salary", FieldKind::Number),
    FieldSpec::new("designation", FieldKind::Text).with_aliases(&["desig"]),
];

/// A concrete variant bound to its discriminator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSchema {
    kind: RecordType,
    fields: &'static [FieldSpec],
}

impl VariantSchema {
    pub const fn new(kind: RecordType, fields: &'static [FieldSpec]) -> Self {
        Self { kind, fields }
    }

    pub const fn student() -> Self {
        Self::new(RecordType::Student, STUDENT_FIELDS)
    }

    pub const fn employee() -> Self {
        Self::new(RecordType::Employee, EMPLOYEE_FIELDS)
    }

    pub fn kind(&self) -> RecordType {
        self.kind
    }

    pub fn tag(&self) -> &'static str {
        self.kind.as_tag()
    }

    /// Base fields followed by the variant's own fields.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        let fields = self.fields;
        BASE_FIELDS.iter().chain(fields.iter())
    }

    /// Builds a typed record from an attribute map.
    ///
    /// Unknown attributes are ignored. Aliased inputs are stored under the
    /// canonical field name.
    pub fn build(&self, attributes: &Map<String, Value>) -> Result<Record, RecordValidationError> {
        let mut document = Map::new();
        document.insert(
            DISCRIMINATOR_KEY.to_string(),
            Value::String(self.tag().to_string()),
        );

        for field in self.required_fields() {
            let value = field
                .lookup(attributes)
                .ok_or(RecordValidationError::MissingField {
                    variant: self.kind,
                    field: field.name,
                })?;
            if !field.kind.accepts(value) {
                return Err(RecordValidationError::WrongType {
                    variant: self.kind,
                    field: field.name,
                    expected: field.kind,
                });
            }
            document.insert(field.name.to_string(), value.clone());
        }

        let record: Record = serde_json::from_value(Value::Object(document))
            .map_err(|err| RecordValidationError::Decode(err.to_string()))?;
        record.validate()?;
        Ok(record)
    }
}

/// Configuration error raised while registering variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateTag(&'static str),
    ShadowedField {
        tag: &'static str,
        field: &'static str,
    },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTag(tag) => write!(f, "variant tag `{tag}` is already registered"),
            Self::ShadowedField { tag, field } => {
                write!(f, "variant `{tag}` redeclares base field `{field}`")
            }
        }
    }
}

impl Error for RegistryError {}

/// Variants known to the process, keyed by tag.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    variants: Vec<VariantSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `Student` and `Employee` registered.
    pub fn standard() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(VariantSchema::student())?;
        registry.register(VariantSchema::employee())?;
        Ok(registry)
    }

    /// Registers a variant under its tag.
    ///
    /// # Errors
    /// - `DuplicateTag` when the tag is already registered.
    /// - `ShadowedField` when the variant redeclares a base field.
    pub fn register(&mut self, schema: VariantSchema) -> Result<(), RegistryError> {
        if self.get(schema.kind).is_some() {
            return Err(RegistryError::DuplicateTag(schema.tag()));
        }
        if let Some(field) = schema
            .fields
            .iter()
            .find(|field| BASE_FIELDS.iter().any(|base| base.name == field.name))
        {
            return Err(RegistryError::ShadowedField {
                tag: schema.tag(),
                field: field.name,
            });
        }
        self.variants.push(schema);
        Ok(())
    }

    pub fn get(&self, kind: RecordType) -> Option<&VariantSchema> {
        self.variants.iter().find(|schema| schema.kind == kind)
    }

    /// Registered tags in registration order.
    pub fn tags(&self) -> Vec<&'static str> {
        self.variants.iter().map(VariantSchema::tag).collect()
    }
}
