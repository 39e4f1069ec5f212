//! Base record and concrete variants.
//!
//! # Responsibility
//! - Define `BaseRecord`, the attribute set shared by every variant.
//! - Define `Student` and `Employee` by composition over `BaseRecord`.
//! - Unite the variants in the `Record` tagged union persisted by the store.
//!
//! # Invariants
//! - `name`, `gender` and `designation` are non-empty.
//! - `salary` is finite.
//! - The serialized `itemtype` tag matches the enum case.

use crate::model::schema::FieldKind;
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned identifier of a persisted record.
pub type RecordId = Uuid;

/// Document key of the discriminator tag.
pub const DISCRIMINATOR_KEY: &str = "itemtype";

/// Discriminator tag naming a concrete record variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    Student,
    Employee,
}

impl RecordType {
    /// Every known variant in declaration order.
    pub const ALL: [RecordType; 2] = [RecordType::Student, RecordType::Employee];

    /// Tag stored in the `itemtype` field.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Employee => "Employee",
        }
    }

    /// Parses a stored tag; tags are case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_tag() == tag)
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Attributes every record variant inherits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRecord {
    pub name: String,
    pub gender: String,
    pub age: i64,
}

impl BaseRecord {
    pub fn new(name: impl Into<String>, gender: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            gender: gender.into(),
            age,
        }
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("name", &self.name)?;
        require_text("gender", &self.gender)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub grade: i64,
}

impl Student {
    pub fn new(base: BaseRecord, grade: i64) -> Self {
        Self { base, grade }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(flatten)]
    pub base: BaseRecord,
    #[serde(serialize_with = "serialize_amount")]
    pub salary: f64,
    /// Accepted as `desig` on input to match the public request body.
    #[serde(alias = "desig")]
    pub designation: String,
}

impl Employee {
    pub fn new(base: BaseRecord, salary: f64, designation: impl Into<String>) -> Self {
        Self {
            base,
            salary,
            designation: designation.into(),
        }
    }
}

/// One stored document, discriminated by `itemtype`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "itemtype")]
pub enum Record {
    Student(Student),
    Employee(Employee),
}

impl Record {
    pub fn kind(&self) -> RecordType {
        match self {
            Self::Student(_) => RecordType::Student,
            Self::Employee(_) => RecordType::Employee,
        }
    }

    pub fn base(&self) -> &BaseRecord {
        match self {
            Self::Student(student) => &student.base,
            Self::Employee(employee) => &employee.base,
        }
    }

    /// Checks value-level invariants that the type system does not encode.
    ///
    /// Required-field presence is guaranteed by construction; this covers
    /// empty text and non-finite numbers.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        self.base().validate()?;
        match self {
            Self::Student(_) => Ok(()),
            Self::Employee(employee) => {
                if !employee.salary.is_finite() {
                    return Err(RecordValidationError::NonFiniteNumber { field: "salary" });
                }
                require_text("designation", &employee.designation)
            }
        }
    }
}

impl From<Student> for Record {
    fn from(value: Student) -> Self {
        Self::Student(value)
    }
}

impl From<Employee> for Record {
    fn from(value: Employee) -> Self {
        Self::Employee(value)
    }
}

/// A record as returned by the store, with its assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub record: Record,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl StoredRecord {
    pub fn kind(&self) -> RecordType {
        self.record.kind()
    }
}

/// Reasons a record cannot be constructed or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    MissingField {
        variant: RecordType,
        field: &'static str,
    },
    WrongType {
        variant: RecordType,
        field: &'static str,
        expected: FieldKind,
    },
    EmptyText {
        field: &'static str,
    },
    NonFiniteNumber {
        field: &'static str,
    },
    /// No schema is registered for the requested variant.
    UnregisteredVariant(RecordType),
    /// Attributes passed the field checks but did not decode into the variant.
    Decode(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { variant, field } => {
                write!(f, "{variant} requires field `{field}`")
            }
            Self::WrongType {
                variant,
                field,
                expected,
            } => write!(f, "{variant} field `{field}` must be {expected}"),
            Self::EmptyText { field } => write!(f, "field `{field}` must not be empty"),
            Self::NonFiniteNumber { field } => write!(f, "field `{field}` must be finite"),
            Self::UnregisteredVariant(variant) => {
                write!(f, "no schema registered for variant {variant}")
            }
            Self::Decode(message) => write!(f, "record decode failed: {message}"),
        }
    }
}

impl Error for RecordValidationError {}

/// Whole amounts are written as integers, so `5000` reads back as `5000`.
fn serialize_amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), RecordValidationError> {
    if value.is_empty() {
        return Err(RecordValidationError::EmptyText { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordType, DISCRIMINATOR_KEY};
    use crate::model::record::{BaseRecord, Student};

    #[test]
    fn tags_round_trip() {
        for kind in RecordType::ALL {
            assert_eq!(RecordType::from_tag(kind.as_tag()), Some(kind));
        }
        assert_eq!(RecordType::from_tag("student"), None);
    }

    #[test]
    fn discriminator_key_matches_serde_tag() {
        let record = Record::from(Student::new(BaseRecord::new("Ann", "F", 20), 10));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json[DISCRIMINATOR_KEY], "Student");
    }
}
