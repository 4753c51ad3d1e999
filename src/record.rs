use serde::{Deserialize, Serialize};
use std::fmt;

/// One phonebook entry.
///
/// Serialized as a JSON object with exactly these six keys, in this order.
/// Every key must be present when loading; values may be empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub organization: String,
    pub work_phone: String,
    pub personal_phone: String,
}

impl Record {
    /// Read the value stored for `field`.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::MiddleName => &self.middle_name,
            Field::Organization => &self.organization,
            Field::WorkPhone => &self.work_phone,
            Field::PersonalPhone => &self.personal_phone,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::MiddleName => &mut self.middle_name,
            Field::Organization => &mut self.organization,
            Field::WorkPhone => &mut self.work_phone,
            Field::PersonalPhone => &mut self.personal_phone,
        }
    }

    /// Overwrite `field` with `value`.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Apply every non-empty value of `patch`, leaving the other fields as they are.
    pub fn apply(&mut self, patch: &RecordPatch) {
        for field in Field::ALL {
            if let Some(value) = patch.get(field) {
                self.set(field, value);
            }
        }
    }

    /// `(key, value)` pairs in serialization order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

/// The six record fields, in display and criterion-code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    MiddleName,
    Organization,
    WorkPhone,
    PersonalPhone,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::FirstName,
        Field::LastName,
        Field::MiddleName,
        Field::Organization,
        Field::WorkPhone,
        Field::PersonalPhone,
    ];

    /// Single-digit search criterion code, `"1"` through `"6"`.
    pub fn code(self) -> &'static str {
        match self {
            Field::FirstName => "1",
            Field::LastName => "2",
            Field::MiddleName => "3",
            Field::Organization => "4",
            Field::WorkPhone => "5",
            Field::PersonalPhone => "6",
        }
    }

    /// Inverse of [`Field::code`]. Anything else, including `" 1"` or `"01"`, is `None`.
    pub fn from_code(code: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.code() == code)
    }

    /// Key used in the persisted JSON object.
    pub fn key(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::MiddleName => "middle_name",
            Field::Organization => "organization",
            Field::WorkPhone => "work_phone",
            Field::PersonalPhone => "personal_phone",
        }
    }

    /// Human-readable label used in prompts and table headers.
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::MiddleName => "Middle Name",
            Field::Organization => "Organization",
            Field::WorkPhone => "Work Phone",
            Field::PersonalPhone => "Personal Phone",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Field-level update for an existing [`Record`].
///
/// An empty string is treated the same as an absent value: "no change".
/// Consequently a patch can never blank out a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    values: [Option<String>; 6],
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter. Empty values are dropped.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        self.values[Self::slot(field)] = if value.is_empty() { None } else { Some(value) };
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values[Self::slot(field)].as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    fn slot(field: Field) -> usize {
        field as usize
    }
}
