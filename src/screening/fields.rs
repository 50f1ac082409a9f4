//! The fixed, ordered list of candidate fields.

use serde::{Deserialize, Serialize};

/// Identifier of a candidate field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    FullName,
    Email,
    Phone,
    Experience,
    Position,
    Location,
    TechStack,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Experience => "experience",
            Self::Position => "position",
            Self::Location => "location",
            Self::TechStack => "tech_stack",
        }
    }

    /// The `FIELDS` entry for this key.
    pub fn spec(&self) -> &'static FieldSpec {
        // FIELDS is ordered the same way as the enum.
        &FIELDS[*self as usize]
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation rule attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    PersonName,
    Email,
    Phone,
    YearsOfExperience,
    NonEmpty,
    TechStack,
}

/// A field the conversation collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub label: &'static str,
    pub rule: Rule,
}

impl FieldSpec {
    /// The assistant message asking for this field.
    pub fn prompt(&self) -> String {
        match self.key {
            FieldKey::Phone => format!(
                "Please select your country code and enter your {}:",
                self.label.to_lowercase()
            ),
            _ => format!("Please provide your {}:", self.label.to_lowercase()),
        }
    }
}

/// Collected in this order, one per step.
pub const FIELDS: [FieldSpec; 7] = [
    FieldSpec {
        key: FieldKey::FullName,
        label: "Full Name",
        rule: Rule::PersonName,
    },
    FieldSpec {
        key: FieldKey::Email,
        label: "Email",
        rule: Rule::Email,
    },
    FieldSpec {
        key: FieldKey::Phone,
        label: "Phone Number",
        rule: Rule::Phone,
    },
    FieldSpec {
        key: FieldKey::Experience,
        label: "Years of Experience",
        rule: Rule::YearsOfExperience,
    },
    FieldSpec {
        key: FieldKey::Position,
        label: "Desired Position(s)",
        rule: Rule::NonEmpty,
    },
    FieldSpec {
        key: FieldKey::Location,
        label: "Current Location",
        rule: Rule::NonEmpty,
    },
    FieldSpec {
        key: FieldKey::TechStack,
        label: "Tech Stack (comma-separated)",
        rule: Rule::TechStack,
    },
];
