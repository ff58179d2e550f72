use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle state of a character.
///
/// Serialized as `ATIVO` / `INATIVO` / `MORTO`; the English names are accepted
/// on input as well, in any letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterStatus {
    #[default]
    Active,
    Inactive,
    Deceased,
}

impl CharacterStatus {
    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterStatus::Active => "ATIVO",
            CharacterStatus::Inactive => "INATIVO",
            CharacterStatus::Deceased => "MORTO",
        }
    }
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}', expected one of ATIVO, INATIVO, MORTO")]
pub struct StatusParseError(pub String);

impl FromStr for CharacterStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ATIVO" | "ACTIVE" => Ok(CharacterStatus::Active),
            "INATIVO" | "INACTIVE" => Ok(CharacterStatus::Inactive),
            "MORTO" | "DECEASED" => Ok(CharacterStatus::Deceased),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

impl Serialize for CharacterStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CharacterStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A stored character record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub real_name: Option<String>,
    pub origin: Option<String>,
    pub universe: Option<String>,
    pub powers: Option<String>,
    pub affiliation: Option<String>,
    pub first_appearance: Option<String>,
    pub status: CharacterStatus,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl Character {
    /// Builds a record from validated fields and a store-assigned id.
    pub fn from_fields(id: i64, fields: CharacterFields) -> Self {
        Self {
            id,
            name: fields.name,
            real_name: fields.real_name,
            origin: fields.origin,
            universe: fields.universe,
            powers: fields.powers,
            affiliation: fields.affiliation,
            first_appearance: fields.first_appearance,
            status: fields.status,
            description: fields.description,
            image_url: fields.image_url,
        }
    }
}

/// Request body for create and update. Every field is optional at the parsing
/// stage so that a missing name surfaces as a validation error, not a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPayload {
    /// Ignored; identifiers are assigned by the store.
    #[serde(default)]
    pub id: Option<i64>,
    pub name: Option<String>,
    pub real_name: Option<String>,
    pub origin: Option<String>,
    pub universe: Option<String>,
    pub powers: Option<String>,
    pub affiliation: Option<String>,
    pub first_appearance: Option<String>,
    pub status: Option<CharacterStatus>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Validated mutable fields of a character, everything but the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterFields {
    pub name: String,
    pub real_name: Option<String>,
    pub origin: Option<String>,
    pub universe: Option<String>,
    pub powers: Option<String>,
    pub affiliation: Option<String>,
    pub first_appearance: Option<String>,
    pub status: CharacterStatus,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Conjunctive filter; `None` means the criterion is not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Exact affiliation.
    pub affiliation: Option<String>,
    pub status: Option<CharacterStatus>,
}

impl CharacterFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.affiliation.is_none() && self.status.is_none()
    }

    pub fn matches(&self, character: &Character) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .map_or(true, |needle| contains_ignore_case(&character.name, needle));
        let affiliation_ok = self
            .affiliation
            .as_deref()
            .map_or(true, |a| character.affiliation.as_deref() == Some(a));
        let status_ok = self.status.map_or(true, |s| character.status == s);
        name_ok && affiliation_ok && status_ok
    }
}

/// Case-insensitive substring test used by the in-memory store and filters.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Response body of a successful image upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub message: String,
}
