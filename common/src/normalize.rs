//! Normalización al cargar
//!
//! Las claves se comparan sin distinguir mayúsculas una sola vez, al cargar:
//! `Status` → `status`, `Name` → `name`, `Photo` → `photoUrl`.
//! Si existen la clave exacta y una variante (`status` y `Status`), gana la
//! exacta y la variante se conserva en `extra`.

use crate::error::{Error, Result};
use crate::types::{Confirmed, Record};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Team,
    PhotoUrl,
    Status,
    Confirmed,
}

impl Field {
    const ALL: [Field; 5] = [Field::Name, Field::Team, Field::PhotoUrl, Field::Status, Field::Confirmed];

    fn canonical_key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Team => "team",
            Field::PhotoUrl => "photoUrl",
            Field::Status => "status",
            Field::Confirmed => "confirmed",
        }
    }

    fn from_key(key: &str) -> Option<Field> {
        match key.to_ascii_lowercase().as_str() {
            "name" => Some(Field::Name),
            "team" => Some(Field::Team),
            "photourl" | "photo_url" | "photo" => Some(Field::PhotoUrl),
            "status" => Some(Field::Status),
            "confirmed" => Some(Field::Confirmed),
            _ => None,
        }
    }
}

/// Convierte el texto del archivo (con o sin BOM UTF-8) en registros
pub fn records_from_str(content: &str) -> Result<Vec<Record>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let value: Value = serde_json::from_str(content)?;
    records_from_value(value)
}

/// Convierte una lista JSON en registros normalizados
pub fn records_from_value(value: Value) -> Result<Vec<Record>> {
    let Value::Array(items) = value else {
        return Err(Error::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Record::from_json_object(index, map),
            _ => Err(Error::InvalidRecord {
                index,
                reason: "no es un objeto JSON".to_string(),
            }),
        })
        .collect()
}

impl Record {
    /// Construye un registro a partir de un objeto JSON, normalizando claves y
    /// valores de etiqueta.
    pub fn from_json_object(index: usize, map: Map<String, Value>) -> Result<Record> {
        let exact: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|f| map.contains_key(f.canonical_key()))
            .collect();

        let mut name = None;
        let mut team = None;
        let mut photo_url = None;
        let mut status = None;
        let mut confirmed = None;
        let mut seen: Vec<Field> = Vec::new();
        let mut extra = Map::new();

        for (key, value) in map {
            let Some(field) = Field::from_key(&key) else {
                extra.insert(key, value);
                continue;
            };

            let is_exact = key == field.canonical_key();
            if seen.contains(&field) || (!is_exact && exact.contains(&field)) {
                extra.insert(key, value);
                continue;
            }
            seen.push(field);

            match field {
                Field::Name => name = Some(expect_string(index, "name", value)?),
                Field::Team => team = Some(expect_string(index, "team", value)?),
                Field::PhotoUrl => photo_url = optional_string(index, "photoUrl", value)?,
                Field::Status => status = optional_string(index, "status", value)?.map(|s| s.to_lowercase()),
                Field::Confirmed => {
                    confirmed = Some(match value {
                        Value::Bool(b) => Confirmed::Flag(b),
                        other => Confirmed::Legacy(other),
                    })
                }
            }
        }

        Ok(Record {
            name: name.ok_or_else(|| missing(index, "name"))?,
            team: team.ok_or_else(|| missing(index, "team"))?,
            photo_url,
            status,
            confirmed,
            extra,
        })
    }
}

fn missing(index: usize, field: &str) -> Error {
    Error::InvalidRecord {
        index,
        reason: format!("falta el campo `{}`", field),
    }
}

fn expect_string(index: usize, field: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Error::InvalidRecord {
            index,
            reason: format!("`{}` debe ser texto, encontrado {}", field, other),
        }),
    }
}

fn optional_string(index: usize, field: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        other => expect_string(index, field, other).map(Some),
    }
}
