//! Tipos del conjunto de datos
//!
//! - Tag: etiqueta de categoría (conjunto cerrado)
//! - Confirmed: resultado de la revisión
//! - Record: un jugador del conjunto de datos
//! - ReviewMode / TagFilter: criterios de selección

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Etiqueta de categoría asignada por el etiquetado inicial
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Bufon,
    Leyenda,
    Camiseta,
}

impl Tag {
    pub const ALL: [Tag; 3] = [Tag::Bufon, Tag::Leyenda, Tag::Camiseta];

    /// Valor almacenado (siempre en minúsculas)
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Bufon => "bufon",
            Tag::Leyenda => "leyenda",
            Tag::Camiseta => "camiseta",
        }
    }

    /// Texto para mostrar en menús
    pub fn label(&self) -> &'static str {
        match self {
            Tag::Bufon => "Bufón",
            Tag::Leyenda => "Leyenda",
            Tag::Camiseta => "Camiseta",
        }
    }

    /// Compara con un valor de `status` sin distinguir mayúsculas
    pub fn matches(&self, status: &str) -> bool {
        status.trim().eq_ignore_ascii_case(self.as_str())
    }
}

/// Lectura de lo que escribe el usuario: admite `bufón` con tilde. Los
/// valores almacenados se comparan con `Tag::matches`.
impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bufon" | "bufón" => Ok(Tag::Bufon),
            "leyenda" => Ok(Tag::Leyenda),
            "camiseta" => Ok(Tag::Camiseta),
            _ => Err(Error::UnknownTag(s.to_string())),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Valor del campo `confirmed`
///
/// Solo `Flag(true)` cuenta como confirmado. Los valores heredados que no son
/// booleanos (p. ej. `"true"` como texto) se conservan tal cual y nunca se
/// convierten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confirmed {
    Flag(bool),
    Legacy(Value),
}

impl Confirmed {
    pub fn is_true(&self) -> bool {
        matches!(self, Confirmed::Flag(true))
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Confirmed::Flag(b) => Some(*b),
            Confirmed::Legacy(_) => None,
        }
    }
}

impl From<bool> for Confirmed {
    fn from(value: bool) -> Self {
        Confirmed::Flag(value)
    }
}

/// Resultado de aplicar una decisión de etiqueta a un registro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOutcome {
    /// El registro no tenía etiqueta: no se modifica nada
    Unlabeled,
    /// Misma etiqueta que `status` → `confirmed = true`
    Confirmed,
    /// Etiqueta distinta → `confirmed = false`
    Mismatch,
}

impl LabelOutcome {
    /// true si se asignó `confirmed`
    pub fn changed(&self) -> bool {
        !matches!(self, LabelOutcome::Unlabeled)
    }
}

/// Un jugador del conjunto de datos
///
/// Las claves se normalizan al cargar (ver `normalize`); los campos
/// desconocidos se conservan en `extra` en su orden original.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub name: String,

    pub team: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    /// Etiqueta en minúsculas; None = sin etiquetar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// None = aún no revisado
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<Confirmed>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(name: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into().to_lowercase());
        self
    }

    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    pub fn has_status(&self) -> bool {
        self.status.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// Etiqueta almacenada; solo los valores exactos (sin alias de entrada)
    pub fn status_tag(&self) -> Option<Tag> {
        let status = self.status.as_deref()?;
        Tag::ALL.into_iter().find(|t| t.matches(status))
    }

    /// true si existe el campo `confirmed` (cualquier valor)
    pub fn is_reviewed(&self) -> bool {
        self.confirmed.is_some()
    }

    /// URL de la foto, si no está vacía
    pub fn photo(&self) -> Option<&str> {
        self.photo_url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Concilia la etiqueta elegida por el revisor con `status`.
    ///
    /// `status` nunca se modifica; `confirmed` solo se asigna si el registro
    /// ya tenía etiqueta.
    pub fn reconcile(&mut self, chosen: Tag) -> LabelOutcome {
        let Some(status) = self.status.as_deref().filter(|s| !s.trim().is_empty()) else {
            return LabelOutcome::Unlabeled;
        };

        if chosen.matches(status) {
            self.confirmed = Some(Confirmed::Flag(true));
            LabelOutcome::Confirmed
        } else {
            self.confirmed = Some(Confirmed::Flag(false));
            LabelOutcome::Mismatch
        }
    }
}

/// Modo de revisión
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewMode {
    /// Registros sin `confirmed`
    #[default]
    Unreviewed,
    /// Registros con `confirmed` (true o false)
    Reviewed,
}

impl ReviewMode {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            ReviewMode::Unreviewed => !record.is_reviewed(),
            ReviewMode::Reviewed => record.is_reviewed(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReviewMode::Unreviewed => "Revisar nuevos",
            ReviewMode::Reviewed => "Ver revisados",
        }
    }
}

impl FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unreviewed" | "new" | "nuevos" => Ok(ReviewMode::Unreviewed),
            "reviewed" | "revisados" => Ok(ReviewMode::Reviewed),
            _ => Err(format!("Modo desconocido: {}. Usa unreviewed o reviewed", s)),
        }
    }
}

impl fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewMode::Unreviewed => write!(f, "unreviewed"),
            ReviewMode::Reviewed => write!(f, "reviewed"),
        }
    }
}

/// Conjunto de etiquetas activas (vacío = sin filtro)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter(BTreeSet<Tag>);

impl TagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0.contains(&tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        self.0.iter().copied()
    }

    /// Un registro pasa si no hay filtro o si su `status` está en el conjunto
    pub fn allows(&self, record: &Record) -> bool {
        if self.0.is_empty() {
            return true;
        }
        record.status_tag().is_some_and(|t| self.0.contains(&t))
    }
}

impl FromIterator<Tag> for TagFilter {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
