//! Recuento por etiqueta
//!
//! Solo el booleano literal `true` cuenta como confirmado; textos o números
//! (`"true"`, `1`) cuentan como no confirmados.

use crate::types::{Record, Tag};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub confirmed: usize,
    pub not_confirmed: usize,
}

impl TagCount {
    pub fn total(&self) -> usize {
        self.confirmed + self.not_confirmed
    }
}

/// Recuento de confirmados / no confirmados por etiqueta
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    counts: BTreeMap<Tag, TagCount>,
}

impl Tally {
    pub fn get(&self, tag: Tag) -> TagCount {
        self.counts.get(&tag).copied().unwrap_or_default()
    }

    /// Registros contados (con etiqueta conocida)
    pub fn total(&self) -> usize {
        self.counts.values().map(TagCount::total).sum()
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in Tag::ALL {
            let count = self.get(tag);
            writeln!(f, "{}_confirmed: {}", tag, count.confirmed)?;
            writeln!(f, "{}_not_confirmed: {}", tag, count.not_confirmed)?;
        }
        Ok(())
    }
}

pub fn tally(records: &[Record]) -> Tally {
    let mut counts: BTreeMap<Tag, TagCount> = Tag::ALL.into_iter().map(|t| (t, TagCount::default())).collect();

    for record in records {
        let Some(tag) = record.status_tag() else {
            continue;
        };
        let entry = counts.entry(tag).or_default();
        if record.confirmed.as_ref().is_some_and(|c| c.is_true()) {
            entry.confirmed += 1;
        } else {
            entry.not_confirmed += 1;
        }
    }

    Tally { counts }
}
