//! Almacén del conjunto de datos
//!
//! Carga todo el archivo en memoria una sola vez y lo reescribe completo en
//! cada guardado. No hay formato incremental ni diario.

use crate::error::{Result, ReviewError};
use player_review_common::{records_from_str, Record};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
    records: Vec<Record>,
}

impl DatasetStore {
    /// Carga el archivo; si no existe o está mal formado devuelve error
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReviewError::DatasetNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let records = records_from_str(&content).map_err(|source| ReviewError::InvalidDataset {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!(path = %path.display(), records = records.len(), "conjunto de datos cargado");
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Como `load`, pero un archivo inexistente da un conjunto vacío
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::with_records(path, Vec::new()))
        }
    }

    pub fn with_records(path: &Path, records: Vec<Record>) -> Self {
        Self {
            path: path.to_path_buf(),
            records,
        }
    }

    /// Serializa toda la colección sobrescribiendo el archivo
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), records = self.records.len(), "conjunto de datos guardado");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    pub fn append(&mut self, record: Record) {
        self.records.push(record);
    }
}
