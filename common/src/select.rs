//! Selección del subconjunto de trabajo

use crate::types::{Record, ReviewMode, TagFilter};

/// Devuelve los índices de los registros que cumplen el modo y el filtro,
/// en el orden del conjunto de datos.
///
/// Función pura: se puede volver a ejecutar cada vez que cambian el modo o los
/// filtros. Un resultado vacío no es un error.
pub fn select(records: &[Record], mode: ReviewMode, filter: &TagFilter) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| mode.matches(r) && filter.allows(r))
        .map(|(i, _)| i)
        .collect()
}
