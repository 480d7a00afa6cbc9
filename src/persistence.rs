//! Guardado por lotes
//!
//! Cada asignación de `confirmed` incrementa el contador y marca el conjunto
//! como sucio. Al llegar al umbral se guarda todo el archivo; al terminar la
//! sesión o al salir se guarda lo pendiente sin importar el umbral.

/// Contador de cambios sin guardar
#[derive(Debug, Clone)]
pub struct BatchedWriter {
    threshold: usize,
    unsaved: usize,
    dirty: bool,
    flushes: usize,
}

impl BatchedWriter {
    pub const DEFAULT_THRESHOLD: usize = 5;

    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
            unsaved: 0,
            dirty: false,
            flushes: 0,
        }
    }

    /// Registra un cambio. Devuelve true si se alcanzó el umbral.
    pub fn record_change(&mut self) -> bool {
        self.dirty = true;
        self.unsaved += 1;
        tracing::trace!(unsaved = self.unsaved, threshold = self.threshold, "cambio pendiente");
        self.threshold_reached()
    }

    pub fn threshold_reached(&self) -> bool {
        self.unsaved >= self.threshold
    }

    /// Hay algo pendiente de guardar
    pub fn needs_flush(&self) -> bool {
        self.dirty || self.unsaved > 0
    }

    /// Se llama solo después de un guardado correcto
    pub fn mark_flushed(&mut self) {
        self.unsaved = 0;
        self.dirty = false;
        self.flushes += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn unsaved(&self) -> usize {
        self.unsaved
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Guardados completos realizados
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl Default for BatchedWriter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
