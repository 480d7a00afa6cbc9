//! Sesión de revisión
//!
//! Máquina de estados: `ModeSelect → FilterSelect → Reviewing → ModeSelect`.
//!
//! El subconjunto de trabajo es una lista de índices al almacén, calculada al
//! iniciar la revisión y no recalculada mientras se etiqueta: un registro que
//! deja de cumplir el filtro sigue en la lista hasta la próxima revisión.

use crate::dataset::DatasetStore;
use crate::error::{Result, ReviewError};
use crate::persistence::BatchedWriter;
use player_review_common::{select, LabelOutcome, Record, ReviewMode, Tag, TagFilter};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ModeSelect,
    FilterSelect,
    Reviewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Avisos informativos (no son errores)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Los filtros no dejan ningún registro
    EmptySelection,
    AlreadyAtStart,
    /// Se recorrió todo el subconjunto
    Finished { total: usize },
    /// El guardado falló; los cambios siguen pendientes
    SaveFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::EmptySelection => write!(f, "No hay jugadores que coincidan con los filtros."),
            Notice::AlreadyAtStart => write!(f, "Este es el primer jugador."),
            Notice::Finished { total } => write!(f, "No hay más jugadores ({} revisados en esta pasada).", total),
            Notice::SaveFailed(e) => write!(f, "No se pudo guardar: {}. Se reintentará más tarde.", e),
        }
    }
}

/// Lo que ocurrió en una operación
#[derive(Debug, Default)]
pub struct Report {
    pub outcome: Option<LabelOutcome>,
    /// Se hizo un guardado completo durante la operación
    pub saved: bool,
    pub notices: Vec<Notice>,
}

impl Report {
    pub fn has(&self, notice: &Notice) -> bool {
        self.notices.contains(notice)
    }

    pub fn finished(&self) -> bool {
        self.notices.iter().any(|n| matches!(n, Notice::Finished { .. }))
    }
}

pub struct ReviewSession {
    store: DatasetStore,
    writer: BatchedWriter,
    phase: Phase,
    mode: ReviewMode,
    filter: TagFilter,
    hide_tag: bool,
    subset: Vec<usize>,
    cursor: usize,
}

impl ReviewSession {
    pub fn new(store: DatasetStore, save_threshold: usize) -> Self {
        Self {
            store,
            writer: BatchedWriter::new(save_threshold),
            phase: Phase::ModeSelect,
            mode: ReviewMode::default(),
            filter: TagFilter::new(),
            hide_tag: false,
            subset: Vec::new(),
            cursor: 0,
        }
    }

    fn expect_phase(&self, expected: Phase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ReviewError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn reset_to_mode_select(&mut self) {
        self.phase = Phase::ModeSelect;
        self.subset.clear();
        self.cursor = 0;
    }

    /// ModeSelect → FilterSelect
    pub fn select_mode(&mut self, mode: ReviewMode) -> Result<()> {
        self.expect_phase(Phase::ModeSelect)?;
        self.mode = mode;
        self.phase = Phase::FilterSelect;
        Ok(())
    }

    /// FilterSelect → ModeSelect ("Volver")
    pub fn back_to_mode_select(&mut self) -> Result<()> {
        self.expect_phase(Phase::FilterSelect)?;
        self.reset_to_mode_select();
        Ok(())
    }

    /// FilterSelect → Reviewing, o → ModeSelect si no hay registros
    pub fn start_review(&mut self, filter: TagFilter, hide_tag: bool) -> Result<Report> {
        self.expect_phase(Phase::FilterSelect)?;
        let mut report = Report::default();

        self.subset = select(self.store.records(), self.mode, &filter);
        self.filter = filter;
        self.hide_tag = hide_tag;
        self.cursor = 0;

        if self.subset.is_empty() {
            tracing::info!(mode = %self.mode, "selección vacía");
            report.notices.push(Notice::EmptySelection);
            self.reset_to_mode_select();
        } else {
            tracing::info!(mode = %self.mode, records = self.subset.len(), "revisión iniciada");
            self.phase = Phase::Reviewing;
        }
        Ok(report)
    }

    /// Aplica la etiqueta elegida al registro actual y avanza.
    ///
    /// Al pasar del último registro se guarda lo pendiente y se vuelve a
    /// ModeSelect.
    pub fn label_decision(&mut self, tag: Tag) -> Result<Report> {
        self.expect_phase(Phase::Reviewing)?;
        let mut report = Report::default();

        let index = self.subset[self.cursor];
        let outcome = match self.store.get_mut(index) {
            Some(record) => record.reconcile(tag),
            None => LabelOutcome::Unlabeled,
        };
        tracing::debug!(index, tag = %tag, ?outcome, "decisión aplicada");
        report.outcome = Some(outcome);

        if outcome.changed() && self.writer.record_change() {
            self.flush(&mut report);
        }

        if !self.step_next(&mut report) {
            self.reset_to_mode_select();
        }
        Ok(report)
    }

    /// Mueve el cursor sin modificar registros
    pub fn advance(&mut self, direction: Direction) -> Result<Report> {
        self.expect_phase(Phase::Reviewing)?;
        let mut report = Report::default();

        match direction {
            Direction::Next => {
                self.step_next(&mut report);
            }
            Direction::Previous => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                } else {
                    report.notices.push(Notice::AlreadyAtStart);
                }
            }
        }
        Ok(report)
    }

    /// Devuelve false si ya no quedan registros (y guarda lo pendiente)
    fn step_next(&mut self, report: &mut Report) -> bool {
        if self.cursor + 1 < self.subset.len() {
            self.cursor += 1;
            return true;
        }

        report.notices.push(Notice::Finished {
            total: self.subset.len(),
        });
        if self.writer.needs_flush() {
            self.flush(report);
        }
        false
    }

    /// Vuelve al menú en cualquier momento, sin forzar el guardado
    pub fn return_to_menu(&mut self) {
        self.reset_to_mode_select();
    }

    /// Guarda lo pendiente al cerrar la aplicación
    pub fn shutdown(&mut self) -> Result<bool> {
        self.reset_to_mode_select();
        if !self.writer.needs_flush() {
            return Ok(false);
        }

        self.store.save()?;
        self.writer.mark_flushed();
        tracing::info!(path = %self.store.path().display(), "cambios pendientes guardados al salir");
        Ok(true)
    }

    fn flush(&mut self, report: &mut Report) {
        match self.store.save() {
            Ok(()) => {
                self.writer.mark_flushed();
                report.saved = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, unsaved = self.writer.unsaved(), "guardado fallido");
                report.notices.push(Notice::SaveFailed(e.to_string()));
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> ReviewMode {
        self.mode
    }

    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    pub fn hide_tag(&self) -> bool {
        self.hide_tag
    }

    /// Registro bajo el cursor (solo en Reviewing)
    pub fn current(&self) -> Option<&Record> {
        if self.phase != Phase::Reviewing {
            return None;
        }
        self.subset.get(self.cursor).and_then(|&i| self.store.get(i))
    }

    /// (posición 0-based, tamaño del subconjunto)
    pub fn position(&self) -> Option<(usize, usize)> {
        (self.phase == Phase::Reviewing).then_some((self.cursor, self.subset.len()))
    }

    pub fn subset(&self) -> &[usize] {
        &self.subset
    }

    pub fn is_dirty(&self) -> bool {
        self.writer.is_dirty()
    }

    pub fn unsaved_changes(&self) -> usize {
        self.writer.unsaved()
    }

    pub fn flush_count(&self) -> usize {
        self.writer.flushes()
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }
}
