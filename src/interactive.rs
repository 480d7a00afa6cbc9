//! Revisión interactiva en terminal
//!
//! Conduce la `ReviewSession` con menús de dialoguer. Este hilo es el único
//! que toca la sesión y la caché de fotos: los resultados de descarga se
//! aplican con `drain` al principio de cada vuelta del bucle.

use crate::error::{Result, ReviewError};
use crate::fetcher::{PhotoFetcher, PhotoSource, PhotoState};
use crate::session::{Direction, Phase, Report, ReviewSession};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, MultiSelect, Select};
use player_review_common::{Confirmed, Record, ReviewMode, Tag, TagFilter};
use std::path::{Path, PathBuf};

const PREVIEW_FILE: &str = "current.png";

/// Acciones sobre el jugador actual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Label(Tag),
    Previous,
    Next,
    RefreshPhoto,
    Menu,
    Quit,
}

impl ReviewAction {
    pub const ALL: [ReviewAction; 8] = [
        ReviewAction::Label(Tag::Bufon),
        ReviewAction::Label(Tag::Leyenda),
        ReviewAction::Label(Tag::Camiseta),
        ReviewAction::Previous,
        ReviewAction::Next,
        ReviewAction::RefreshPhoto,
        ReviewAction::Menu,
        ReviewAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReviewAction::Label(tag) => tag.label(),
            ReviewAction::Previous => "← Anterior",
            ReviewAction::Next => "Siguiente →",
            ReviewAction::RefreshPhoto => "Actualizar foto",
            ReviewAction::Menu => "Volver al menú",
            ReviewAction::Quit => "Salir",
        }
    }
}

/// Líneas que describen al jugador actual
pub fn describe_record(record: &Record, position: (usize, usize), hide_tag: bool) -> Vec<String> {
    let mut lines = vec![
        format!("Jugador {} de {}", position.0 + 1, position.1),
        record.name.clone(),
        format!("Equipo: {}", record.team),
    ];

    if !hide_tag {
        let status = record.status.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or("Sin etiqueta");
        lines.push(format!("Etiqueta actual: {}", status));
    }

    match &record.confirmed {
        Some(Confirmed::Flag(value)) => lines.push(format!("Confirmado: {}", value)),
        Some(Confirmed::Legacy(value)) => lines.push(format!("Confirmado (valor heredado): {}", value)),
        None => {}
    }

    lines
}

pub struct InteractiveReview<'a, S: PhotoSource> {
    session: &'a mut ReviewSession,
    fetcher: &'a mut PhotoFetcher<S>,
    preview_dir: PathBuf,
    theme: ColorfulTheme,
}

impl<'a, S: PhotoSource> InteractiveReview<'a, S> {
    pub fn new(session: &'a mut ReviewSession, fetcher: &'a mut PhotoFetcher<S>, preview_dir: &Path) -> Self {
        Self {
            session,
            fetcher,
            preview_dir: preview_dir.to_path_buf(),
            theme: ColorfulTheme::default(),
        }
    }

    /// Bucle principal; vuelve cuando el usuario elige "Salir".
    /// El guardado final lo hace quien llama con `ReviewSession::shutdown`.
    pub fn run(&mut self) -> Result<()> {
        println!("📋 {} jugadores cargados de {}\n", self.session.store().len(), self.session.store().path().display());

        loop {
            self.apply_photo_results();

            let keep_going = match self.session.phase() {
                Phase::ModeSelect => self.mode_screen()?,
                Phase::FilterSelect => self.filter_screen()?,
                Phase::Reviewing => self.review_screen()?,
            };

            if !keep_going {
                return Ok(());
            }
        }
    }

    fn mode_screen(&mut self) -> Result<bool> {
        let items = [ReviewMode::Unreviewed.label(), ReviewMode::Reviewed.label(), "Salir"];
        let default = match self.session.mode() {
            ReviewMode::Unreviewed => 0,
            ReviewMode::Reviewed => 1,
        };

        let choice = Select::with_theme(&self.theme)
            .with_prompt("Selecciona modo de revisión")
            .items(&items)
            .default(default)
            .interact()
            .map_err(prompt_error)?;

        let mode = match choice {
            0 => ReviewMode::Unreviewed,
            1 => ReviewMode::Reviewed,
            _ => return Ok(false),
        };
        self.session.select_mode(mode)?;
        Ok(true)
    }

    fn filter_screen(&mut self) -> Result<bool> {
        println!("\nModo: {}", self.session.mode());

        let labels: Vec<&str> = Tag::ALL.iter().map(Tag::label).collect();
        let checked: Vec<bool> = Tag::ALL.iter().map(|t| self.session.filter().contains(*t)).collect();
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt("Filtrar por etiquetas (ninguna = todas)")
            .items(&labels)
            .defaults(&checked)
            .interact()
            .map_err(prompt_error)?;
        let filter: TagFilter = picked.into_iter().map(|i| Tag::ALL[i]).collect();

        let hide_tag = Confirm::with_theme(&self.theme)
            .with_prompt("Ocultar etiquetas actuales")
            .default(self.session.hide_tag())
            .interact()
            .map_err(prompt_error)?;

        let next = Select::with_theme(&self.theme)
            .items(&["Iniciar revisión", "Volver"])
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        if next == 1 {
            self.session.back_to_mode_select()?;
            return Ok(true);
        }

        let report = self.session.start_review(filter, hide_tag)?;
        print_report(&report);
        Ok(true)
    }

    fn review_screen(&mut self) -> Result<bool> {
        let (Some(record), Some(position)) = (self.session.current(), self.session.position()) else {
            self.session.return_to_menu();
            return Ok(true);
        };

        println!();
        for line in describe_record(record, position, self.session.hide_tag()) {
            println!("  {}", line);
        }

        let state = self.fetcher.request(record.photo());
        self.show_photo(&state)?;
        if let Some(hint) = photo_hint(&state) {
            println!("  {}", hint);
        }

        let labels: Vec<&str> = ReviewAction::ALL.iter().map(ReviewAction::label).collect();
        let choice = Select::with_theme(&self.theme)
            .items(&labels)
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        let report = match ReviewAction::ALL[choice] {
            ReviewAction::Label(tag) => self.session.label_decision(tag)?,
            ReviewAction::Previous => self.session.advance(Direction::Previous)?,
            ReviewAction::Next => self.session.advance(Direction::Next)?,
            ReviewAction::RefreshPhoto => return Ok(true),
            ReviewAction::Menu => {
                self.session.return_to_menu();
                return Ok(true);
            }
            ReviewAction::Quit => return Ok(false),
        };

        print_report(&report);
        Ok(true)
    }

    /// Aplica los resultados de descarga a la caché. El jugador actual se
    /// vuelve a pintar en cada vuelta, así que aquí no se imprime nada; un
    /// resultado de un jugador que ya no se muestra solo queda en caché.
    fn apply_photo_results(&mut self) {
        for delivery in self.fetcher.drain() {
            tracing::debug!(url = %delivery.url, ready = delivery.state.is_ready(), "resultado de foto aplicado");
        }
    }

    fn show_photo(&self, state: &PhotoState) -> Result<()> {
        print_photo(state, &self.preview_dir)
    }
}

/// Muestra el estado de la foto; una foto lista se escribe como PNG en
/// `preview_dir` y se imprime su ruta
pub(crate) fn print_photo(state: &PhotoState, preview_dir: &Path) -> Result<()> {
    match state {
        PhotoState::Missing => println!("  [Foto no disponible]"),
        PhotoState::Loading => println!("  Cargando foto..."),
        PhotoState::Ready(photo) => {
            std::fs::create_dir_all(preview_dir)?;
            let path = preview_dir.join(PREVIEW_FILE);
            match photo.save(&path) {
                Ok(()) => println!("  Foto: {}", path.display()),
                Err(e) => {
                    tracing::warn!(error = %e, "no se pudo escribir la vista previa");
                    println!("  [Foto no disponible]");
                }
            }
        }
    }
    Ok(())
}

/// La foto que llega mientras el menú espera no se pinta sola
fn photo_hint(state: &PhotoState) -> Option<&'static str> {
    matches!(state, PhotoState::Loading).then_some("(elige «Actualizar foto» para verla cuando termine)")
}

fn print_report(report: &Report) {
    if report.saved {
        println!("  ✔ Cambios guardados");
    }
    for notice in &report.notices {
        println!("  ℹ {}", notice);
    }
}

pub(crate) fn prompt_error(e: dialoguer::Error) -> ReviewError {
    ReviewError::Prompt(e.to_string())
}
