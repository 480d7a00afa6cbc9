//! Revisión y confirmación de etiquetas de jugadores
//!
//! - `dataset`: carga y guardado completo del archivo JSON
//! - `fetcher`: descarga y caché de fotos sin bloquear
//! - `persistence`: guardado por lotes
//! - `session`: máquina de estados de la revisión
//! - `interactive` / `labeler`: interfaz de terminal

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fetcher;
pub mod interactive;
pub mod labeler;
pub mod logging;
pub mod persistence;
pub mod session;

pub use dataset::DatasetStore;
pub use error::{Result, ReviewError};
pub use fetcher::{HttpSource, PhotoFetcher, PhotoSource, PhotoState};
pub use persistence::BatchedWriter;
pub use session::{Direction, Notice, Phase, Report, ReviewSession};
