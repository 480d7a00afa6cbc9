use thiserror::Error;

use crate::session::Phase;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("No se encontró el archivo de datos: {0}")]
    DatasetNotFound(String),

    #[error("Archivo de datos no válido ({path}): {source}")]
    InvalidDataset {
        path: String,
        #[source]
        source: player_review_common::Error,
    },

    #[error("Operación no permitida en el estado {actual:?} (se esperaba {expected:?})")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("Error de entrada interactiva: {0}")]
    Prompt(String),

    #[error("Error de JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Error de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] player_review_common::Error),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
