//! Definición de errores

use thiserror::Error;

/// Error común
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("registro {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("el conjunto de datos debe ser una lista JSON de registros")]
    NotAnArray,

    #[error("etiqueta desconocida: {0}")]
    UnknownTag(String),
}

/// Alias de Result
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_invalid_record() {
        let error = Error::InvalidRecord { index: 3, reason: "falta el campo `name`".to_string() };
        assert_eq!(format!("{}", error), "registro 3: falta el campo `name`");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
