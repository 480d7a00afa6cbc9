//! Configuración de logs estructurados
//!
//! - Filtro `RUST_LOG` (por defecto `player_review=warn`, `debug` con `--verbose`)
//! - Salida a stderr para no mezclarse con los menús interactivos

use tracing_subscriber::EnvFilter;

/// Inicializa el subscriber global. Las llamadas repetidas no tienen efecto.
pub fn init(verbose: bool) {
    let default = if verbose {
        "player_review=debug,player_review_common=debug"
    } else {
        "player_review=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
