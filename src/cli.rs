use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "player-review")]
#[command(about = "Revisión y confirmación de etiquetas de jugadores", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Logs detallados
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Archivo de datos (por defecto el de la configuración)
    #[arg(short, long, global = true)]
    pub dataset: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Revisar jugadores ya etiquetados
    Review {
        /// Cambios acumulados antes de guardar
        #[arg(long)]
        threshold: Option<usize>,

        /// Carpeta donde se escribe la foto actual
        #[arg(long)]
        preview_dir: Option<PathBuf>,
    },

    /// Asignar la primera etiqueta a jugadores sin etiquetar
    Label {
        /// Archivo JSON con los jugadores (p. ej. players.txt)
        #[arg(required = true)]
        input: PathBuf,

        /// Segundos de espera por la foto de cada jugador
        #[arg(long, default_value = "5")]
        photo_wait: u64,
    },

    /// Contar confirmados / no confirmados por etiqueta
    Tally {
        /// Salida en JSON
        #[arg(long)]
        json: bool,
    },

    /// Mostrar/editar la configuración
    Config {
        /// Archivo de datos por defecto
        #[arg(long)]
        set_dataset: Option<PathBuf>,

        /// Umbral de guardado por lotes
        #[arg(long)]
        set_threshold: Option<usize>,

        /// Mostrar la configuración
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_review_with_global_dataset() {
        let cli = Cli::try_parse_from(["player-review", "review", "--dataset", "x.json", "--threshold", "3"]).unwrap();
        assert_eq!(cli.dataset, Some(PathBuf::from("x.json")));
        assert!(matches!(cli.command, Commands::Review { threshold: Some(3), .. }));
    }

    #[test]
    fn test_label_requires_input() {
        assert!(Cli::try_parse_from(["player-review", "label"]).is_err());
    }
}
