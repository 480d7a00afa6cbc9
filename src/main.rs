use anyhow::{Context, Result};
use clap::Parser;
use player_review::cli::{Cli, Commands};
use player_review::config::Config;
use player_review::interactive::InteractiveReview;
use player_review::{labeler, logging};
use player_review::{DatasetStore, HttpSource, PhotoFetcher, ReviewSession};
use player_review_common::tally;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load()?;
    let dataset_path = cli.dataset.clone().unwrap_or_else(|| config.dataset_path.clone());

    match cli.command {
        Commands::Review { threshold, preview_dir } => {
            let store = DatasetStore::load(&dataset_path)
                .with_context(|| format!("no se pudo cargar {}", dataset_path.display()))?;

            let runtime = tokio::runtime::Runtime::new()?;
            let source = HttpSource::new(config.fetch_timeout())?;
            let mut fetcher = PhotoFetcher::new(
                source,
                runtime.handle().clone(),
                config.fetch_timeout(),
                config.photo_size,
            );
            let mut session = ReviewSession::new(store, threshold.unwrap_or(config.save_threshold));
            let preview_dir = preview_dir.unwrap_or_else(|| config.preview_dir());

            let result = InteractiveReview::new(&mut session, &mut fetcher, &preview_dir).run();

            // guardar lo pendiente aunque el bucle haya fallado
            let flushed = session.shutdown();
            drop(fetcher);
            runtime.shutdown_background();

            result?;
            if flushed.context("no se pudieron guardar los cambios pendientes")? {
                println!("✔ Cambios pendientes guardados: {}", dataset_path.display());
            }
            println!("\n✅ Revisión terminada");
        }

        Commands::Label { input, photo_wait } => {
            let players = labeler::load_players(&input)
                .with_context(|| format!("no se pudo leer {}", input.display()))?;
            let mut store = DatasetStore::load_or_empty(&dataset_path)
                .with_context(|| format!("no se pudo cargar {}", dataset_path.display()))?;

            let runtime = tokio::runtime::Runtime::new()?;
            let source = HttpSource::new(config.fetch_timeout())?;
            let mut fetcher = PhotoFetcher::new(
                source,
                runtime.handle().clone(),
                config.fetch_timeout(),
                config.photo_size,
            );

            labeler::run_labeling(
                players,
                &mut store,
                &mut fetcher,
                &config.preview_dir(),
                Duration::from_secs(photo_wait),
            )?;

            drop(fetcher);
            runtime.shutdown_background();
        }

        Commands::Tally { json } => {
            let store = DatasetStore::load(&dataset_path)
                .with_context(|| format!("no se pudo cargar {}", dataset_path.display()))?;
            let result = tally(store.records());

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", result);
            }
        }

        Commands::Config { set_dataset, set_threshold, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(path) = set_dataset {
                config.dataset_path = path;
                changed = true;
            }

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ Configuración guardada");
            }

            if show || !changed {
                println!("Configuración:");
                println!("  Archivo de datos: {}", config.dataset_path.display());
                println!("  Umbral de guardado: {}", config.save_threshold);
                println!("  Tiempo límite de descarga: {}s", config.fetch_timeout_seconds);
                println!("  Tamaño de foto: {}px", config.photo_size);
                println!("  Vista previa: {}", config.preview_dir().display());
            }
        }
    }

    Ok(())
}
