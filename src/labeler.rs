//! Etiquetado inicial
//!
//! Asigna la primera etiqueta a los jugadores del archivo de entrada que aún
//! no la tienen y los añade al conjunto de datos, guardando después de cada
//! asignación. Los jugadores cuyo nombre ya está en el conjunto se omiten, así
//! que se puede retomar donde se dejó.

use crate::dataset::DatasetStore;
use crate::error::Result;
use crate::fetcher::{PhotoFetcher, PhotoSource, PhotoState};
use crate::interactive::{print_photo, prompt_error};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use player_review_common::{records_from_str, Record, Tag};
use std::path::Path;
use std::time::{Duration, Instant};

/// Lee el archivo de jugadores sin etiquetar (acepta BOM UTF-8)
pub fn load_players(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    Ok(records_from_str(&content)?)
}

/// Jugadores sin campo `status` que todavía no están en `labeled`. Un
/// `status` vacío cuenta como ya etiquetado.
pub fn pending_players(players: Vec<Record>, labeled: &DatasetStore) -> Vec<Record> {
    players
        .into_iter()
        .filter(|p| p.status.is_none() && !labeled.contains_name(&p.name))
        .collect()
}

/// Etiqueta un jugador, lo añade y guarda el conjunto completo
pub fn apply_label(store: &mut DatasetStore, mut player: Record, tag: Tag) -> Result<()> {
    player.status = Some(tag.as_str().to_string());
    player.confirmed = None;
    store.append(player);
    store.save()
}

pub fn run_labeling<S: PhotoSource>(
    players: Vec<Record>,
    store: &mut DatasetStore,
    fetcher: &mut PhotoFetcher<S>,
    preview_dir: &Path,
    photo_wait: Duration,
) -> Result<usize> {
    let pending = pending_players(players, store);
    if pending.is_empty() {
        println!("✓ No quedan jugadores sin etiquetar");
        return Ok(0);
    }

    println!("🏷  Jugadores sin etiquetar: {}", pending.len());
    let theme = ColorfulTheme::default();
    let mut items: Vec<&str> = Tag::ALL.iter().map(Tag::label).collect();
    items.push("Salir");

    let total = pending.len();
    let mut labeled = 0;

    for (count, player) in pending.into_iter().enumerate() {
        println!("\n[{}/{}] {} - {}", count + 1, total, player.name, player.team);

        let state = wait_for_photo(fetcher, player.photo(), photo_wait);
        print_photo(&state, preview_dir)?;

        let choice = Select::with_theme(&theme)
            .items(&items)
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        let Some(&tag) = Tag::ALL.get(choice) else {
            println!("Progreso guardado.");
            break;
        };

        apply_label(store, player, tag)?;
        labeled += 1;
    }

    println!("\n✓ {} jugadores etiquetados. Guardado en: {}", labeled, store.path().display());
    Ok(labeled)
}

/// El etiquetado es secuencial: espera como máximo `limit` a la foto del
/// jugador actual antes de preguntar
fn wait_for_photo<S: PhotoSource>(fetcher: &mut PhotoFetcher<S>, url: Option<&str>, limit: Duration) -> PhotoState {
    let state = fetcher.request(url);
    let Some(url) = url.map(str::trim) else {
        return state;
    };
    if !matches!(state, PhotoState::Loading) {
        return state;
    }

    let deadline = Instant::now() + limit;
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        match fetcher.wait_next(remaining) {
            Some(delivery) if delivery.url == url => return delivery.state,
            Some(_) => continue,
            None => break,
        }
    }
    PhotoState::Loading
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pending_skips_labeled_and_known_names() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::with_records(
            &dir.path().join("out.json"),
            vec![Record::new("A", "X").with_status("bufon")],
        );
        let players = vec![
            Record::new("A", "X"),
            Record::new("B", "Y").with_status("leyenda"),
            Record::new("C", "Z"),
            Record::new("D", "Z").with_status(""),
        ];

        let pending = pending_players(players, &store);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "C");
    }

    #[test]
    fn test_apply_label_saves_every_time() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut store = DatasetStore::load_or_empty(&path).unwrap();

        apply_label(&mut store, Record::new("C", "Z"), Tag::Camiseta).unwrap();

        let reloaded = DatasetStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.records()[0].status.as_deref(), Some("camiseta"));
        assert!(reloaded.records()[0].confirmed.is_none());
    }
}
