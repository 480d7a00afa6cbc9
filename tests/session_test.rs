//! Pruebas de la sesión de revisión
//!
//! Conciliación de etiquetas, selección y guardado por lotes contra un
//! archivo real en un directorio temporal.

use player_review::{DatasetStore, Direction, Notice, Phase, ReviewSession};
use player_review_common::{Confirmed, Record, ReviewMode, Tag, TagFilter};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::tempdir;

fn write_dataset(path: &Path, value: Value) {
    std::fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn read_dataset(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn open_session(path: &Path, threshold: usize) -> ReviewSession {
    ReviewSession::new(DatasetStore::load(path).expect("carga fallida"), threshold)
}

fn start(session: &mut ReviewSession, mode: ReviewMode, filter: TagFilter) {
    session.select_mode(mode).unwrap();
    let report = session.start_review(filter, false).unwrap();
    assert!(report.notices.is_empty(), "aviso inesperado: {:?}", report.notices);
}

fn players(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| json!({"name": format!("P{}", i), "team": "T", "status": "bufon"}))
            .collect(),
    )
}

/// Ejemplo completo: A confirmado, B con etiqueta distinta
#[test]
fn test_example_run_and_reviewed_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("players_labeled.json");
    write_dataset(
        &path,
        json!([{"name": "A", "team": "X", "status": "bufon"}, {"name": "B", "team": "Y", "status": "leyenda"}]),
    );

    let mut session = open_session(&path, 5);
    start(&mut session, ReviewMode::Unreviewed, TagFilter::new());
    assert_eq!(session.subset(), &[0, 1]);

    session.label_decision(Tag::Bufon).unwrap();
    let report = session.label_decision(Tag::Camiseta).unwrap();

    // fin del subconjunto: guardado y vuelta al menú
    assert!(report.finished());
    assert!(report.saved);
    assert_eq!(session.phase(), Phase::ModeSelect);

    let records = session.store().records();
    assert_eq!(records[0].confirmed, Some(Confirmed::Flag(true)));
    assert_eq!(records[1].confirmed, Some(Confirmed::Flag(false)));
    assert_eq!(records[1].status.as_deref(), Some("leyenda"));

    let saved = read_dataset(&path);
    assert_eq!(saved[0]["confirmed"], json!(true));
    assert_eq!(saved[1]["confirmed"], json!(false));

    start(&mut session, ReviewMode::Reviewed, TagFilter::new());
    assert_eq!(session.subset(), &[0, 1]);
    session.return_to_menu();

    start(&mut session, ReviewMode::Reviewed, [Tag::Bufon].into_iter().collect());
    assert_eq!(session.subset(), &[0]);
}

/// Etiquetar un jugador sin etiqueta no crea `confirmed` ni cuenta como cambio
#[test]
fn test_unlabeled_record_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    write_dataset(&path, json!([{"Name": "A", "Team": "X"}, {"Name": "B", "Team": "X", "Status": "Camiseta"}]));

    let mut session = open_session(&path, 5);
    start(&mut session, ReviewMode::Unreviewed, TagFilter::new());

    session.label_decision(Tag::Bufon).unwrap();
    assert!(session.store().records()[0].confirmed.is_none());
    assert!(!session.is_dirty());
    assert_eq!(session.unsaved_changes(), 0);

    session.label_decision(Tag::Camiseta).unwrap();
    assert_eq!(session.store().records()[1].confirmed, Some(Confirmed::Flag(true)));

    let saved = read_dataset(&path);
    assert!(saved[0].get("confirmed").is_none());
    assert_eq!(saved[1]["status"], json!("camiseta"));
    assert!(saved[1].get("Status").is_none());
}

/// Tras `threshold - 1` cambios no hay guardado; tras `threshold`, exactamente uno
#[test]
fn test_batched_save_threshold() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    write_dataset(&path, players(8));
    let original = std::fs::read_to_string(&path).unwrap();

    let mut session = open_session(&path, 5);
    start(&mut session, ReviewMode::Unreviewed, TagFilter::new());

    for _ in 0..4 {
        let report = session.label_decision(Tag::Bufon).unwrap();
        assert!(!report.saved);
    }
    assert_eq!(session.flush_count(), 0);
    assert_eq!(session.unsaved_changes(), 4);
    assert!(session.is_dirty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);

    let report = session.label_decision(Tag::Leyenda).unwrap();
    assert!(report.saved);
    assert_eq!(session.flush_count(), 1);
    assert_eq!(session.unsaved_changes(), 0);
    assert!(!session.is_dirty());

    let saved = read_dataset(&path);
    assert_eq!(saved[4]["confirmed"], json!(false));
    assert!(saved[5].get("confirmed").is_none());
}

/// Volver al menú no guarda; salir de la aplicación sí
#[test]
fn test_return_to_menu_keeps_pending_until_shutdown() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    write_dataset(&path, players(3));

    let mut session = open_session(&path, 5);
    start(&mut session, ReviewMode::Unreviewed, TagFilter::new());
    session.label_decision(Tag::Bufon).unwrap();
    session.return_to_menu();

    assert_eq!(session.phase(), Phase::ModeSelect);
    assert!(session.is_dirty());
    assert!(read_dataset(&path)[0].get("confirmed").is_none());

    assert!(session.shutdown().unwrap());
    assert!(!session.is_dirty());
    assert_eq!(session.unsaved_changes(), 0);
    assert_eq!(read_dataset(&path)[0]["confirmed"], json!(true));

    // nada pendiente: no se vuelve a escribir
    assert!(!session.shutdown().unwrap());
    assert_eq!(session.flush_count(), 1);
}

/// "Siguiente" tras el último informa del final y guarda lo pendiente sin
/// modificar registros
#[test]
fn test_next_past_end_flushes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    write_dataset(&path, players(2));

    let mut session = open_session(&path, 5);
    start(&mut session, ReviewMode::Unreviewed, TagFilter::new());
    session.label_decision(Tag::Leyenda).unwrap();
    assert_eq!(session.position(), Some((1, 2)));

    let report = session.advance(Direction::Next).unwrap();
    assert!(report.has(&Notice::Finished { total: 2 }));
    assert!(report.saved);
    assert_eq!(session.phase(), Phase::Reviewing);
    assert_eq!(session.position(), Some((1, 2)));
    assert!(session.store().records()[1].confirmed.is_none());
    assert_eq!(read_dataset(&path)[0]["confirmed"], json!(false));

    // sin nada pendiente solo se informa
    let report = session.advance(Direction::Next).unwrap();
    assert!(report.finished());
    assert!(!report.saved);
    assert_eq!(session.flush_count(), 1);
}

/// Navegación adelante y atrás dentro de los límites
#[test]
fn test_navigation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    write_dataset(&path, players(3));

    let mut session = open_session(&path, 5);
    start(&mut session, ReviewMode::Unreviewed, TagFilter::new());

    assert!(session.advance(Direction::Previous).unwrap().has(&Notice::AlreadyAtStart));
    session.advance(Direction::Next).unwrap();
    session.advance(Direction::Next).unwrap();
    assert_eq!(session.current().map(|r| r.name.as_str()), Some("P2"));
    session.advance(Direction::Previous).unwrap();
    assert_eq!(session.current().map(|r| r.name.as_str()), Some("P1"));
}

/// Selección vacía: aviso y vuelta a ModeSelect
#[test]
fn test_empty_selection_returns_to_mode_select() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    write_dataset(&path, players(2));

    let mut session = open_session(&path, 5);
    session.select_mode(ReviewMode::Reviewed).unwrap();
    let report = session.start_review(TagFilter::new(), false).unwrap();

    assert!(report.has(&Notice::EmptySelection));
    assert_eq!(session.phase(), Phase::ModeSelect);
    assert!(session.current().is_none());
}

/// El subconjunto no se recalcula al etiquetar
#[test]
fn test_subset_is_a_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    write_dataset(&path, players(3));

    let mut session = open_session(&path, 5);
    start(&mut session, ReviewMode::Unreviewed, TagFilter::new());

    session.label_decision(Tag::Bufon).unwrap();
    session.advance(Direction::Previous).unwrap();

    // P0 ya está revisado pero sigue en el subconjunto de "no revisados"
    assert_eq!(session.subset(), &[0, 1, 2]);
    assert_eq!(session.current().map(|r| r.name.as_str()), Some("P0"));
    assert!(session.current().is_some_and(Record::is_reviewed));
}

/// Un guardado fallido no reinicia los contadores y se informa
#[test]
fn test_failed_save_keeps_counters() {
    let dir = tempdir().unwrap();
    let missing_dir = dir.path().join("no-existe");
    let path = missing_dir.join("data.json");
    let records = (0..3).map(|i| Record::new(format!("P{}", i), "T").with_status("leyenda")).collect();
    let mut session = ReviewSession::new(DatasetStore::with_records(&path, records), 1);

    session.select_mode(ReviewMode::Unreviewed).unwrap();
    session.start_review(TagFilter::new(), false).unwrap();

    let report = session.label_decision(Tag::Leyenda).unwrap();
    assert!(!report.saved);
    assert!(report.notices.iter().any(|n| matches!(n, Notice::SaveFailed(_))));
    assert_eq!(session.unsaved_changes(), 1);
    assert!(session.is_dirty());

    std::fs::create_dir_all(&missing_dir).unwrap();
    let report = session.label_decision(Tag::Leyenda).unwrap();
    assert!(report.saved);
    assert_eq!(session.unsaved_changes(), 0);
    assert_eq!(read_dataset(&path)[1]["confirmed"], json!(true));
}
