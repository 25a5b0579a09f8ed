use rusqlite::Connection;
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;
use welllog_core::db::{open_db, open_db_in_memory};
use welllog_core::{
    Depth, Layer, LayerPatch, LayerService, Lithology, NewLayer, NewWell, RepoError,
    SqliteLayerRepository, SqliteWellRepository, ValidationError, WellId, WellRepository,
};

fn m(value: i64) -> Depth {
    Depth::from_whole_meters(value)
}

fn setup() -> (Connection, WellId) {
    let conn = open_db_in_memory().unwrap();
    let well_id = create_well(&conn);
    (conn, well_id)
}

fn create_well(conn: &Connection) -> WellId {
    SqliteWellRepository::try_new(conn)
        .unwrap()
        .create_well(&NewWell::new("W-1", "North", "Dam", m(20)))
        .unwrap()
        .id
}

fn service(conn: &Connection) -> LayerService<SqliteLayerRepository<'_>> {
    LayerService::new(SqliteLayerRepository::try_new(conn).unwrap())
}

fn add(
    service: &LayerService<SqliteLayerRepository<'_>>,
    well_id: WellId,
    start: Depth,
    end: Depth,
) -> Result<Layer, RepoError> {
    service.add_layer(NewLayer::new(well_id, start, end, Lithology::Loam))
}

fn layer_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM layers;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn add_and_get_roundtrip_with_thickness() {
    let (conn, well_id) = setup();
    let layers = service(&conn);

    let created = layers
        .add_layer(
            NewLayer::new(well_id, "0.25".parse().unwrap(), m(2), Lithology::SandyLoam)
                .with_description("  wet, grey  "),
        )
        .unwrap();
    assert_eq!(created.well_id, well_id);
    assert_eq!(created.description, "wet, grey");

    let loaded = layers.get_layer(created.id).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.thickness().to_string(), "1.75");
}

#[test]
fn end_not_after_start_is_rejected_and_not_persisted() {
    let (conn, well_id) = setup();
    let layers = service(&conn);

    for (start, end) in [(m(2), m(2)), (m(3), m(1))] {
        let err = add(&layers, well_id, start, end).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(ValidationError::EndNotAfterStart { .. })
        ));
        assert_eq!(err.to_string(), "end depth must exceed start depth");
    }
    assert_eq!(layer_count(&conn), 0);
}

#[test]
fn negative_bounds_are_rejected() {
    let (conn, well_id) = setup();
    let layers = service(&conn);

    let err = add(&layers, well_id, Depth::from_centimeters(-10), m(1)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NegativeDepth {
            field: "start_depth"
        })
    ));
    assert_eq!(layer_count(&conn), 0);
}

#[test]
fn touching_layers_are_both_accepted() {
    let (conn, well_id) = setup();
    let layers = service(&conn);

    add(&layers, well_id, m(0), m(2)).unwrap();
    add(&layers, well_id, m(2), m(5)).unwrap();

    assert_eq!(layers.list_layers(well_id).unwrap().len(), 2);
}

#[test]
fn overlapping_layer_is_rejected() {
    let (conn, well_id) = setup();
    let layers = service(&conn);

    let first = add(&layers, well_id, m(0), m(3)).unwrap();
    let err = add(&layers, well_id, m(2), m(5)).unwrap_err();

    match err {
        RepoError::Validation(ValidationError::Overlap { conflicting_layer }) => {
            assert_eq!(conflicting_layer, first.id);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(layer_count(&conn), 1);
}

#[test]
fn enclosing_layer_is_rejected() {
    let (conn, well_id) = setup();
    let layers = service(&conn);

    add(&layers, well_id, m(2), m(3)).unwrap();
    let err = add(&layers, well_id, m(0), m(10)).unwrap_err();
    assert_eq!(err.to_string(), "layers must not overlap");
}

#[test]
fn overlap_is_scoped_to_one_well() {
    let (conn, first_well) = setup();
    let second_well = create_well(&conn);
    let layers = service(&conn);

    add(&layers, first_well, m(0), m(3)).unwrap();
    add(&layers, second_well, m(0), m(3)).unwrap();

    assert_eq!(layer_count(&conn), 2);
}

#[test]
fn add_to_missing_well_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let layers = service(&conn);
    let missing = Uuid::new_v4();

    let err = add(&layers, missing, m(0), m(1)).unwrap_err();
    assert!(matches!(err, RepoError::WellNotFound(id) if id == missing));
}

#[test]
fn list_orders_by_start_depth_regardless_of_insertion_order() {
    let (conn, well_id) = setup();
    let layers = service(&conn);

    for (start, end) in [(7, 9), (0, 1), (3, 5), (1, 3)] {
        add(&layers, well_id, m(start), m(end)).unwrap();
    }

    let starts: Vec<_> = layers
        .list_layers(well_id)
        .unwrap()
        .into_iter()
        .map(|layer| layer.start_depth)
        .collect();
    assert_eq!(starts, vec![m(0), m(1), m(3), m(7)]);

    let all = layers.list_all_layers().unwrap();
    assert_eq!(all.len(), 4);
    assert!(all
        .windows(2)
        .all(|pair| pair[0].start_depth <= pair[1].start_depth));
}

#[test]
fn update_revalidates_excluding_itself() {
    let (conn, well_id) = setup();
    let layers = service(&conn);

    let upper = add(&layers, well_id, m(0), m(2)).unwrap();
    add(&layers, well_id, m(4), m(6)).unwrap();

    let widened = layers
        .update_layer(
            upper.id,
            LayerPatch {
                start_depth: Some("0.50".parse().unwrap()),
                end_depth: Some(m(4)),
                ..LayerPatch::default()
            },
        )
        .unwrap();
    assert_eq!(widened.thickness().to_string(), "3.50");

    let err = layers
        .update_layer(
            upper.id,
            LayerPatch {
                end_depth: Some(m(5)),
                ..LayerPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::Overlap { .. })
    ));

    let err = layers
        .update_layer(
            upper.id,
            LayerPatch {
                end_depth: Some(Depth::from_centimeters(10)),
                ..LayerPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EndNotAfterStart { .. })
    ));

    let unchanged = layers.get_layer(upper.id).unwrap();
    assert_eq!(unchanged.end_depth, m(4));
}

#[test]
fn update_recomputes_thickness_and_keeps_other_fields() {
    let (conn, well_id) = setup();
    let layers = service(&conn);

    let created = layers
        .add_layer(NewLayer::new(well_id, m(1), m(2), Lithology::Peat).with_description("bog"))
        .unwrap();
    let updated = layers
        .update_layer(
            created.id,
            LayerPatch {
                start_depth: Some(Depth::ZERO),
                lithology: Some(Lithology::Sand),
                ..LayerPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.thickness(), m(2));
    assert_eq!(updated.lithology, Lithology::Sand);
    assert_eq!(updated.description, "bog");
}

#[test]
fn update_cannot_move_layer_to_another_well() {
    let (conn, well_id) = setup();
    let other_well = create_well(&conn);
    let layers = service(&conn);
    let created = add(&layers, well_id, m(0), m(1)).unwrap();

    let same_well = LayerPatch {
        well_id: Some(well_id),
        ..LayerPatch::default()
    };
    assert!(layers.update_layer(created.id, same_well).is_ok());

    let moved = LayerPatch {
        well_id: Some(other_well),
        ..LayerPatch::default()
    };
    let err = layers.update_layer(created.id, moved).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::WellReassignment { .. })
    ));
    assert_eq!(layers.get_layer(created.id).unwrap().well_id, well_id);
}

#[test]
fn delete_removes_only_the_layer() {
    let (conn, well_id) = setup();
    let layers = service(&conn);
    let doomed = add(&layers, well_id, m(0), m(1)).unwrap();
    let kept = add(&layers, well_id, m(1), m(2)).unwrap();

    layers.delete_layer(doomed.id).unwrap();

    assert!(matches!(
        layers.get_layer(doomed.id).unwrap_err(),
        RepoError::LayerNotFound(_)
    ));
    assert!(matches!(
        layers.delete_layer(doomed.id).unwrap_err(),
        RepoError::LayerNotFound(_)
    ));
    assert_eq!(layers.list_layers(well_id).unwrap(), vec![kept]);
}

#[test]
fn concurrent_overlapping_writers_admit_exactly_one_layer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("welllog.db");
    let well_id = create_well(&open_db(&path).unwrap());

    let writers = 4;
    let barrier = Arc::new(Barrier::new(writers));
    let handles: Vec<_> = (0..writers)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let layers = service(&conn);
                barrier.wait();
                add(&layers, well_id, m(0), m(3)).is_ok()
            })
        })
        .collect();

    let admitted = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|admitted| *admitted)
        .count();
    assert_eq!(admitted, 1);

    let conn = open_db(&path).unwrap();
    assert_eq!(layer_count(&conn), 1);
}
