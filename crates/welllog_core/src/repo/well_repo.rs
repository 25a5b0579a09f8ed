//! Well repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over canonical `wells` storage.
//! - Load wells together with their ordered layers in a fixed number of
//!   queries.
//!
//! # Invariants
//! - Write paths call `NewWell::validate()` / `Well::validate()` before SQL
//!   mutations.
//! - Deleting a well cascades to its layers through the foreign key.
//! - Well listing order is insertion order (`created_at ASC, rowid ASC`).

use crate::model::layer::Layer;
use crate::model::well::{NewWell, Well, WellId, WellPatch, WellWithLayers};
use crate::repo::error::{reject, RepoError, RepoResult};
use crate::repo::layer_repo::{list_all_layers, list_well_layers};
use crate::repo::schema::{
    ensure_table_ready, parse_depth, parse_uuid, NOW_EPOCH_MS_SQL,
};
use log::info;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use uuid::Uuid;

const WELL_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    area,
    structure,
    design_depth_cm,
    created_at,
    updated_at
FROM wells";

const WELL_COLUMNS: &[&str] = &[
    "uuid",
    "name",
    "area",
    "structure",
    "design_depth_cm",
    "created_at",
    "updated_at",
];

/// Repository interface for well CRUD operations.
pub trait WellRepository {
    fn create_well(&self, well: &NewWell) -> RepoResult<Well>;
    fn get_well(&self, id: WellId) -> RepoResult<Option<Well>>;
    /// Loads one well and its layers from a single read snapshot.
    fn get_well_with_layers(&self, id: WellId) -> RepoResult<Option<WellWithLayers>>;
    /// Lists every well with its layers eagerly attached.
    fn list_wells(&self) -> RepoResult<Vec<WellWithLayers>>;
    fn update_well(&self, id: WellId, patch: &WellPatch) -> RepoResult<Well>;
    /// Deletes a well and, by cascade, all of its layers.
    fn delete_well(&self, id: WellId) -> RepoResult<()>;
}

/// SQLite-backed well repository.
pub struct SqliteWellRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWellRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "wells", WELL_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl WellRepository for SqliteWellRepository<'_> {
    fn create_well(&self, well: &NewWell) -> RepoResult<Well> {
        well.validate().map_err(|err| reject("well_create", err))?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO wells (
                uuid,
                name,
                area,
                structure,
                design_depth_cm
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                well.name.as_str(),
                well.area.as_str(),
                well.structure.as_str(),
                well.design_depth.to_centimeters(),
            ],
        )?;

        info!("event=well_create module=repo status=ok well_id={id}");
        load_well(self.conn, id)?.ok_or(RepoError::WellNotFound(id))
    }

    fn get_well(&self, id: WellId) -> RepoResult<Option<Well>> {
        load_well(self.conn, id)
    }

    fn get_well_with_layers(&self, id: WellId) -> RepoResult<Option<WellWithLayers>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let Some(well) = load_well(&tx, id)? else {
            return Ok(None);
        };
        let layers = list_well_layers(&tx, id)?;
        tx.commit()?;

        Ok(Some(WellWithLayers { well, layers }))
    }

    fn list_wells(&self) -> RepoResult<Vec<WellWithLayers>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let wells = list_all_wells(&tx)?;
        let layers = list_all_layers(&tx)?;
        tx.commit()?;

        let mut layers_by_well: HashMap<WellId, Vec<Layer>> = HashMap::new();
        for layer in layers {
            layers_by_well.entry(layer.well_id).or_default().push(layer);
        }

        Ok(wells
            .into_iter()
            .map(|well| {
                let layers = layers_by_well.remove(&well.id).unwrap_or_default();
                WellWithLayers { well, layers }
            })
            .collect())
    }

    fn update_well(&self, id: WellId, patch: &WellPatch) -> RepoResult<Well> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut well = load_well(&tx, id)?.ok_or(RepoError::WellNotFound(id))?;
        well.apply(patch);
        well.validate().map_err(|err| reject("well_update", err))?;

        tx.execute(
            &format!(
                "UPDATE wells
             SET
                name = ?2,
                area = ?3,
                structure = ?4,
                design_depth_cm = ?5,
                updated_at = {NOW_EPOCH_MS_SQL}
             WHERE uuid = ?1;"
            ),
            params![
                id.to_string(),
                well.name.as_str(),
                well.area.as_str(),
                well.structure.as_str(),
                well.design_depth.to_centimeters(),
            ],
        )?;
        let updated = load_well(&tx, id)?.ok_or(RepoError::WellNotFound(id))?;
        tx.commit()?;

        info!("event=well_update module=repo status=ok well_id={id}");
        Ok(updated)
    }

    fn delete_well(&self, id: WellId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let layer_count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM layers WHERE well_uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        let changed = tx.execute("DELETE FROM wells WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::WellNotFound(id));
        }
        tx.commit()?;

        info!(
            "event=well_delete module=repo status=ok well_id={id} cascaded_layers={layer_count}"
        );
        Ok(())
    }
}

/// Returns whether a well with `id` exists.
pub(crate) fn well_exists(conn: &Connection, id: WellId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM wells WHERE uuid = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_well(conn: &Connection, id: WellId) -> RepoResult<Option<Well>> {
    let mut stmt = conn.prepare(&format!("{WELL_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_well_row(row)?));
    }
    Ok(None)
}

fn list_all_wells(conn: &Connection) -> RepoResult<Vec<Well>> {
    let mut stmt = conn.prepare(&format!(
        "{WELL_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
    ))?;
    let mut rows = stmt.query([])?;

    let mut wells = Vec::new();
    while let Some(row) = rows.next()? {
        wells.push(parse_well_row(row)?);
    }
    Ok(wells)
}

fn parse_well_row(row: &Row<'_>) -> RepoResult<Well> {
    let id = parse_uuid(&row.get::<_, String>("uuid")?, "wells.uuid")?;
    let well = Well {
        id,
        name: row.get("name")?,
        area: row.get("area")?,
        structure: row.get("structure")?,
        design_depth: parse_depth(row.get("design_depth_cm")?, "wells.design_depth_cm")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    well.validate()
        .map_err(|err| RepoError::InvalidData(format!("well {id}: {err}")))?;
    Ok(well)
}
