//! Layer repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `layers` scoped to an owning well.
//! - Run interval and overlap validation inside the write transaction.
//!
//! # Invariants
//! - Writes open `BEGIN IMMEDIATE`, so the sibling read and the mutation it
//!   guards cannot interleave with another writer.
//! - Listing is deterministic: `start_depth ASC`, then well, then id.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::model::layer::{
    validate_layer_placement, Layer, LayerId, LayerPatch, Lithology, NewLayer,
};
use crate::model::well::WellId;
use crate::repo::error::{reject, RepoError, RepoResult};
use crate::repo::schema::{
    ensure_table_ready, parse_depth, parse_uuid, NOW_EPOCH_MS_SQL,
};
use crate::repo::well_repo::well_exists;
use log::info;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const LAYER_SELECT_SQL: &str = "SELECT
    uuid,
    well_uuid,
    start_depth_cm,
    end_depth_cm,
    lithology,
    description,
    created_at,
    updated_at
FROM layers";

const LAYER_COLUMNS: &[&str] = &[
    "uuid",
    "well_uuid",
    "start_depth_cm",
    "end_depth_cm",
    "lithology",
    "description",
    "created_at",
    "updated_at",
];

/// Query options for listing layers.
#[derive(Debug, Clone, Default)]
pub struct LayerListQuery {
    /// Restrict to one well. The well must exist.
    pub well_id: Option<WellId>,
}

impl LayerListQuery {
    pub fn for_well(well_id: WellId) -> Self {
        Self {
            well_id: Some(well_id),
        }
    }
}

/// Repository interface for layer CRUD operations.
pub trait LayerRepository {
    /// Validates and inserts a layer under an existing well.
    fn add_layer(&self, layer: &NewLayer) -> RepoResult<Layer>;
    /// Applies a patch and re-validates against the other layers of the well.
    fn update_layer(&self, id: LayerId, patch: &LayerPatch) -> RepoResult<Layer>;
    fn delete_layer(&self, id: LayerId) -> RepoResult<()>;
    fn get_layer(&self, id: LayerId) -> RepoResult<Option<Layer>>;
    /// Lists layers ordered by `start_depth` ascending.
    fn list_layers(&self, query: &LayerListQuery) -> RepoResult<Vec<Layer>>;
}

/// SQLite-backed layer repository.
pub struct SqliteLayerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLayerRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "layers", LAYER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl LayerRepository for SqliteLayerRepository<'_> {
    fn add_layer(&self, layer: &NewLayer) -> RepoResult<Layer> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !well_exists(&tx, layer.well_id)? {
            return Err(RepoError::WellNotFound(layer.well_id));
        }

        let siblings = list_well_layers(&tx, layer.well_id)?;
        validate_layer_placement(&layer.interval(), &siblings, None)
            .map_err(|err| reject("layer_add", err))?;

        let id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO layers (
                uuid,
                well_uuid,
                start_depth_cm,
                end_depth_cm,
                lithology,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.to_string(),
                layer.well_id.to_string(),
                layer.start_depth.to_centimeters(),
                layer.end_depth.to_centimeters(),
                layer.lithology.code(),
                layer.description.as_str(),
            ],
        )?;
        let created = load_required_layer(&tx, id)?;
        tx.commit()?;

        info!(
            "event=layer_add module=repo status=ok well_id={} layer_id={id} start_cm={} end_cm={}",
            created.well_id,
            created.start_depth.to_centimeters(),
            created.end_depth.to_centimeters()
        );
        Ok(created)
    }

    fn update_layer(&self, id: LayerId, patch: &LayerPatch) -> RepoResult<Layer> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut layer = load_layer(&tx, id)?.ok_or(RepoError::LayerNotFound(id))?;
        layer
            .apply(patch)
            .map_err(|err| reject("layer_update", err))?;

        let siblings = list_well_layers(&tx, layer.well_id)?;
        validate_layer_placement(&layer.interval(), &siblings, Some(id))
            .map_err(|err| reject("layer_update", err))?;

        tx.execute(
            &format!(
                "UPDATE layers
             SET
                start_depth_cm = ?2,
                end_depth_cm = ?3,
                lithology = ?4,
                description = ?5,
                updated_at = {NOW_EPOCH_MS_SQL}
             WHERE uuid = ?1;"
            ),
            params![
                id.to_string(),
                layer.start_depth.to_centimeters(),
                layer.end_depth.to_centimeters(),
                layer.lithology.code(),
                layer.description.as_str(),
            ],
        )?;
        let updated = load_required_layer(&tx, id)?;
        tx.commit()?;

        info!(
            "event=layer_update module=repo status=ok well_id={} layer_id={id}",
            updated.well_id
        );
        Ok(updated)
    }

    fn delete_layer(&self, id: LayerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM layers WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::LayerNotFound(id));
        }

        info!("event=layer_delete module=repo status=ok layer_id={id}");
        Ok(())
    }

    fn get_layer(&self, id: LayerId) -> RepoResult<Option<Layer>> {
        load_layer(self.conn, id)
    }

    fn list_layers(&self, query: &LayerListQuery) -> RepoResult<Vec<Layer>> {
        match query.well_id {
            Some(well_id) => {
                let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
                if !well_exists(&tx, well_id)? {
                    return Err(RepoError::WellNotFound(well_id));
                }
                let layers = list_well_layers(&tx, well_id)?;
                tx.commit()?;
                Ok(layers)
            }
            None => list_all_layers(self.conn),
        }
    }
}

/// Loads layers of one well ordered by `start_depth`.
pub(crate) fn list_well_layers(conn: &Connection, well_id: WellId) -> RepoResult<Vec<Layer>> {
    let mut stmt = conn.prepare(&format!(
        "{LAYER_SELECT_SQL}
         WHERE well_uuid = ?1
         ORDER BY start_depth_cm ASC, uuid ASC;"
    ))?;
    let mut rows = stmt.query([well_id.to_string()])?;

    let mut layers = Vec::new();
    while let Some(row) = rows.next()? {
        layers.push(parse_layer_row(row)?);
    }
    Ok(layers)
}

/// Loads every layer ordered by `start_depth`, then well.
pub(crate) fn list_all_layers(conn: &Connection) -> RepoResult<Vec<Layer>> {
    let mut stmt = conn.prepare(&format!(
        "{LAYER_SELECT_SQL} ORDER BY start_depth_cm ASC, well_uuid ASC, uuid ASC;"
    ))?;
    let mut rows = stmt.query([])?;

    let mut layers = Vec::new();
    while let Some(row) = rows.next()? {
        layers.push(parse_layer_row(row)?);
    }
    Ok(layers)
}

fn load_layer(conn: &Connection, id: LayerId) -> RepoResult<Option<Layer>> {
    let mut stmt = conn.prepare(&format!("{LAYER_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_layer_row(row)?));
    }
    Ok(None)
}

fn load_required_layer(conn: &Connection, id: LayerId) -> RepoResult<Layer> {
    load_layer(conn, id)?.ok_or(RepoError::LayerNotFound(id))
}

fn parse_layer_row(row: &Row<'_>) -> RepoResult<Layer> {
    let id = parse_uuid(&row.get::<_, String>("uuid")?, "layers.uuid")?;
    let well_id = parse_uuid(&row.get::<_, String>("well_uuid")?, "layers.well_uuid")?;

    let lithology_text: String = row.get("lithology")?;
    let lithology = Lithology::parse_code(&lithology_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid lithology `{lithology_text}` in layers.lithology"
        ))
    })?;

    let layer = Layer {
        id,
        well_id,
        start_depth: parse_depth(row.get("start_depth_cm")?, "layers.start_depth_cm")?,
        end_depth: parse_depth(row.get("end_depth_cm")?, "layers.end_depth_cm")?,
        lithology,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    layer
        .interval()
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("layer {id}: {err}")))?;
    Ok(layer)
}
