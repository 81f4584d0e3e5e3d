//! [`SqliteStore`]: the SQLite implementation of [`AgencyStore`].

use std::{collections::HashMap, path::Path};

use agency_core::{
  CatId, Error as CoreError, MissionId, TargetId,
  cat::{Cat, CatPatch, NewCat},
  mission::{
    CatStanding, Mission, MissionUpdate, NewMission, RequestedCat, Target, TargetPatch,
  },
  store::AgencyStore,
};
use rusqlite::{Connection, OptionalExtension as _, Transaction, params};

use crate::{
  Result,
  encode::{
    CAT_COLUMNS, MISSION_COLUMNS, TARGET_COLUMNS, cat_from_row, mission_from_row,
    target_from_row,
  },
  schema::SCHEMA,
};

// ─── Transaction plumbing ────────────────────────────────────────────────────

/// Failure inside a transaction body: either SQLite failed, or a domain rule
/// refused the operation. Both roll the transaction back.
enum TxError {
  Sql(rusqlite::Error),
  Rule(CoreError),
}

impl From<rusqlite::Error> for TxError {
  fn from(e: rusqlite::Error) -> Self { Self::Sql(e) }
}

impl From<CoreError> for TxError {
  fn from(e: CoreError) -> Self { Self::Rule(e) }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An agency store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// run on one connection thread, so transactions never interleave.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `body` in a transaction. It commits only if `body` succeeds; a
  /// rule violation comes back as [`crate::Error::Core`].
  async fn transact<T, F>(&self, body: F) -> Result<T>
  where
    F: FnOnce(&Transaction<'_>) -> Result<T, TxError> + Send + 'static,
    T: Send + 'static,
  {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match body(&tx) {
          Ok(value) => {
            tx.commit()?;
            Ok(Ok(value))
          }
          Err(TxError::Rule(e)) => Ok(Err(e)),
          Err(TxError::Sql(e)) => Err(e.into()),
        }
      })
      .await?;
    Ok(outcome?)
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

fn fetch_cat(conn: &Connection, id: CatId) -> rusqlite::Result<Option<Cat>> {
  conn
    .query_row(
      &format!("SELECT {CAT_COLUMNS} FROM cats WHERE id = ?1"),
      params![id],
      cat_from_row,
    )
    .optional()
}

fn fetch_targets(conn: &Connection, mission_id: MissionId) -> rusqlite::Result<Vec<Target>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {TARGET_COLUMNS} FROM targets WHERE mission_id = ?1 ORDER BY id"
  ))?;
  stmt
    .query_map(params![mission_id], target_from_row)?
    .map(|r| r.map(|(_, t)| t))
    .collect()
}

fn fetch_mission(conn: &Connection, id: MissionId) -> rusqlite::Result<Option<Mission>> {
  let Some(mut mission) = conn
    .query_row(
      &format!("SELECT {MISSION_COLUMNS} FROM missions WHERE id = ?1"),
      params![id],
      mission_from_row,
    )
    .optional()?
  else {
    return Ok(None);
  };
  mission.targets = fetch_targets(conn, id)?;
  Ok(Some(mission))
}

fn require_mission(conn: &Connection, id: MissionId) -> Result<Mission, TxError> {
  fetch_mission(conn, id)?.ok_or(TxError::Rule(CoreError::MissionNotFound(id)))
}

/// Whether `cat_id` exists and, if so, whether it is already on an open
/// mission.
fn cat_standing(conn: &Connection, cat_id: CatId) -> rusqlite::Result<CatStanding> {
  let exists = conn
    .query_row("SELECT 1 FROM cats WHERE id = ?1", params![cat_id], |_| Ok(()))
    .optional()?
    .is_some();
  if !exists {
    return Ok(CatStanding::Missing);
  }

  let busy = conn
    .query_row(
      "SELECT 1 FROM missions WHERE cat_id = ?1 AND complete = 0 LIMIT 1",
      params![cat_id],
      |_| Ok(()),
    )
    .optional()?
    .is_some();
  Ok(if busy { CatStanding::Busy } else { CatStanding::Available })
}

/// Run the assignment rules for `cat_id` against `mission` and persist the
/// binding.
fn bind_cat(conn: &Connection, mission: &mut Mission, cat_id: Option<CatId>) -> Result<(), TxError> {
  let candidate = match cat_id {
    Some(id) => Some((id, cat_standing(conn, id)?)),
    None => None,
  };
  mission.assign(candidate)?;
  conn.execute(
    "UPDATE missions SET cat_id = ?1 WHERE id = ?2",
    params![mission.cat, mission.id],
  )?;
  tracing::info!(mission = mission.id, cat = ?mission.cat, "cat assigned to mission");
  Ok(())
}

// ─── AgencyStore impl ────────────────────────────────────────────────────────

impl AgencyStore for SqliteStore {
  type Error = crate::Error;

  // ── Cats ──────────────────────────────────────────────────────────────────

  async fn list_cats(&self) -> Result<Vec<Cat>> {
    let cats = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {CAT_COLUMNS} FROM cats ORDER BY id"))?;
        let rows = stmt
          .query_map([], cat_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(cats)
  }

  async fn get_cat(&self, id: CatId) -> Result<Option<Cat>> {
    Ok(self.conn.call(move |conn| Ok(fetch_cat(conn, id)?)).await?)
  }

  async fn create_cat(&self, input: NewCat) -> Result<Cat> {
    input.check()?;

    let cat = self
      .transact(move |tx| {
        tx.execute(
          "INSERT INTO cats (name, years_of_experience, breed, salary)
           VALUES (?1, ?2, ?3, ?4)",
          params![input.name, input.years_of_experience, input.breed, input.salary],
        )?;
        Ok(input.into_cat(tx.last_insert_rowid()))
      })
      .await?;

    tracing::debug!(cat = cat.id, "cat created");
    Ok(cat)
  }

  async fn update_cat(&self, id: CatId, input: NewCat) -> Result<Cat> {
    input.check()?;

    self
      .transact(move |tx| {
        let changed = tx.execute(
          "UPDATE cats
           SET name = ?1, years_of_experience = ?2, breed = ?3, salary = ?4
           WHERE id = ?5",
          params![input.name, input.years_of_experience, input.breed, input.salary, id],
        )?;
        if changed == 0 {
          return Err(CoreError::CatNotFound(id).into());
        }
        Ok(input.into_cat(id))
      })
      .await
  }

  async fn patch_cat(&self, id: CatId, patch: CatPatch) -> Result<Cat> {
    self
      .transact(move |tx| {
        let mut cat = fetch_cat(tx, id)?.ok_or(CoreError::CatNotFound(id))?;
        patch.apply(&mut cat);
        tx.execute("UPDATE cats SET salary = ?1 WHERE id = ?2", params![cat.salary, id])?;
        Ok(cat)
      })
      .await
  }

  async fn delete_cat(&self, id: CatId) -> Result<()> {
    self
      .transact(move |tx| {
        if tx.execute("DELETE FROM cats WHERE id = ?1", params![id])? == 0 {
          return Err(CoreError::CatNotFound(id).into());
        }
        Ok(())
      })
      .await?;

    tracing::debug!(cat = id, "cat deleted");
    Ok(())
  }

  // ── Missions ──────────────────────────────────────────────────────────────

  async fn list_missions(&self) -> Result<Vec<Mission>> {
    let missions = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {MISSION_COLUMNS} FROM missions ORDER BY id"))?;
        let mut missions = stmt
          .query_map([], mission_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        // One query for every target, grouped by owner.
        let mut stmt = conn.prepare(&format!(
          "SELECT {TARGET_COLUMNS} FROM targets ORDER BY mission_id, id"
        ))?;
        let mut by_mission: HashMap<MissionId, Vec<Target>> = HashMap::new();
        for row in stmt.query_map([], target_from_row)? {
          let (mission_id, target) = row?;
          by_mission.entry(mission_id).or_default().push(target);
        }

        for mission in &mut missions {
          mission.targets = by_mission.remove(&mission.id).unwrap_or_default();
        }
        Ok(missions)
      })
      .await?;
    Ok(missions)
  }

  async fn get_mission(&self, id: MissionId) -> Result<Option<Mission>> {
    Ok(self.conn.call(move |conn| Ok(fetch_mission(conn, id)?)).await?)
  }

  async fn create_mission(&self, input: NewMission) -> Result<Mission> {
    input.check()?;

    let mission = self
      .transact(move |tx| {
        tx.execute("INSERT INTO missions (cat_id, complete) VALUES (NULL, 0)", [])?;
        let mission_id = tx.last_insert_rowid();

        {
          let mut insert = tx.prepare(
            "INSERT INTO targets (mission_id, name, country, notes, complete)
             VALUES (?1, ?2, ?3, ?4, 0)",
          )?;
          for t in &input.targets {
            insert.execute(params![mission_id, t.name, t.country, t.notes])?;
          }
        }

        let mut mission = require_mission(tx, mission_id)?;
        if input.cat.is_some() {
          bind_cat(tx, &mut mission, input.cat)?;
        }
        Ok(mission)
      })
      .await?;

    tracing::debug!(mission = mission.id, targets = mission.targets.len(), "mission created");
    Ok(mission)
  }

  async fn update_mission(
    &self,
    id: MissionId,
    update: MissionUpdate,
    partial: bool,
  ) -> Result<Mission> {
    self
      .transact(move |tx| {
        let mut mission = require_mission(tx, id)?;
        if let Some(cat_id) = mission.plan_update(&update, partial)? {
          bind_cat(tx, &mut mission, Some(cat_id))?;
        }
        Ok(mission)
      })
      .await
  }

  async fn delete_mission(&self, id: MissionId) -> Result<()> {
    self
      .transact(move |tx| {
        require_mission(tx, id)?.ensure_deletable()?;
        tx.execute("DELETE FROM missions WHERE id = ?1", params![id])?;
        Ok(())
      })
      .await?;

    tracing::debug!(mission = id, "mission deleted");
    Ok(())
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  async fn assign_cat(&self, mission_id: MissionId, cat_id: RequestedCat) -> Result<Mission> {
    self
      .transact(move |tx| {
        let mut mission = require_mission(tx, mission_id)?;
        let cat_id = mission.requested_cat(&cat_id)?;
        bind_cat(tx, &mut mission, cat_id)?;
        Ok(mission)
      })
      .await
  }

  async fn update_target(
    &self,
    mission_id: MissionId,
    target_id: TargetId,
    patch: TargetPatch,
  ) -> Result<Mission> {
    self
      .transact(move |tx| {
        let mut mission = require_mission(tx, mission_id)?;
        let completed = mission.update_target(target_id, &patch)?;

        if let Some(t) = mission.targets.iter().find(|t| t.id == target_id) {
          tx.execute(
            "UPDATE targets SET notes = ?1, complete = ?2 WHERE id = ?3",
            params![t.notes, t.complete.is_complete(), t.id],
          )?;
        }

        if completed {
          tx.execute("UPDATE missions SET complete = 1 WHERE id = ?1", params![mission_id])?;
          tracing::info!(mission = mission_id, "all targets complete; mission completed");
        }
        Ok(mission)
      })
      .await
  }
}
