//! Row mapping between SQLite rows and domain types.
//!
//! Completion flags are stored as `0`/`1` integers. Each `*_COLUMNS` constant
//! lists the columns in the order its `*_from_row` function reads them.

use agency_core::{
  MissionId,
  cat::Cat,
  mission::{Mission, Target},
};
use rusqlite::Row;

// ─── Cats ────────────────────────────────────────────────────────────────────

pub const CAT_COLUMNS: &str = "id, name, years_of_experience, breed, salary";

pub fn cat_from_row(row: &Row<'_>) -> rusqlite::Result<Cat> {
  Ok(Cat {
    id:                  row.get(0)?,
    name:                row.get(1)?,
    years_of_experience: row.get(2)?,
    breed:               row.get(3)?,
    salary:              row.get(4)?,
  })
}

// ─── Missions ────────────────────────────────────────────────────────────────

pub const MISSION_COLUMNS: &str = "id, cat_id, complete";

/// A mission row without its targets; callers fill `targets` in.
pub fn mission_from_row(row: &Row<'_>) -> rusqlite::Result<Mission> {
  Ok(Mission {
    id:       row.get(0)?,
    cat:      row.get(1)?,
    complete: row.get::<_, bool>(2)?.into(),
    targets:  Vec::new(),
  })
}

// ─── Targets ─────────────────────────────────────────────────────────────────

pub const TARGET_COLUMNS: &str = "mission_id, id, name, country, notes, complete";

/// A target row, paired with the mission that owns it.
pub fn target_from_row(row: &Row<'_>) -> rusqlite::Result<(MissionId, Target)> {
  Ok((row.get(0)?, Target {
    id:       row.get(1)?,
    name:     row.get(2)?,
    country:  row.get(3)?,
    notes:    row.get(4)?,
    complete: row.get::<_, bool>(5)?.into(),
  }))
}
