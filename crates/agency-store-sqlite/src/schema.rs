//! SQL schema for the agency SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cats (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    name                TEXT    NOT NULL,
    breed               TEXT    NOT NULL,
    years_of_experience INTEGER NOT NULL DEFAULT 0 CHECK (years_of_experience >= 0),
    salary              INTEGER NOT NULL DEFAULT 0 CHECK (salary >= 0)
);

-- A deleted cat leaves its missions unassigned rather than removing them.
CREATE TABLE IF NOT EXISTS missions (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    cat_id   INTEGER REFERENCES cats(id) ON DELETE SET NULL,
    complete INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS targets (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    mission_id INTEGER NOT NULL REFERENCES missions(id) ON DELETE CASCADE,
    name       TEXT    NOT NULL,
    country    TEXT    NOT NULL,
    notes      TEXT    NOT NULL DEFAULT '',
    complete   INTEGER NOT NULL DEFAULT 0,
    UNIQUE (mission_id, name, country)
);

CREATE INDEX IF NOT EXISTS missions_cat_idx    ON missions(cat_id);
CREATE INDEX IF NOT EXISTS targets_mission_idx ON targets(mission_id);

PRAGMA user_version = 1;
";
