//! SQL schema for the Cardex SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Length and range bounds live here as CHECK constraints so the data model
/// holds regardless of which adapter wrote the row. Every foreign key
/// cascades on delete: removing a type removes its subtypes and cards,
/// removing a card removes its statistics. Soft-deletion never touches these
/// paths — it only sets `cards.deleted_at`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS card_types (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE
                CHECK (length(name) BETWEEN 2 AND 50),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS card_sub_types (
    id          TEXT PRIMARY KEY,
    type_id     TEXT NOT NULL REFERENCES card_types(id) ON DELETE CASCADE,
    name        TEXT NOT NULL UNIQUE
                CHECK (length(name) BETWEEN 2 AND 50),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cards (
    id           TEXT PRIMARY KEY,
    type_id      TEXT NOT NULL REFERENCES card_types(id) ON DELETE CASCADE,
    sub_type_id  TEXT NOT NULL REFERENCES card_sub_types(id) ON DELETE CASCADE,
    name         TEXT NOT NULL UNIQUE
                 CHECK (length(name) BETWEEN 2 AND 50),
    code         TEXT NOT NULL UNIQUE
                 CHECK (length(code) = 7),
    description  TEXT NOT NULL
                 CHECK (length(description) BETWEEN 5 AND 255),
    image_url    TEXT
                 CHECK (image_url IS NULL OR length(image_url) BETWEEN 5 AND 255),
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    deleted_at   TEXT             -- soft-delete marker; row is never removed
);

-- At most one row per card (UNIQUE card_id); removed with its card.
CREATE TABLE IF NOT EXISTS card_statistics (
    id          TEXT PRIMARY KEY,
    card_id     TEXT NOT NULL UNIQUE REFERENCES cards(id) ON DELETE CASCADE,
    attack      INTEGER NOT NULL CHECK (attack >= 1),
    defense     INTEGER NOT NULL CHECK (defense >= 1),
    stars       INTEGER CHECK (stars IS NULL OR stars >= 1),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS card_sub_types_type_idx   ON card_sub_types(type_id);
CREATE INDEX IF NOT EXISTS cards_type_idx            ON cards(type_id);
CREATE INDEX IF NOT EXISTS cards_sub_type_idx        ON cards(sub_type_id);
CREATE INDEX IF NOT EXISTS card_statistics_stars_idx ON card_statistics(stars);

PRAGMA user_version = 1;
";
