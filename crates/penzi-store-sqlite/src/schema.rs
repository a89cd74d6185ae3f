//! SQL schema for the Penzi SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every table keeps its implicit `rowid`; insertion order and "most recent"
/// are both read from it.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Never updated once inserted.
CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    age         INTEGER NOT NULL CHECK (age >= 18),
    gender      TEXT NOT NULL CHECK (gender IN ('Male', 'Female')),
    county      TEXT NOT NULL,
    town        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- The newest row for a contact wins; older rows are kept as history.
CREATE TABLE IF NOT EXISTS contact_bindings (
    binding_id  TEXT PRIMARY KEY,
    contact     TEXT NOT NULL,
    digits      TEXT NOT NULL,   -- contact with non-digits stripped
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profile_details (
    user_id         TEXT PRIMARY KEY REFERENCES users(user_id),
    education       TEXT NOT NULL,
    profession      TEXT NOT NULL,
    marital_status  TEXT NOT NULL,
    religion        TEXT NOT NULL,
    ethnicity       TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS self_descriptions (
    user_id     TEXT PRIMARY KEY REFERENCES users(user_id),
    description TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Append-only interaction log.
CREATE TABLE IF NOT EXISTS messages (
    message_id  TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    direction   TEXT NOT NULL CHECK (direction IN ('inbound', 'outbound')),
    text        TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS match_queries (
    query_id    TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    age_range   TEXT NOT NULL,   -- 'min-max'
    location    TEXT NOT NULL,
    status      TEXT NOT NULL,   -- 'initial' | 'matched' | 'empty'
    created_at  TEXT NOT NULL
);

-- Only `shown` is ever updated, and only upwards.
CREATE TABLE IF NOT EXISTS match_batches (
    batch_id    TEXT PRIMARY KEY,
    query_id    TEXT NOT NULL REFERENCES match_queries(query_id),
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    total       INTEGER NOT NULL,
    shown       INTEGER NOT NULL DEFAULT 0,
    match_data  TEXT NOT NULL,   -- JSON array of {name, age, contact}
    created_at  TEXT NOT NULL,
    CHECK (shown >= 0 AND shown <= total)
);

CREATE INDEX IF NOT EXISTS bindings_contact_idx ON contact_bindings(contact);
CREATE INDEX IF NOT EXISTS bindings_user_idx    ON contact_bindings(user_id);
CREATE INDEX IF NOT EXISTS users_gender_idx     ON users(gender);
CREATE INDEX IF NOT EXISTS users_name_idx       ON users(name);
CREATE INDEX IF NOT EXISTS messages_user_idx    ON messages(user_id);
CREATE INDEX IF NOT EXISTS batches_user_idx     ON match_batches(user_id);

PRAGMA user_version = 1;
";
