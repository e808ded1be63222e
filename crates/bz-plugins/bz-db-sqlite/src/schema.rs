//! Tables are created on startup if missing. Ratings are stored as whole
//! tenths so arithmetic stays exact.

pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS ranks (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    title            TEXT    NOT NULL,
    threshold_tenths INTEGER NOT NULL UNIQUE CHECK (threshold_tenths >= 0)
);

CREATE TABLE IF NOT EXISTS users (
    id             BLOB    PRIMARY KEY,
    name           TEXT    NOT NULL,
    surname        TEXT    NOT NULL,
    email          TEXT    NOT NULL UNIQUE,
    phone_number   TEXT    NOT NULL,
    birthday       TEXT,
    password_hash  TEXT    NOT NULL,
    registered_at  TEXT    NOT NULL,
    rating_tenths  INTEGER NOT NULL DEFAULT 0 CHECK (rating_tenths >= 0),
    rank_id        INTEGER NOT NULL REFERENCES ranks(id)
);

CREATE TABLE IF NOT EXISTS contents (
    id    BLOB PRIMARY KEY,
    body  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id            BLOB PRIMARY KEY,
    sender_id     BLOB NOT NULL REFERENCES users(id),
    recipient_id  BLOB NOT NULL REFERENCES users(id),
    content_id    BLOB NOT NULL REFERENCES contents(id),
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_sender    ON messages (sender_id, created_at);
CREATE INDEX IF NOT EXISTS idx_messages_recipient ON messages (recipient_id, created_at);

CREATE TABLE IF NOT EXISTS advertisements (
    id          BLOB    PRIMARY KEY,
    author_id   BLOB    NOT NULL REFERENCES users(id),
    title       TEXT    NOT NULL,
    price       INTEGER NOT NULL CHECK (price >= 0),
    content_id  BLOB    NOT NULL REFERENCES contents(id),
    created_at  TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ads_author ON advertisements (author_id, created_at);
"#;
