use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::OsusumeError;
use crate::models::{Category, HistoryEntry, Item};

const SCHEMA: &str = include_str!("../../../migrations/001_initial.sql");

/// Flag name for the completed-onboarding marker.
pub const FLAG_ONBOARDING_COMPLETE: &str = "onboarding_complete";
/// Flag name for the authenticated marker.
pub const FLAG_AUTHENTICATED: &str = "authenticated";

/// SQLite-backed session mirror: navigation flags, the bearer token, liked
/// items, and history entries.
///
/// The mirror is optional; the in-memory session never depends on it. The
/// host writes through it when it wants state to survive a page reload.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, OsusumeError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, OsusumeError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // ── Flags ───────────────────────────────────────────────────

    /// Set a boolean flag.
    pub fn set_flag(&self, name: &str, value: bool) -> Result<(), OsusumeError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO flags (name, value) VALUES (?1, ?2)",
            params![name, value as i64],
        )?;
        Ok(())
    }

    /// Read a boolean flag. Unset flags read as `false`.
    pub fn get_flag(&self, name: &str) -> Result<bool, OsusumeError> {
        let value: Option<i64> = self
            .conn
            .query_row(
                "SELECT value FROM flags WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0) != 0)
    }

    // ── Bearer token ────────────────────────────────────────────

    /// Store the bearer credential, replacing any previous one.
    pub fn save_token(&self, token: &str) -> Result<(), OsusumeError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO auth_token (id, token) VALUES (1, ?1)",
            params![token],
        )?;
        Ok(())
    }

    pub fn get_token(&self) -> Result<Option<String>, OsusumeError> {
        self.conn
            .query_row("SELECT token FROM auth_token WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    pub fn clear_token(&self) -> Result<(), OsusumeError> {
        self.conn.execute("DELETE FROM auth_token", [])?;
        Ok(())
    }

    // ── Liked items ─────────────────────────────────────────────

    /// Replace the liked-items mirror with the given ordered snapshot.
    pub fn save_liked(&self, items: &[Item]) -> Result<(), OsusumeError> {
        self.conn.execute("DELETE FROM liked_items", [])?;
        for (position, item) in items.iter().enumerate() {
            self.conn.execute(
                "INSERT INTO liked_items
                 (position, id, title, category, genre, description, rating, image_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    position as i64,
                    item.id,
                    item.title,
                    item.category.as_str(),
                    item.genre,
                    item.description,
                    item.rating,
                    item.image_url,
                ],
            )?;
        }
        Ok(())
    }

    /// Load the liked-items mirror in its saved order.
    pub fn load_liked(&self) -> Result<Vec<Item>, OsusumeError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, category, genre, description, rating, image_url
             FROM liked_items ORDER BY position",
        )?;
        let rows = stmt
            .query_map([], |row| Ok(row_to_item(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    // ── History ─────────────────────────────────────────────────

    /// Mirror one history entry, keeping the ledger-assigned id.
    pub fn insert_history(&self, entry: &HistoryEntry) -> Result<(), OsusumeError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO history (id, title, type, genre, rating, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id as i64,
                entry.title,
                entry.media_type,
                entry.genre,
                entry.rating,
                entry.date_added.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn delete_history(&self, id: u64) -> Result<(), OsusumeError> {
        self.conn
            .execute("DELETE FROM history WHERE id = ?1", params![id as i64])?;
        Ok(())
    }

    /// All mirrored history entries, oldest first.
    pub fn all_history(&self) -> Result<Vec<HistoryEntry>, OsusumeError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, type, genre, rating, date_added FROM history ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| Ok(row_to_history(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }
}

// ── Row mapping helpers ─────────────────────────────────────────

/// Parse a datetime string from SQLite (RFC 3339, as written by
/// `.to_rfc3339()`).
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn row_to_item(row: &rusqlite::Row<'_>) -> Item {
    let category_str: String = row.get(2).unwrap_or_default();
    Item {
        id: row.get(0).unwrap_or_default(),
        title: row.get(1).unwrap_or_default(),
        category: Category::from_str(&category_str).unwrap_or(Category::Movies),
        genre: row.get(3).unwrap_or_default(),
        description: row.get(4).unwrap_or(None),
        rating: row.get(5).unwrap_or(None),
        image_url: row.get(6).unwrap_or(None),
    }
}

fn row_to_history(row: &rusqlite::Row<'_>) -> HistoryEntry {
    let date_str: String = row.get(5).unwrap_or_default();
    HistoryEntry {
        id: row.get::<_, i64>(0).unwrap_or(0) as u64,
        title: row.get(1).unwrap_or_default(),
        media_type: row.get(2).unwrap_or_default(),
        genre: row.get(3).unwrap_or(None),
        rating: row.get(4).unwrap_or(None),
        date_added: parse_datetime(&date_str),
    }
}
