use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::HibariError;

/// Fixed row key: the app tracks a single AniList session.
const SERVICE_KEY: &str = "anilist";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS credentials (
    service      TEXT PRIMARY KEY,
    access_token TEXT NOT NULL
);
";

/// SQLite-backed store for the single bearer token.
///
/// Repeated saves overwrite the one row; there is never more than one
/// credential on disk.
pub struct TokenStore {
    conn: Connection,
}

impl TokenStore {
    /// Open (or create) the credential database at the given path.
    pub fn open(path: &Path) -> Result<Self, HibariError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store (for tests).
    pub fn open_memory() -> Result<Self, HibariError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn save(&self, token: &str) -> Result<(), HibariError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO credentials (service, access_token) VALUES (?1, ?2)",
            params![SERVICE_KEY, token],
        )?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<String>, HibariError> {
        self.conn
            .query_row(
                "SELECT access_token FROM credentials WHERE service = ?1",
                params![SERVICE_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn clear(&self) -> Result<(), HibariError> {
        self.conn.execute(
            "DELETE FROM credentials WHERE service = ?1",
            params![SERVICE_KEY],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let store = TokenStore::open_memory().unwrap();
        store.save("token-abc").unwrap();
        assert_eq!(store.load().unwrap(), Some("token-abc".into()));
    }

    #[test]
    fn load_on_empty_store_is_none() {
        let store = TokenStore::open_memory().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn repeated_save_overwrites() {
        let store = TokenStore::open_memory().unwrap();
        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load().unwrap(), Some("second".into()));

        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM credentials", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn clear_removes_the_credential() {
        let store = TokenStore::open_memory().unwrap();
        store.save("token").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing an already-empty store is a no-op.
        store.clear().unwrap();
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.db");
        {
            let store = TokenStore::open(&path).unwrap();
            store.save("persisted").unwrap();
        }
        let store = TokenStore::open(&path).unwrap();
        assert_eq!(store.load().unwrap(), Some("persisted".into()));
    }
}
