use crate::Database;
use anyhow::Result;
use rusqlite::OptionalExtension;

impl Database {
    // -- Key-value primitives --

    pub fn kv_get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.with_conn(|conn| {
            let value = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    pub fn kv_set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                rusqlite::params![key, value],
            )?;
            Ok(())
        })
    }

    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    #[test]
    fn set_get_delete_round_trip() {
        let db = Database::open_in_memory().unwrap();

        assert_eq!(db.kv_get("missing").unwrap(), None);

        db.kv_set("k", b"v1").unwrap();
        assert_eq!(db.kv_get("k").unwrap().as_deref(), Some(b"v1".as_slice()));

        // Overwrite, then delete
        db.kv_set("k", b"v2").unwrap();
        assert_eq!(db.kv_get("k").unwrap().as_deref(), Some(b"v2".as_slice()));

        db.kv_delete("k").unwrap();
        assert_eq!(db.kv_get("k").unwrap(), None);
    }

    #[test]
    fn delete_of_missing_key_is_a_noop() {
        let db = Database::open_in_memory().unwrap();
        db.kv_delete("never-set").unwrap();
    }
}
