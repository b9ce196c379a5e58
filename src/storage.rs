use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

const SCHEMA: &str = include_str!("../database/schema.sql");

pub const DATABASE_PATH: &str = "database/bot.db";

/// Apply the schema script to the database at `path`, opening a connection
/// for just that operation and closing it again. The script only uses
/// `CREATE TABLE IF NOT EXISTS`, so running it on every boot is safe.
pub fn apply_schema(path: &Path) -> Result<()> {
    let conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// A warning stored against a user in a guild.
#[derive(Debug)]
pub struct Warn {
    pub id: i64,
    pub moderator_id: u64,
    pub reason: String,
    pub created_at: String,
}

/// Local SQLite state behind a blocking mutex. Queries here are tiny
/// single-row lookups, so the lock is only ever held briefly.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database with the schema applied. Memory databases exist
    /// per-connection, so the schema has to be applied on this handle.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn is_blacklisted(&self, user_id: u64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM blacklist WHERE user_id = ?1",
            [user_id as i64],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Returns false if the user was already blacklisted.
    pub fn blacklist_add(&self, user_id: u64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "INSERT OR IGNORE INTO blacklist (user_id) VALUES (?1)",
            [user_id as i64],
        )?;
        Ok(rows > 0)
    }

    /// Returns false if the user was not blacklisted to begin with.
    pub fn blacklist_remove(&self, user_id: u64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "DELETE FROM blacklist WHERE user_id = ?1",
            [user_id as i64],
        )?;
        Ok(rows > 0)
    }

    pub fn blacklist_all(&self) -> Result<Vec<u64>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT user_id FROM blacklist ORDER BY user_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;

        let mut ids = Vec::new();
        for id in rows {
            ids.push(id? as u64);
        }
        Ok(ids)
    }

    pub fn warn_add(
        &self,
        user_id: u64,
        server_id: u64,
        moderator_id: u64,
        reason: &str,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO warns (user_id, server_id, moderator_id, reason) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![user_id as i64, server_id as i64, moderator_id as i64, reason],
        )?;
        Ok(())
    }

    pub fn warns_for(&self, user_id: u64, server_id: u64) -> Result<Vec<Warn>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, moderator_id, reason, created_at FROM warns \
             WHERE user_id = ?1 AND server_id = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map([user_id as i64, server_id as i64], |row| {
            Ok(Warn {
                id: row.get(0)?,
                moderator_id: row.get::<_, i64>(1)? as u64,
                reason: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;

        let mut warns = Vec::new();
        for warn in rows {
            warns.push(warn?);
        }
        Ok(warns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blacklist_round_trip() {
        let storage = Storage::open_in_memory().unwrap();

        assert!(!storage.is_blacklisted(42).unwrap());
        assert!(storage.blacklist_add(42).unwrap());
        assert!(storage.is_blacklisted(42).unwrap());

        // second add is a no-op
        assert!(!storage.blacklist_add(42).unwrap());

        assert!(storage.blacklist_remove(42).unwrap());
        assert!(!storage.is_blacklisted(42).unwrap());
        assert!(!storage.blacklist_remove(42).unwrap());
    }

    #[test]
    fn blacklist_all_lists_every_entry() {
        let storage = Storage::open_in_memory().unwrap();
        storage.blacklist_add(3).unwrap();
        storage.blacklist_add(1).unwrap();
        storage.blacklist_add(2).unwrap();

        assert_eq!(storage.blacklist_all().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn warns_are_scoped_to_user_and_guild() {
        let storage = Storage::open_in_memory().unwrap();
        storage.warn_add(1, 10, 99, "spam").unwrap();
        storage.warn_add(1, 10, 99, "more spam").unwrap();
        storage.warn_add(1, 20, 99, "other guild").unwrap();
        storage.warn_add(2, 10, 99, "other user").unwrap();

        let warns = storage.warns_for(1, 10).unwrap();
        assert_eq!(warns.len(), 2);
        assert_eq!(warns[0].reason, "spam");
        assert_eq!(warns[1].reason, "more spam");
        assert_eq!(warns[0].moderator_id, 99);
    }
}
