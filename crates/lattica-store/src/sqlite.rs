//! SQLite-backed remote map
//!
//! One table per map namespace, values JSON-encoded. Writes use the
//! `ON CONFLICT DO UPDATE` upsert idiom; batch calls run in a single
//! transaction so "all complete or the operation failed" holds per call.

use std::marker::PhantomData;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db;
use crate::errors::{backing, from_rusqlite, Result};
use crate::remote_map::RemoteMap;

/// Persisted key-value map stored in a SQLite table
pub struct SqliteRemoteMap<V> {
    conn: Connection,
    table: String,
    _value: PhantomData<V>,
}

impl<V> SqliteRemoteMap<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Open (or create) the map named `namespace` in the database at `path`
    ///
    /// Maps sharing one database file get separate tables and may hold
    /// separate connections.
    pub fn open<P: AsRef<Path>>(path: P, namespace: &str) -> Result<SqliteRemoteMap<V>> {
        let conn = db::open(path)?;
        db::configure(&conn)?;
        SqliteRemoteMap::with_connection(conn, namespace)
    }

    /// Open a throwaway in-memory map (for testing)
    pub fn open_in_memory(namespace: &str) -> Result<SqliteRemoteMap<V>> {
        SqliteRemoteMap::with_connection(db::open_in_memory()?, namespace)
    }

    fn with_connection(conn: Connection, namespace: &str) -> Result<SqliteRemoteMap<V>> {
        if namespace.is_empty()
            || !namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(backing(
                "open_map",
                format!("invalid map namespace: {:?}", namespace),
            ));
        }
        let table = format!("remote_map_{}", namespace);
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
                table
            ),
            [],
        )
        .map_err(|err| from_rusqlite("create_map", err))?;
        Ok(SqliteRemoteMap {
            conn,
            table,
            _value: PhantomData,
        })
    }
}

impl<V> RemoteMap<V> for SqliteRemoteMap<V>
where
    V: Serialize + DeserializeOwned,
{
    fn get(&self, key: &str) -> Result<Option<V>> {
        let encoded: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT value FROM {} WHERE key = ?1", self.table),
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| from_rusqlite("get", err))?;
        match encoded {
            Some(encoded) => Ok(Some(serde_json::from_str(&encoded)?)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: V) -> Result<()> {
        let encoded = serde_json::to_string(&value)?;
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    self.table
                ),
                [key, encoded.as_str()],
            )
            .map_err(|err| from_rusqlite("set", err))?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute(
                &format!("DELETE FROM {} WHERE key = ?1", self.table),
                [key],
            )
            .map_err(|err| from_rusqlite("delete", err))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.conn
            .execute(&format!("DELETE FROM {}", self.table), [])
            .map_err(|err| from_rusqlite("clear", err))?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT key FROM {} ORDER BY key", self.table))
            .map_err(|err| from_rusqlite("keys", err))?;
        let keys = stmt
            .query_map([], |row| row.get(0))
            .map_err(|err| from_rusqlite("keys", err))?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(|err| from_rusqlite("keys", err))?;
        Ok(keys)
    }

    fn set_all(&mut self, entries: Vec<(String, V)>) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(|err| from_rusqlite("set_all", err))?;
        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO {} (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    self.table
                ))
                .map_err(|err| from_rusqlite("set_all", err))?;
            for (key, value) in entries {
                let encoded = serde_json::to_string(&value)?;
                stmt.execute([key.as_str(), encoded.as_str()])
                    .map_err(|err| from_rusqlite("set_all", err))?;
            }
        }
        tx.commit().map_err(|err| from_rusqlite("set_all", err))
    }

    fn delete_all(&mut self, keys: Vec<String>) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(|err| from_rusqlite("delete_all", err))?;
        {
            let mut stmt = tx
                .prepare(&format!("DELETE FROM {} WHERE key = ?1", self.table))
                .map_err(|err| from_rusqlite("delete_all", err))?;
            for key in keys {
                stmt.execute([key.as_str()])
                    .map_err(|err| from_rusqlite("delete_all", err))?;
            }
        }
        tx.commit().map_err(|err| from_rusqlite("delete_all", err))
    }
}
