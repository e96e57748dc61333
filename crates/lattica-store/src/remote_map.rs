//! Persisted key-value map abstraction
//!
//! Indexes are maintained against this interface, never against a concrete
//! backend. Batch calls give no ordering guarantee across keys beyond "all
//! complete or the operation failed". All operations are idempotent:
//! re-setting an identical value or deleting an absent key are no-ops.

use std::collections::HashMap;

use crate::errors::Result;

/// A persisted mapping of string keys to values
pub trait RemoteMap<V> {
    /// Value stored at `key`, if any
    fn get(&self, key: &str) -> Result<Option<V>>;

    /// Upsert a single entry
    fn set(&mut self, key: &str, value: V) -> Result<()>;

    /// Delete a single entry; deleting an absent key is a no-op
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Remove every entry
    fn clear(&mut self) -> Result<()>;

    /// All stored keys, sorted
    fn keys(&self) -> Result<Vec<String>>;

    /// Upsert a batch of entries
    fn set_all(&mut self, entries: Vec<(String, V)>) -> Result<()> {
        for (key, value) in entries {
            self.set(&key, value)?;
        }
        Ok(())
    }

    /// Delete a batch of keys
    fn delete_all(&mut self, keys: Vec<String>) -> Result<()> {
        for key in keys {
            self.delete(&key)?;
        }
        Ok(())
    }
}

/// HashMap-backed map for tests and the non-persistent profile
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemoteMap<V> {
    entries: HashMap<String, V>,
}

impl<V> InMemoryRemoteMap<V> {
    pub fn new() -> InMemoryRemoteMap<V> {
        InMemoryRemoteMap {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> RemoteMap<V> for InMemoryRemoteMap<V> {
    fn get(&self, key: &str) -> Result<Option<V>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: V) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let mut map = InMemoryRemoteMap::new();
        assert_eq!(map.get("a").unwrap(), None);

        map.set("a", 1u32).unwrap();
        assert_eq!(map.get("a").unwrap(), Some(1));

        map.set("a", 2).unwrap();
        assert_eq!(map.get("a").unwrap(), Some(2));

        map.delete("a").unwrap();
        assert_eq!(map.get("a").unwrap(), None);

        // Deleting an absent key is a no-op
        map.delete("a").unwrap();
    }

    #[test]
    fn test_batch_operations_and_clear() {
        let mut map = InMemoryRemoteMap::new();
        map.set_all(vec![
            ("a".to_string(), 1u32),
            ("b".to_string(), 2),
            ("c".to_string(), 3),
        ])
        .unwrap();
        assert_eq!(
            map.keys().unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );

        map.delete_all(vec!["a".to_string(), "missing".to_string()])
            .unwrap();
        assert_eq!(map.keys().unwrap(), vec!["b".to_string(), "c".to_string()]);

        map.clear().unwrap();
        assert!(map.is_empty());
    }
}
