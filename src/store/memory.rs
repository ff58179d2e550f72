use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CharacterQuery, CharacterStore, StoreResult};
use crate::types::{Character, CharacterFields};

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i64, Character>,
    last_id: i64,
}

/// In-process store keeping rows in id order.
///
/// Ids come from a counter that only moves forward, so a deleted id is never
/// handed out again.
#[derive(Default)]
pub struct MemoryCharacterStore {
    inner: RwLock<Inner>,
}

impl MemoryCharacterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterStore for MemoryCharacterStore {
    async fn list(&self) -> StoreResult<Vec<Character>> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Character>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, fields: &CharacterFields) -> StoreResult<Character> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let character = Character::from_fields(inner.last_id, fields.clone());
        inner.rows.insert(character.id, character.clone());
        Ok(character)
    }

    async fn update(&self, id: i64, fields: &CharacterFields) -> StoreResult<Option<Character>> {
        let mut inner = self.inner.write().await;
        match inner.rows.get_mut(&id) {
            Some(row) => {
                *row = Character::from_fields(id, fields.clone());
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn find(&self, query: &CharacterQuery) -> StoreResult<Vec<Character>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().filter(|c| query.matches(c)).cloned().collect())
    }

    async fn exists_by_name(&self, name: &str) -> StoreResult<bool> {
        let needle = name.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner.rows.values().any(|c| c.name.to_lowercase() == needle))
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.inner.read().await.rows.len() as i64)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
