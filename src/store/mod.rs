//! Record store for character rows.
//!
//! [`CharacterStore`] is the only seam between the service layer and
//! persistence. Production uses [`SqliteCharacterStore`]; tests and the
//! `memory:` database URL use [`MemoryCharacterStore`].

use async_trait::async_trait;

use crate::types::{Character, CharacterFields, CharacterFilter, CharacterStatus};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCharacterStore;
pub use sqlite::SqliteCharacterStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A row could not be mapped back into a [`Character`].
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Predicates the store knows how to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterQuery {
    NameContains(String),
    RealNameContains(String),
    OriginContains(String),
    AffiliationEquals(String),
    StatusEquals(CharacterStatus),
    Criteria(CharacterFilter),
}

impl CharacterQuery {
    pub fn matches(&self, character: &Character) -> bool {
        use crate::types::contains_ignore_case;

        match self {
            CharacterQuery::NameContains(needle) => contains_ignore_case(&character.name, needle),
            CharacterQuery::RealNameContains(needle) => character
                .real_name
                .as_deref()
                .is_some_and(|v| contains_ignore_case(v, needle)),
            CharacterQuery::OriginContains(needle) => character
                .origin
                .as_deref()
                .is_some_and(|v| contains_ignore_case(v, needle)),
            CharacterQuery::AffiliationEquals(value) => {
                character.affiliation.as_deref() == Some(value.as_str())
            }
            CharacterQuery::StatusEquals(status) => character.status == *status,
            CharacterQuery::Criteria(filter) => filter.matches(character),
        }
    }
}

/// Persistence capabilities required by [`crate::service::CharacterService`].
///
/// Every method is a single statement against the backing table; results are
/// ordered by id.
#[async_trait]
pub trait CharacterStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Character>>;

    async fn get(&self, id: i64) -> StoreResult<Option<Character>>;

    /// Inserts a new row and returns it with its freshly assigned id.
    async fn insert(&self, fields: &CharacterFields) -> StoreResult<Character>;

    /// Replaces every mutable field. `None` when no row has this id.
    async fn update(&self, id: i64, fields: &CharacterFields) -> StoreResult<Option<Character>>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    async fn find(&self, query: &CharacterQuery) -> StoreResult<Vec<Character>>;

    /// Case-insensitive exact name match.
    async fn exists_by_name(&self, name: &str) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<i64>;

    /// Cheap liveness probe for readiness checks.
    async fn ping(&self) -> StoreResult<()>;
}
