//! Application-level operations on characters.
//!
//! [`CharacterService`] validates payloads, turns misses into
//! [`AppError::NotFound`] and otherwise delegates to the injected
//! [`CharacterStore`].

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{validation::check_max_len, AppError, AppResult, OptionExt};
use crate::store::{CharacterQuery, CharacterStore};
use crate::types::{Character, CharacterFields, CharacterFilter, CharacterPayload, CharacterStatus};

pub const NAME_MAX: usize = 100;
pub const REAL_NAME_MAX: usize = 100;
pub const ORIGIN_MAX: usize = 150;
pub const UNIVERSE_MAX: usize = 100;
pub const POWERS_MAX: usize = 500;
pub const AFFILIATION_MAX: usize = 100;
pub const FIRST_APPEARANCE_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 1000;
pub const IMAGE_URL_MAX: usize = 500;

impl CharacterPayload {
    /// Checks required fields and length bounds, collecting every violation.
    pub fn validate(self) -> AppResult<CharacterFields> {
        let mut errors = BTreeMap::new();

        let name = self.name.unwrap_or_default();
        if name.trim().is_empty() {
            errors.insert("name".to_string(), "Name is required".to_string());
        }
        check_max_len(&mut errors, "name", "Name", Some(name.as_str()), NAME_MAX);
        check_max_len(&mut errors, "realName", "Real name", self.real_name.as_deref(), REAL_NAME_MAX);
        check_max_len(&mut errors, "origin", "Origin", self.origin.as_deref(), ORIGIN_MAX);
        check_max_len(&mut errors, "universe", "Universe", self.universe.as_deref(), UNIVERSE_MAX);
        check_max_len(&mut errors, "powers", "Powers", self.powers.as_deref(), POWERS_MAX);
        check_max_len(
            &mut errors,
            "affiliation",
            "Affiliation",
            self.affiliation.as_deref(),
            AFFILIATION_MAX,
        );
        check_max_len(
            &mut errors,
            "firstAppearance",
            "First appearance",
            self.first_appearance.as_deref(),
            FIRST_APPEARANCE_MAX,
        );
        check_max_len(
            &mut errors,
            "description",
            "Description",
            self.description.as_deref(),
            DESCRIPTION_MAX,
        );
        check_max_len(&mut errors, "imageUrl", "Image URL", self.image_url.as_deref(), IMAGE_URL_MAX);

        if !errors.is_empty() {
            return Err(AppError::Validation { errors });
        }

        Ok(CharacterFields {
            name,
            real_name: self.real_name,
            origin: self.origin,
            universe: self.universe,
            powers: self.powers,
            affiliation: self.affiliation,
            first_appearance: self.first_appearance,
            status: self.status.unwrap_or_default(),
            description: self.description,
            image_url: self.image_url,
        })
    }
}

/// Thin facade over an injected [`CharacterStore`].
#[derive(Clone)]
pub struct CharacterService {
    store: Arc<dyn CharacterStore>,
}

impl CharacterService {
    pub fn new(store: Arc<dyn CharacterStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CharacterStore> {
        &self.store
    }

    pub async fn list(&self) -> AppResult<Vec<Character>> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<Character> {
        self.store.get(id).await?.ok_or_not_found(&format!("Character with id {}", id))
    }

    /// Inserts a new record. Any `id` in the payload is ignored.
    pub async fn create(&self, payload: CharacterPayload) -> AppResult<Character> {
        let fields = payload.validate()?;
        let created = self.store.insert(&fields).await?;
        tracing::info!(id = created.id, name = %created.name, "character created");
        Ok(created)
    }

    /// Replaces every field except the id, `imageUrl` included.
    pub async fn update(&self, id: i64, payload: CharacterPayload) -> AppResult<Character> {
        let fields = payload.validate()?;
        let updated = self
            .store
            .update(id, &fields)
            .await?
            .ok_or_not_found(&format!("Character with id {}", id))?;
        tracing::info!(id, "character updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("Character with id {} not found", id)));
        }
        tracing::info!(id, "character deleted");
        Ok(())
    }

    pub async fn search_by_name(&self, name: &str) -> AppResult<Vec<Character>> {
        self.find(CharacterQuery::NameContains(name.to_string())).await
    }

    pub async fn search_by_real_name(&self, real_name: &str) -> AppResult<Vec<Character>> {
        self.find(CharacterQuery::RealNameContains(real_name.to_string())).await
    }

    pub async fn search_by_origin(&self, origin: &str) -> AppResult<Vec<Character>> {
        self.find(CharacterQuery::OriginContains(origin.to_string())).await
    }

    pub async fn search_by_affiliation(&self, affiliation: &str) -> AppResult<Vec<Character>> {
        self.find(CharacterQuery::AffiliationEquals(affiliation.to_string())).await
    }

    pub async fn search_by_status(&self, status: CharacterStatus) -> AppResult<Vec<Character>> {
        self.find(CharacterQuery::StatusEquals(status)).await
    }

    /// Conjunctive filter. Blank string criteria count as absent.
    pub async fn filter(&self, filter: CharacterFilter) -> AppResult<Vec<Character>> {
        let filter = CharacterFilter {
            name: non_blank(filter.name),
            affiliation: non_blank(filter.affiliation),
            status: filter.status,
        };
        if filter.is_empty() {
            return self.list().await;
        }
        self.find(CharacterQuery::Criteria(filter)).await
    }

    pub async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self.store.exists_by_name(name).await?)
    }

    pub async fn count(&self) -> AppResult<i64> {
        Ok(self.store.count().await?)
    }

    async fn find(&self, query: CharacterQuery) -> AppResult<Vec<Character>> {
        Ok(self.store.find(&query).await?)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
