use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::{CharacterQuery, CharacterStore, StoreError, StoreResult};
use crate::types::{Character, CharacterFields, CharacterStatus};

/// Column list shared across queries.
const COLUMNS: &str = "id, name, real_name, origin, universe, powers, affiliation, \
     first_appearance, status, description, image_url";

const LIKE_ESCAPE: char = '!';

/// Escapes LIKE wildcards so user input only ever matches literally.
fn escape_like_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(ch);
    }
    out
}

/// Case-folded form stored in and compared against the `*_folded` columns.
fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// `%needle%` pattern over folded text, with wildcards in the needle escaped.
fn contains_pattern(needle: &str) -> String {
    escape_like_pattern(&fold(needle))
}

fn row_to_character(row: &SqliteRow) -> StoreResult<Character> {
    let status_raw: String = row.try_get("status")?;
    let status: CharacterStatus =
        status_raw.parse().map_err(|e| StoreError::Corrupt(format!("{}", e)))?;
    Ok(Character {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        real_name: row.try_get("real_name")?,
        origin: row.try_get("origin")?,
        universe: row.try_get("universe")?,
        powers: row.try_get("powers")?,
        affiliation: row.try_get("affiliation")?,
        first_appearance: row.try_get("first_appearance")?,
        status,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
    })
}

fn rows_to_characters(rows: &[SqliteRow]) -> StoreResult<Vec<Character>> {
    rows.iter().map(row_to_character).collect()
}

/// [`CharacterStore`] over the `characters` table created by [`crate::db::init_db`].
#[derive(Clone)]
pub struct SqliteCharacterStore {
    pool: SqlitePool,
}

impl SqliteCharacterStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_where(&self, clause: &str, bind: String) -> StoreResult<Vec<Character>> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE {clause} ORDER BY id");
        let rows = sqlx::query(&query).bind(bind).fetch_all(&self.pool).await?;
        rows_to_characters(&rows)
    }
}

#[async_trait]
impl CharacterStore for SqliteCharacterStore {
    async fn list(&self) -> StoreResult<Vec<Character>> {
        let query = format!("SELECT {COLUMNS} FROM characters ORDER BY id");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows_to_characters(&rows)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Character>> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = ?1");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_character).transpose()
    }

    async fn insert(&self, fields: &CharacterFields) -> StoreResult<Character> {
        let query = format!(
            "INSERT INTO characters (name, real_name, origin, universe, powers, affiliation,
                first_appearance, status, description, image_url,
                name_folded, real_name_folded, origin_folded)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(&fields.name)
            .bind(&fields.real_name)
            .bind(&fields.origin)
            .bind(&fields.universe)
            .bind(&fields.powers)
            .bind(&fields.affiliation)
            .bind(&fields.first_appearance)
            .bind(fields.status.as_str())
            .bind(&fields.description)
            .bind(&fields.image_url)
            .bind(fold(&fields.name))
            .bind(fields.real_name.as_deref().map(fold))
            .bind(fields.origin.as_deref().map(fold))
            .fetch_one(&self.pool)
            .await?;
        row_to_character(&row)
    }

    async fn update(&self, id: i64, fields: &CharacterFields) -> StoreResult<Option<Character>> {
        let query = format!(
            "UPDATE characters SET
                name = ?2, real_name = ?3, origin = ?4, universe = ?5, powers = ?6,
                affiliation = ?7, first_appearance = ?8, status = ?9, description = ?10,
                image_url = ?11, name_folded = ?12, real_name_folded = ?13, origin_folded = ?14
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(&fields.name)
            .bind(&fields.real_name)
            .bind(&fields.origin)
            .bind(&fields.universe)
            .bind(&fields.powers)
            .bind(&fields.affiliation)
            .bind(&fields.first_appearance)
            .bind(fields.status.as_str())
            .bind(&fields.description)
            .bind(&fields.image_url)
            .bind(fold(&fields.name))
            .bind(fields.real_name.as_deref().map(fold))
            .bind(fields.origin.as_deref().map(fold))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_character).transpose()
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, query: &CharacterQuery) -> StoreResult<Vec<Character>> {
        match query {
            CharacterQuery::NameContains(needle) => {
                self.fetch_where(
                    "name_folded LIKE '%' || ?1 || '%' ESCAPE '!'",
                    contains_pattern(needle),
                )
                .await
            }
            CharacterQuery::RealNameContains(needle) => {
                self.fetch_where(
                    "real_name_folded LIKE '%' || ?1 || '%' ESCAPE '!'",
                    contains_pattern(needle),
                )
                .await
            }
            CharacterQuery::OriginContains(needle) => {
                self.fetch_where(
                    "origin_folded LIKE '%' || ?1 || '%' ESCAPE '!'",
                    contains_pattern(needle),
                )
                .await
            }
            CharacterQuery::AffiliationEquals(value) => {
                self.fetch_where("affiliation = ?1", value.clone()).await
            }
            CharacterQuery::StatusEquals(status) => {
                self.fetch_where("status = ?1", status.as_str().to_string()).await
            }
            CharacterQuery::Criteria(filter) => {
                // One fixed statement; an unbound (NULL) criterion disables its predicate.
                let query = format!(
                    "SELECT {COLUMNS} FROM characters
                     WHERE (?1 IS NULL OR name_folded LIKE '%' || ?1 || '%' ESCAPE '!')
                       AND (?2 IS NULL OR affiliation = ?2)
                       AND (?3 IS NULL OR status = ?3)
                     ORDER BY id"
                );
                let rows = sqlx::query(&query)
                    .bind(filter.name.as_deref().map(contains_pattern))
                    .bind(filter.affiliation.as_deref())
                    .bind(filter.status.map(|s| s.as_str()))
                    .fetch_all(&self.pool)
                    .await?;
                rows_to_characters(&rows)
            }
        }
    }

    async fn exists_by_name(&self, name: &str) -> StoreResult<bool> {
        let hits: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM characters WHERE name_folded = ?1",
        )
        .bind(fold(name))
        .fetch_one(&self.pool)
        .await?;
        Ok(hits > 0)
    }

    async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM characters")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
