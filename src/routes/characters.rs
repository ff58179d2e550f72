use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::extract::{AppJson, AppPath, AppQuery};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    types::{Character, CharacterFilter, CharacterPayload, CharacterStatus},
};

/// `GET /characters/search`: exactly one of the three parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub name: Option<String>,
    pub real_name: Option<String>,
    pub origin: Option<String>,
}

/// `GET /characters/filter`: every parameter optional, blanks ignored.
#[derive(Debug, Deserialize)]
pub struct FilterParams {
    pub name: Option<String>,
    pub affiliation: Option<String>,
    pub status: Option<String>,
}

fn parse_status(raw: &str) -> AppResult<CharacterStatus> {
    raw.parse().map_err(|e| AppError::InvalidInput(format!("{}", e)))
}

pub async fn list_characters(State(state): State<AppState>) -> AppResult<Json<Vec<Character>>> {
    Ok(Json(state.characters.list().await?))
}

pub async fn get_character(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Character>> {
    Ok(Json(state.characters.get(id).await?))
}

pub async fn create_character(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CharacterPayload>,
) -> AppResult<(StatusCode, Json<Character>)> {
    let created = state.characters.create(payload).await?;
    state.metrics.inc_created();
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_character(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CharacterPayload>,
) -> AppResult<Json<Character>> {
    let updated = state.characters.update(id, payload).await?;
    state.metrics.inc_updated();
    Ok(Json(updated))
}

pub async fn delete_character(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    state.characters.delete(id).await?;
    state.metrics.inc_deleted();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_characters(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<Vec<Character>>> {
    let found = match (params.name, params.real_name, params.origin) {
        (Some(name), None, None) => state.characters.search_by_name(&name).await?,
        (None, Some(real_name), None) => state.characters.search_by_real_name(&real_name).await?,
        (None, None, Some(origin)) => state.characters.search_by_origin(&origin).await?,
        _ => {
            return Err(AppError::InvalidInput(
                "Provide exactly one of the query parameters name, realName or origin".into(),
            ))
        }
    };
    Ok(Json(found))
}

pub async fn characters_by_affiliation(
    State(state): State<AppState>,
    AppPath(affiliation): AppPath<String>,
) -> AppResult<Json<Vec<Character>>> {
    Ok(Json(state.characters.search_by_affiliation(&affiliation).await?))
}

pub async fn characters_by_status(
    State(state): State<AppState>,
    AppPath(status): AppPath<String>,
) -> AppResult<Json<Vec<Character>>> {
    let status = parse_status(&status)?;
    Ok(Json(state.characters.search_by_status(status).await?))
}

pub async fn filter_characters(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<FilterParams>,
) -> AppResult<Json<Vec<Character>>> {
    let status = match params.status.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_status(raw)?),
        _ => None,
    };
    let filter = CharacterFilter { name: params.name, affiliation: params.affiliation, status };
    Ok(Json(state.characters.filter(filter).await?))
}

pub async fn character_exists(
    State(state): State<AppState>,
    AppPath(name): AppPath<String>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.characters.exists_by_name(&name).await?))
}
