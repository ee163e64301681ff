use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CreateIngredientRequest, UpdateIngredientRequest};
use crate::{
    error::{AppError, MessageResponse},
    state::AppState,
    store::{Ingredient, IngredientStore},
};

const NOT_FOUND: &str = "Ingredient not found";

pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredientes", get(list_ingredients).post(create_ingredient))
        .route(
            "/ingredientes/:name",
            get(get_ingredient)
                .put(update_ingredient)
                .delete(delete_ingredient),
        )
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> Result<Json<Vec<Ingredient>>, AppError> {
    Ok(Json(state.store.list_ingredients().await?))
}

#[instrument(skip(state))]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Ingredient>, AppError> {
    state
        .store
        .find_ingredient_by_name(&name)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}

#[instrument(skip(state, payload))]
pub async fn update_ingredient(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<UpdateIngredientRequest>, JsonRejection>,
) -> Result<Json<Ingredient>, AppError> {
    let Json(body) = payload?;
    let current = state
        .store
        .find_ingredient_by_name(&name)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    let changes = Ingredient {
        id: body.id.unwrap_or(current.id),
        name: body.name.unwrap_or_else(|| current.name.clone()),
        unit_of_measure: body
            .unit_of_measure
            .unwrap_or_else(|| current.unit_of_measure.clone()),
    };
    let updated = state.store.update_ingredient(current.id, &changes).await?;

    info!(old_id = current.id, ingredient_id = updated.id, "ingredient updated");
    Ok(Json(updated))
}

#[instrument(skip(state, payload))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    payload: Result<Json<CreateIngredientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Ingredient>), AppError> {
    let Json(body) = payload?;
    let (Some(name), Some(unit_of_measure)) = (body.name, body.unit_of_measure) else {
        return Err(AppError::MissingFields);
    };

    let ingredient = state.store.create_ingredient(&name, &unit_of_measure).await?;

    info!(ingredient_id = ingredient.id, name = %ingredient.name, "ingredient created");
    Ok((StatusCode::CREATED, Json(ingredient)))
}

#[instrument(skip(state))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let ingredient = state
        .store
        .find_ingredient_by_name(&name)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    let links = state.store.delete_ingredient(ingredient.id).await?;

    info!(ingredient_id = ingredient.id, links, "ingredient deleted");
    Ok(Json(MessageResponse::new("Ingredient deleted successfully")))
}
