use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{debug, info, instrument, warn};

use super::dto::{
    CreateRecipeRequest, CreatedRecipeResponse, IngredientQuantity, RecipeDetails,
    UpdateRecipeRequest,
};
use crate::{
    error::{AppError, MessageResponse},
    state::AppState,
    store::{IngredientStore, LinkStore, NewLink, Recipe, RecipeStore, Store},
};

const NOT_FOUND: &str = "Recipe not found";

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/receitas", get(list_recipes).post(create_recipe))
        .route(
            "/receitas/:name",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

async fn load_details(store: &dyn Store, recipe: Recipe) -> anyhow::Result<RecipeDetails> {
    let ingredients = store.links_for_recipe(recipe.id).await?;
    Ok(RecipeDetails::new(recipe, ingredients))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedRecipeResponse>), AppError> {
    let Json(body) = payload?;
    let (Some(name), Some(preparation_method)) = (body.name, body.preparation_method) else {
        return Err(AppError::MissingFields);
    };

    // Committed on its own so the links below have an id to point at.
    let recipe = state
        .store
        .create_recipe(&name, Some(&preparation_method))
        .await?;

    let mut links = Vec::new();
    for IngredientQuantity { name, quantity } in body.ingredients.unwrap_or_default() {
        match state.store.find_ingredient_by_name(&name).await? {
            Some(ingredient) => links.push(NewLink {
                ingredient_id: ingredient.id,
                quantity,
            }),
            None => debug!(recipe_id = recipe.id, ingredient = %name, "unknown ingredient skipped"),
        }
    }
    let linked = state.store.insert_links(recipe.id, &links).await?;

    info!(recipe_id = recipe.id, links = linked.len(), "recipe created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedRecipeResponse {
            message: "Recipe created successfully!".into(),
            id: recipe.id,
            linked_ingredients: linked.len(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeDetails>>, AppError> {
    let recipes = state.store.list_recipes().await?;
    let mut items = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        items.push(load_details(state.store.as_ref(), recipe).await?);
    }
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RecipeDetails>, AppError> {
    let recipe = state
        .store
        .find_recipe_by_name(&name)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    Ok(Json(load_details(state.store.as_ref(), recipe).await?))
}

/// Replacing ingredients happens in two commits: the field edits together
/// with the removal of every old link, then the new links. When a named
/// ingredient is missing the second commit never happens and the recipe is
/// left without links.
#[instrument(skip(state, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> Result<Json<RecipeDetails>, AppError> {
    let Json(body) = payload?;
    let mut recipe = state
        .store
        .find_recipe_by_name(&name)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    if let Some(new_name) = body.name {
        recipe.name = new_name;
    }
    if let Some(method) = body.preparation_method {
        recipe.preparation_method = Some(method);
    }

    let store = state.store.as_ref();
    match body.ingredients {
        None => {
            recipe = store.update_recipe(&recipe).await.map_err(update_failed)?;
        }
        Some(items) => {
            let removed = store
                .update_recipe_clearing_links(&recipe)
                .await
                .map_err(update_failed)?;
            debug!(recipe_id = recipe.id, removed, "old links removed");

            let mut links = Vec::with_capacity(items.len());
            for IngredientQuantity { name, quantity } in items {
                let Some(ingredient) = store
                    .find_ingredient_by_name(&name)
                    .await
                    .map_err(update_failed)?
                else {
                    warn!(recipe_id = recipe.id, ingredient = %name, "replacement aborted");
                    return Err(AppError::IngredientNotFound(name));
                };
                links.push(NewLink {
                    ingredient_id: ingredient.id,
                    quantity,
                });
            }
            store
                .insert_links(recipe.id, &links)
                .await
                .map_err(update_failed)?;
        }
    }

    let details = load_details(store, recipe).await.map_err(update_failed)?;
    info!(recipe_id = details.id, "recipe updated");
    Ok(Json(details))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let recipe = state
        .store
        .find_recipe_by_name(&name)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    let links = state.store.delete_recipe(recipe.id).await?;

    info!(recipe_id = recipe.id, links, "recipe deleted");
    Ok(Json(MessageResponse::new("Recipe deleted successfully")))
}

fn update_failed(e: anyhow::Error) -> AppError {
    AppError::UpdateFailed(format!("{e:#}"))
}
