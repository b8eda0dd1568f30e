/*
 * Responsibility
 * - /drinks CRUD handlers
 * - Protected handlers receive the verified claims (AuthClaims) from the requires_auth layer
 * - Mutations map every storage / validation failure to 422; the cause only goes to the log
 */
use std::fmt::Debug;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    api::v1::{
        dto::drinks::{
            CreateDrinkRequest, DeleteDrinkResponse, Drink, DrinkSummary, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::AuthClaims,
    },
    error::AppError,
    repos::DrinkRow,
    state::AppState,
};

fn unprocessable<E: Debug>(context: &'static str) -> impl FnOnce(E) -> AppError {
    move |e| {
        tracing::error!(error = ?e, context, "drink request rejected");
        AppError::Unprocessable
    }
}

fn row_to_drink(row: DrinkRow) -> Result<Drink, AppError> {
    let id = row.id;
    Drink::try_from(row).map_err(|e| {
        tracing::error!(error = %e, drink_id = id, "stored recipe is not valid json");
        AppError::Internal
    })
}

async fn load_all(state: &AppState) -> Result<Vec<Drink>, AppError> {
    let rows = state.drinks.list().await?;

    let mut drinks = Vec::with_capacity(rows.len());
    for row in rows {
        drinks.push(row_to_drink(row)?);
    }

    Ok(drinks)
}

// `/drinks/{id}` only matches integer ids; anything else is an unknown resource.
fn drink_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkSummary>>, AppError> {
    let drinks = load_all(&state).await?;

    Ok(Json(DrinksResponse::new(
        drinks.iter().map(Drink::summary).collect(),
    )))
}

pub async fn list_drinks_detail(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> Result<Json<DrinksResponse<Drink>>, AppError> {
    tracing::debug!(sub = ?claims.sub, "listing drink details");

    let drinks = load_all(&state).await?;
    Ok(Json(DrinksResponse::new(drinks)))
}

pub async fn create_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<Drink>>, AppError> {
    let Json(req) = payload.map_err(unprocessable("create_drink: body"))?;
    req.validate().map_err(unprocessable("create_drink: validate"))?;

    let (Some(title), Some(recipe)) = (req.title, req.recipe) else {
        return Err(AppError::Unprocessable);
    };
    let recipe = serde_json::to_string(&recipe.into_ingredients())
        .map_err(unprocessable("create_drink: encode recipe"))?;

    let row = state
        .drinks
        .create(title.trim(), &recipe)
        .await
        .map_err(unprocessable("drink_repo::create"))?;

    tracing::info!(sub = ?claims.sub, drink_id = row.id, "drink created");

    Ok(Json(DrinksResponse::new(vec![row_to_drink(row)?])))
}

pub async fn update_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<Drink>>, AppError> {
    let id = drink_id(id)?;
    let Json(req) = payload.map_err(unprocessable("update_drink: body"))?;

    let title = req.title().map(|t| t.trim().to_string());
    let recipe = req
        .into_recipe()
        .map(|r| serde_json::to_string(&r))
        .transpose()
        .map_err(unprocessable("update_drink: encode recipe"))?;

    let row = state
        .drinks
        .update(id, title.as_deref(), recipe.as_deref())
        .await
        .map_err(unprocessable("drink_repo::update"))?
        .ok_or(AppError::NotFound)?;

    tracing::info!(sub = ?claims.sub, drink_id = row.id, "drink updated");

    Ok(Json(DrinksResponse::new(vec![row_to_drink(row)?])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteDrinkResponse>, AppError> {
    let id = drink_id(id)?;

    let deleted = state
        .drinks
        .delete(id)
        .await
        .map_err(unprocessable("drink_repo::delete"))?;

    if !deleted {
        return Err(AppError::NotFound);
    }

    tracing::info!(sub = ?claims.sub, drink_id = id, "drink deleted");

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}
