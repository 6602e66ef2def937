//! Authenticated admin car routes.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Request, State},
    http::{StatusCode, header},
    routing::{get, put},
};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use kifaru_core::{CarId, CarStatus};

use crate::db::{CarRepository, SettingsRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{Car, CarForm, CarPatch};
use crate::state::AppState;

/// Multipart uploads carry full-size photos; 25 MiB covers a generous batch.
const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Build the admin car routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/cars", get(list_cars).post(create_car))
        .route(
            "/cars/{id}",
            put(update_car).patch(update_car).delete(delete_car),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

/// Dashboard statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_cars: i64,
    pub total_active_listings: i64,
    pub pending_approvals: i64,
    pub total_revenue: i64,
    /// Cars listed within the last 7 days.
    pub new_leads: i64,
    /// Admin sessions active within the last 24 hours.
    pub active_users: i64,
}

/// Aggregate listing counts and revenue for the dashboard.
#[instrument(skip_all)]
async fn dashboard(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>> {
    let cars = CarRepository::new(state.pool());
    let settings = SettingsRepository::new(state.pool());

    let total_cars = cars.count_all().await?;
    let total_active_listings = cars.count_by_status(CarStatus::Published).await?;
    let pending_approvals = cars.count_by_status(CarStatus::Draft).await?;
    let total_revenue = cars.sold_revenue().await?;
    let new_leads = cars.count_recent().await?;
    let active_users = settings.count_active_sessions().await?;

    Ok(Json(DashboardStats {
        total_cars,
        total_active_listings,
        pending_approvals,
        total_revenue,
        new_leads,
        active_users,
    }))
}

/// Every listing regardless of status, newest first.
#[instrument(skip_all)]
async fn list_cars(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Car>>> {
    let cars = CarRepository::new(state.pool()).list_all().await?;
    Ok(Json(cars))
}

/// Create a listing from a multipart form.
#[instrument(skip_all)]
async fn create_car(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Car>)> {
    let (form, uploaded) = collect_form(&state, multipart).await?;

    // Text-field URLs and fresh uploads both land in the stored image list.
    let mut images = form.image_urls();
    images.extend(uploaded);

    let new_car = form
        .into_new_car(images)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let car = CarRepository::new(state.pool()).create(new_car).await?;

    tracing::info!(car_id = %car.id, "car created");
    Ok((StatusCode::CREATED, Json(car)))
}

/// Update a listing; only the submitted fields change.
///
/// Quick edits arrive as JSON, the full edit form as multipart; both are
/// accepted, keyed off the request content type.
#[instrument(skip_all, fields(car_id = id))]
async fn update_car(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    request: Request,
) -> Result<Json<Car>> {
    let patch = extract_patch(&state, request).await?;

    let car = CarRepository::new(state.pool())
        .update(CarId::new(id), patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Car not found".to_owned()))?;

    Ok(Json(car))
}

/// Pull a [`CarPatch`] out of either a JSON or a multipart request body.
async fn extract_patch(state: &AppState, request: Request) -> Result<CarPatch> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("application/json"));

    if is_json {
        let Json(patch) = Json::<CarPatch>::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok(patch);
    }

    let multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let (form, uploaded) = collect_form(state, multipart).await?;
    form.into_patch(uploaded)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Delete a listing.
#[instrument(skip_all, fields(car_id = id))]
async fn delete_car(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let deleted = CarRepository::new(state.pool())
        .delete(CarId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Car not found".to_owned()));
    }

    tracing::info!("car deleted");
    Ok(Json(json!({ "message": "Car deleted" })))
}

/// Drain a multipart submission: text fields accumulate in a [`CarForm`],
/// file parts are pushed to the image host.
async fn collect_form(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<(CarForm, Vec<String>)> {
    let mut form = CarForm::default();
    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();

        if let Some(file_name) = field.file_name().map(ToOwned::to_owned) {
            let cloudinary = state.cloudinary().ok_or_else(|| {
                AppError::BadRequest("Image uploads are not configured".to_owned())
            })?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            let url = cloudinary.upload_image(&file_name, bytes.to_vec()).await?;
            uploaded.push(url);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.push(&name, value);
        }
    }

    Ok((form, uploaded))
}
