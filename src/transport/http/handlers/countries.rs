use crate::domain::model::{to_json, to_json_many};
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::Payload;
use crate::transport::http::types::{AppState, ErrorBody};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/api/countries",
    responses(
        (status = 200, description = "Every country record, each with all columns in schema order")
    )
)]
pub async fn list_countries_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonValue>>, ApiError> {
    let records = state.service.list_countries().await?;
    Ok(Json(to_json_many(&records)))
}

#[utoipa::path(
    get,
    path = "/api/countries/country/{name}",
    params(
        ("name" = String, Path, description = "Country name (e.g. France)")
    ),
    responses(
        (status = 200, description = "The country record"),
        (status = 404, description = "No such country", body = ErrorBody)
    )
)]
pub async fn get_country_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<JsonValue>, ApiError> {
    state
        .service
        .country(&name)
        .await?
        .map(|record| Json(to_json(&record)))
        .ok_or(ApiError::InvalidCountryName)
}

#[utoipa::path(
    post,
    path = "/api/countries",
    request_body = Object,
    responses(
        (status = 201, description = "Country created; body is the stored record"),
        (status = 400, description = "Missing keys, wrong type, empty identity column or malformed body", body = ErrorBody),
        (status = 409, description = "Country name already exists", body = ErrorBody)
    )
)]
pub async fn create_country_handler(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<(StatusCode, Json<JsonValue>), ApiError> {
    let payload = payload.into_object()?;
    let record = state.service.create_country(&payload).await?;
    Ok((StatusCode::CREATED, Json(to_json(&record))))
}

#[utoipa::path(
    patch,
    path = "/api/countries/{name}",
    params(
        ("name" = String, Path, description = "Country to update")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Country updated; body is the stored record"),
        (status = 400, description = "Unknown column, wrong type, empty identity column, unchanged value or malformed body", body = ErrorBody),
        (status = 404, description = "No such country", body = ErrorBody)
    )
)]
pub async fn update_country_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Payload,
) -> Result<Json<JsonValue>, ApiError> {
    // An unknown country is reported before the body is looked at.
    if state.service.country(&name).await?.is_none() {
        return Err(ApiError::CountryDoesNotExist);
    }
    let payload = payload.into_object()?;
    let record = state.service.update_country(&name, &payload).await?;
    Ok(Json(to_json(&record)))
}
