use crate::domain::model::projection_to_json;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{AppState, ErrorBody, TopCountriesResponse, TopCountry};
use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/api/filterby/year/{year}",
    params(
        ("year" = String, Path, description = "Four-digit year between 1995 and 2020")
    ),
    responses(
        (status = 200, description = "`{Country_Name, year_<year>}` for every country"),
        (status = 404, description = "Year is not numeric or outside the dataset", body = ErrorBody)
    )
)]
pub async fn filter_by_year_handler(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<Vec<JsonValue>>, ApiError> {
    let projection = state.service.year(&year).await?;
    Ok(Json(projection_to_json(&projection)))
}

#[utoipa::path(
    get,
    path = "/api/top-10-countries",
    responses(
        (status = 200, description = "Ten countries with the highest 10-year average arrivals", body = TopCountriesResponse)
    )
)]
pub async fn top_countries_handler(
    State(state): State<AppState>,
) -> Result<Json<TopCountriesResponse>, ApiError> {
    let records = state.service.top_countries().await?;
    Ok(Json(TopCountriesResponse {
        countries: records.iter().map(TopCountry::from).collect(),
    }))
}
