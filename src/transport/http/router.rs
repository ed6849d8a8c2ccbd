use crate::transport::http::handlers::{countries, health, rankings};
use crate::transport::http::types::{
    AppState, ErrorBody, HealthResponse, TopCountriesResponse, TopCountry,
};
use axum::routing::{get, patch};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        countries::list_countries_handler,
        countries::get_country_handler,
        countries::create_country_handler,
        countries::update_country_handler,
        rankings::filter_by_year_handler,
        rankings::top_countries_handler
    ),
    components(schemas(ErrorBody, HealthResponse, TopCountriesResponse, TopCountry))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/countries",
            get(countries::list_countries_handler).post(countries::create_country_handler),
        )
        .route(
            "/api/countries/country/:name",
            get(countries::get_country_handler),
        )
        .route(
            "/api/countries/:name",
            patch(countries::update_country_handler),
        )
        .route(
            "/api/filterby/year/:year",
            get(rankings::filter_by_year_handler),
        )
        .route("/api/top-10-countries", get(rankings::top_countries_handler))
        .with_state(app_state)
}
