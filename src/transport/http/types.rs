use crate::app::country_service::CountryService;
use crate::domain::model::Record;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub service: CountryService,
}

impl AppState {
    pub fn new(service: CountryService) -> Self {
        Self { service }
    }
}

/// Body of every 4xx/5xx response.
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorBody {
    /// Machine-checkable status code.
    pub status: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TopCountry {
    #[serde(rename = "Country_Name")]
    pub country_name: String,
    #[serde(rename = "Average arrivals in last 10 recorded years")]
    pub average: Option<String>,
}

impl From<&Record> for TopCountry {
    fn from(record: &Record) -> Self {
        Self {
            country_name: record.key().to_string(),
            average: record
                .get(crate::domain::model::registry::AVERAGE_COLUMN)
                .and_then(|v| v.as_text())
                .map(str::to_string),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TopCountriesResponse {
    #[serde(rename = "Top 10 countries for tourist arrivals")]
    pub countries: Vec<TopCountry>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
