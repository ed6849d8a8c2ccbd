//! Shared setup: an in-process API server over a private in-memory database.

#![allow(dead_code)]

use serde_json::{json, Map, Value};
use tourism_arrivals_api::transport::http::{create_router, AppState};
use tourism_arrivals_api::{CountryService, RecordStore, TOURISM_ARRIVALS};

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: RecordStore,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post_country(&self, payload: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/countries"))
            .json(payload)
            .send()
            .await
            .expect("POST /api/countries")
    }

    pub async fn patch_country(&self, name: &str, payload: &Value) -> reqwest::Response {
        self.client
            .patch(self.url(&format!("/api/countries/{}", name)))
            .json(payload)
            .send()
            .await
            .expect("PATCH /api/countries/<name>")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.get(path).await;
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("JSON body"))
    }
}

pub async fn spawn_app() -> TestApp {
    let store = RecordStore::in_memory().await.expect("in-memory store");
    store.ensure_schema().await.expect("schema");

    let router = create_router(AppState::new(CountryService::new(store.clone())));

    // Bind to an ephemeral port so tests can run in parallel.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        store,
    }
}

/// A complete, valid insert payload with every column present.
pub fn country_payload(name: &str, code: &str, average: Option<&str>) -> Value {
    let mut payload = Map::new();
    for column in TOURISM_ARRIVALS.column_names() {
        payload.insert(column.to_string(), Value::Null);
    }
    payload.insert("Country_Name".into(), json!(name));
    payload.insert("Region".into(), json!("Europe & Central Asia"));
    payload.insert("IncomeGroup".into(), json!("High income"));
    payload.insert("Country_Code".into(), json!(code));
    payload.insert(
        "Indicator_Name".into(),
        json!("International tourism, number of arrivals"),
    );
    payload.insert("year_1995".into(), json!(1_000_000));
    payload.insert("year_2019".into(), json!(2_500_000));
    payload.insert("year_2020".into(), json!(700_000));
    payload.insert("Average_10year_in_tourist_arrivals".into(), json!(average));
    payload.insert("Max_number_of_arrivals".into(), json!(2_500_000));
    payload.insert("Minimum_number_of_arrivals".into(), json!(700_000));
    payload.insert("Percent_drop_2019_to_2020".into(), json!("72"));
    Value::Object(payload)
}

/// Eleven countries with distinct averages, highest first.
pub const SEED_AVERAGES: [(&str, &str, &str); 11] = [
    ("France", "FRA", "196572800"),
    ("United States", "USA", "158278026.6"),
    ("China", "CHN", "130580500"),
    ("Spain", "ESP", "104183800"),
    ("Mexico", "MEX", "83798500"),
    ("Italy", "ITA", "78958560.16"),
    ("Poland", "POL", "76742111.11"),
    ("Croatia", "HRV", "50864700"),
    ("Hong Kong SAR, China", "HKG", "50473900"),
    ("Austria", "AUT", "30816000"),
    ("Peru", "PER", "3556500"),
];

pub async fn seed(app: &TestApp) {
    // Inserted lowest-first so ranking never depends on insertion order.
    for (name, code, average) in SEED_AVERAGES.iter().rev() {
        let resp = app.post_country(&country_payload(name, code, Some(average))).await;
        assert_eq!(resp.status().as_u16(), 201, "seeding {}", name);
    }
}
