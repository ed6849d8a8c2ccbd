//! POST /api/countries and PATCH /api/countries/<name> against a live router.

mod common;

use common::{country_payload, spawn_app};
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};
use tourism_arrivals_api::TOURISM_ARRIVALS;

#[tokio::test]
async fn post_returns_created_record_in_schema_order() {
    let app = spawn_app().await;
    let payload = country_payload("United States", "USA", Some("158278026.6"));

    let resp = app.post_country(&payload).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = resp.json().await.unwrap();

    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    let expected: Vec<&str> = TOURISM_ARRIVALS.column_names().collect();
    assert_eq!(keys, expected);
    assert_eq!(body, payload);
}

#[tokio::test]
async fn inserted_record_round_trips_through_get() {
    let app = spawn_app().await;
    let mut payload = country_payload("United States", "USA", Some("158278026.6"));
    payload["year_2003"] = json!(41_218_000);

    assert_eq!(app.post_country(&payload).await.status().as_u16(), 201);

    let (status, body) = app.get_json("/api/countries/country/United States").await;
    assert_eq!(status, 200);
    for column in TOURISM_ARRIVALS.column_names() {
        assert_eq!(body[column], payload[column], "column {}", column);
    }
    let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 35);
    assert_eq!(keys[0], "Country_Name");
    assert_eq!(keys[34], "Percent_drop_2019_to_2020");
}

#[tokio::test]
async fn post_names_every_missing_key() {
    let app = spawn_app().await;
    let mut payload = country_payload("Peru", "PER", None);
    let obj = payload.as_object_mut().unwrap();
    obj.remove("Region");
    obj.remove("year_2003");

    let resp = app.post_country(&payload).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Missing required keys: Region, year_2003");

    let (_, all) = app.get_json("/api/countries").await;
    assert_eq!(all.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn post_rejects_string_in_integer_column() {
    let app = spawn_app().await;
    let mut payload = country_payload("Peru", "PER", None);
    payload["year_1995"] = json!("abc");

    let resp = app.post_country(&payload).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(
        body["error"],
        "The value entered for year_1995 should be of type: int"
    );
}

#[tokio::test]
async fn post_rejects_null_identity_but_allows_null_year() {
    let app = spawn_app().await;

    let mut payload = country_payload("Peru", "PER", None);
    payload["IncomeGroup"] = Value::Null;
    let resp = app.post_country(&payload).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "The value entered for IncomeGroup cannot be empty or null"
    );

    let mut payload = country_payload("Peru", "PER", None);
    payload["year_2003"] = Value::Null;
    assert_eq!(app.post_country(&payload).await.status().as_u16(), 201);
}

#[tokio::test]
async fn post_duplicate_key_conflicts() {
    let app = spawn_app().await;
    let payload = country_payload("France", "FRA", Some("196572800"));
    assert_eq!(app.post_country(&payload).await.status().as_u16(), 201);

    let resp = app.post_country(&payload).await;
    assert_eq!(resp.status().as_u16(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status": 409,
            "error": "Database Integrity Error",
            "message": "Country name already exists in the database!"
        })
    );
}

#[tokio::test]
async fn post_unknown_column_is_rejected() {
    let app = spawn_app().await;
    let mut payload = country_payload("Peru", "PER", None);
    payload["Capital"] = json!("Lima");

    let resp = app.post_country(&payload).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 404);
    assert_eq!(
        body["error"],
        "Invalid key entry: That column name does not exist."
    );
}

#[tokio::test]
async fn post_malformed_body_is_bad_request() {
    let app = spawn_app().await;
    let resp = app
        .client
        .post(app.url("/api/countries"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"Country_Name": India}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("without being wrapped in quotes"));

    // Valid JSON that is not an object is malformed too.
    let resp = app.post_country(&json!(["India"])).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn patch_updates_only_given_fields() {
    let app = spawn_app().await;
    app.post_country(&country_payload("India", "IND", Some("12000000")))
        .await;

    let resp = app
        .patch_country("India", &json!({"year_1995": 1000, "year_1996": 1500}))
        .await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["year_1995"], 1000);
    assert_eq!(body["year_1996"], 1500);
    assert_eq!(body["Country_Code"], "IND");
    assert_eq!(body.as_object().unwrap().len(), 35);

    let (_, stored) = app.get_json("/api/countries/country/India").await;
    assert_eq!(stored, body);
}

#[tokio::test]
async fn patch_does_not_recompute_summary_columns() {
    let app = spawn_app().await;
    app.post_country(&country_payload("India", "IND", Some("12000000")))
        .await;

    let resp = app
        .patch_country("India", &json!({"year_2019": 99_000_000}))
        .await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["Max_number_of_arrivals"], 2_500_000);
    assert_eq!(body["Average_10year_in_tourist_arrivals"], "12000000");
}

#[tokio::test]
async fn patch_unknown_country_is_not_found() {
    let app = spawn_app().await;
    let resp = app
        .patch_country("NonexistentCountry", &json!({"Region": "TestRegion"}))
        .await;
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Not found");
    assert_eq!(
        body["message"],
        "Invalid resource URI - That country does not exist"
    );
}

#[tokio::test]
async fn patch_with_stored_value_is_rejected() {
    let app = spawn_app().await;
    app.post_country(&country_payload("India", "IND", None)).await;

    let resp = app.patch_country("India", &json!({"year_1995": 1_000_000})).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 400);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("year_1995"));
    assert!(error.contains("1000000"));
}

#[tokio::test]
async fn patch_with_unknown_key_is_rejected() {
    let app = spawn_app().await;
    app.post_country(&country_payload("India", "IND", None)).await;

    let resp = app.patch_country("India", &json!({"Capital": "New Delhi"})).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 404);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid key entry"));
}

#[tokio::test]
async fn patch_type_and_empty_errors() {
    let app = spawn_app().await;
    app.post_country(&country_payload("India", "IND", None)).await;

    let resp = app
        .patch_country("India", &json!({"year_1995": "Example invalid string which should be integer"}))
        .await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "The value entered for year_1995 should be of type: int"
    );

    let resp = app.patch_country("India", &json!({"Region": ""})).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "The value entered for Region cannot be empty or null"
    );
}

#[tokio::test]
async fn failed_patch_leaves_record_untouched() {
    let app = spawn_app().await;
    app.post_country(&country_payload("India", "IND", None)).await;
    let (_, before) = app.get_json("/api/countries/country/India").await;

    // The second field fails after the first one was accepted.
    let resp = app
        .patch_country("India", &json!({"year_1996": 5, "year_2019": 2_500_000}))
        .await;
    assert_eq!(resp.status().as_u16(), 400);

    let (_, after) = app.get_json("/api/countries/country/India").await;
    assert_eq!(before, after);
    assert!(after["year_1996"].is_null());
}

#[tokio::test]
async fn patch_cannot_rename_country() {
    let app = spawn_app().await;
    app.post_country(&country_payload("India", "IND", None)).await;

    let resp = app.patch_country("India", &json!({"Country_Name": "Bharat"})).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "The value entered for Country_Name cannot be changed"
    );
    assert_eq!(app.get("/api/countries/country/India").await.status().as_u16(), 200);
    assert_eq!(app.get("/api/countries/country/Bharat").await.status().as_u16(), 404);
}

#[tokio::test]
async fn empty_patch_returns_stored_record() {
    let app = spawn_app().await;
    let payload = country_payload("India", "IND", None);
    app.post_country(&payload).await;

    let resp = app.patch_country("India", &json!({})).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, payload);
}

#[tokio::test]
async fn patch_unknown_country_is_not_found_before_body_is_read() {
    let app = spawn_app().await;
    let resp = app
        .client
        .patch(app.url("/api/countries/Atlantis"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"Region": Europe}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Invalid resource URI - That country does not exist"
    );
}

#[tokio::test]
async fn patch_malformed_body_on_existing_country_is_bad_request() {
    let app = spawn_app().await;
    app.post_country(&country_payload("India", "IND", None)).await;
    let (_, before) = app.get_json("/api/countries/country/India").await;

    let resp = app
        .client
        .patch(app.url("/api/countries/India"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"Region": Europe}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Bad Request");

    let (_, after) = app.get_json("/api/countries/country/India").await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn post_oversized_integer_is_rejected() {
    let app = spawn_app().await;
    let mut payload = country_payload("Peru", "PER", None);
    payload["year_1995"] = json!(u64::MAX);

    let resp = app.post_country(&payload).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "The value entered for year_1995 is outside the 64-bit integer range"
    );
}
