mod helpers;

use std::sync::Arc;

use helpers::{sample_profile, service, MockGenerator, MockScraper, LIN_REPLY};
use relationship_spark::server;
use serde_json::{json, Value};

/// Serve the router on an ephemeral port and return its base URL.
async fn spawn_api(generator: MockGenerator, scraper: MockScraper) -> String {
    let app = server::router(service(Arc::new(generator), Arc::new(scraper)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

#[tokio::test]
async fn spark_then_list_and_get() {
    let base = spawn_api(
        MockGenerator::with_replies(&[LIN_REPLY]),
        MockScraper::unused(),
    )
    .await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/spark"))
        .json(&json!({
            "scene": "stay_in_touch",
            "context": "Lin is my lab mate.",
            "name": "Lin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let record: Value = resp.json().await.unwrap();
    assert_eq!(record["id"], 1);
    assert_eq!(record["name"], "Lin");

    let people: Value = client
        .get(format!("{base}/people"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(people.as_array().unwrap().len(), 1);

    let resp = client.get(format!("{base}/people/1")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn unknown_person_is_404_with_error_code() {
    let base = spawn_api(MockGenerator::with_replies(&[]), MockScraper::unused()).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/people/77")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "RECORD_NOT_FOUND");

    let resp = client
        .post(format!("{base}/spark"))
        .json(&json!({"scene": "s", "context": "c", "person_id": 77}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn collaborator_failure_is_bad_gateway() {
    let base = spawn_api(MockGenerator::with_replies(&[]), MockScraper::unused()).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/spark"))
        .json(&json!({"scene": "s", "context": "c"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
}

#[tokio::test]
async fn enrich_search_and_photos() {
    let base = spawn_api(
        MockGenerator::with_replies(&[]),
        MockScraper::succeeding(sample_profile()),
    )
    .await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/enrich_linkedin"))
        .json(&json!({"linkedin_url": "https://www.linkedin.com/in/lin-wei"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let hits: Value = client
        .get(format!("{base}/search?q=spotify"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let none: Value = client
        .get(format!("{base}/search?q="))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(none.as_array().unwrap().is_empty());

    let record: Value = client
        .post(format!("{base}/people/1/photos"))
        .json(&json!({"url": "https://img.example/lin.jpg"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["photos"], json!(["https://img.example/lin.jpg"]));

    let resp = client
        .post(format!("{base}/people/1/photos"))
        .json(&json!({"url": " "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn malformed_requests_are_400_with_json_error() {
    let base = spawn_api(MockGenerator::with_replies(&[]), MockScraper::unused()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/spark"))
        .json(&json!({"scene": "s"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("context"));

    let resp = client
        .post(format!("{base}/enrich_linkedin"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "BAD_REQUEST");

    let resp = client.get(format!("{base}/people/abc")).send().await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "BAD_REQUEST");
}
