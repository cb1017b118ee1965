//! Integration tests for the WeatherAPI provider, fetch cycle and cache using wiremock.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use pakweather_core::{
    City, Day, Fetcher, ManualClock, Metric, Omission, ResultCache, WeatherApiProvider,
    WeatherProvider, fetch_all, fetch_report, pivot, select,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "TEST_KEY";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 6).unwrap()
}

fn current_body(temp: f64, humidity: u8, text: &str) -> serde_json::Value {
    serde_json::json!({
        "location": { "name": "Somewhere", "country": "Pakistan" },
        "current": {
            "temp_c": temp,
            "humidity": humidity,
            "condition": { "text": text, "code": 1000 }
        }
    })
}

fn history_body(avg_temp: f64, avg_humidity: f64, text: &str) -> serde_json::Value {
    serde_json::json!({
        "location": { "name": "Somewhere", "country": "Pakistan" },
        "forecast": {
            "forecastday": [{
                "date": "2025-07-05",
                "day": {
                    "avgtemp_c": avg_temp,
                    "avghumidity": avg_humidity,
                    "condition": { "text": text }
                }
            }]
        }
    })
}

async fn mount_current(server: &MockServer, city: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("key", KEY))
        .and(query_param("q", city))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_history(server: &MockServer, city: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/history.json"))
        .and(query_param("key", KEY))
        .and(query_param("q", city))
        .and(query_param("dt", "2025-07-05"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn ok_json(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

fn provider(server: &MockServer) -> WeatherApiProvider {
    WeatherApiProvider::with_base_url(KEY.to_string(), server.uri())
}

#[tokio::test]
async fn test_current_success() {
    let server = MockServer::start().await;
    let body = current_body(33.5, 74, "Partly cloudy");
    mount_current(&server, "Karachi", ResponseTemplate::new(200).set_body_json(body)).await;

    let reading = provider(&server).current(City::Karachi).await.unwrap();

    assert_eq!(reading.temperature_celsius, 33.5);
    assert_eq!(reading.humidity_percent, 74.0);
    assert_eq!(reading.condition, "Partly cloudy");
}

#[tokio::test]
async fn test_current_non_200_is_provider_unavailable() {
    let server = MockServer::start().await;
    mount_current(
        &server,
        "Lahore",
        ResponseTemplate::new(403)
            .set_body_string(r#"{"error":{"code":2008,"message":"API key has been disabled."}}"#),
    )
    .await;

    let err = provider(&server).current(City::Lahore).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("API key has been disabled"));
}

#[tokio::test]
async fn test_history_missing_forecastday_is_malformed() {
    let server = MockServer::start().await;
    mount_history(
        &server,
        "Quetta",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "forecast": {} })),
    )
    .await;

    let date = NaiveDate::from_ymd_opt(2025, 7, 5).unwrap();
    let err = provider(&server).history(City::Quetta, date).await.unwrap_err();

    assert!(matches!(err, Omission::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_provider_unavailable() {
    // Nothing listens on port 1.
    let p = WeatherApiProvider::with_base_url(KEY.to_string(), "http://127.0.0.1:1");
    let err = p.current(City::Multan).await.unwrap_err();

    assert_eq!(err.status(), None);
    assert!(!err.is_malformed());
}

#[tokio::test]
async fn test_fetch_all_tolerates_per_city_failures() {
    let server = MockServer::start().await;

    mount_current(&server, "Karachi", ok_json(current_body(35.0, 70, "Sunny"))).await;
    mount_history(&server, "Karachi", ok_json(history_body(33.0, 66.0, "Sunny"))).await;

    // Lahore: current works, history is malformed.
    mount_current(&server, "Lahore", ok_json(current_body(30.0, 40, "Clear"))).await;
    mount_history(
        &server,
        "Lahore",
        ok_json(serde_json::json!({ "location": { "name": "Lahore" } })),
    )
    .await;

    // Peshawar: current fails, history works.
    mount_current(&server, "Peshawar", ResponseTemplate::new(500)).await;
    mount_history(&server, "Peshawar", ok_json(history_body(29.0, 35.0, "Mist"))).await;

    // Quetta: nothing mounted, wiremock answers 404.

    let p = provider(&server);
    let cities = [City::Karachi, City::Lahore, City::Peshawar, City::Quetta];
    let report = fetch_report(&p, &cities, today()).await;
    let table = report.table();
    let yesterday = NaiveDate::from_ymd_opt(2025, 7, 5).unwrap();

    assert_eq!(table.len(), 4);
    assert!(table.get(City::Karachi, today()).is_some());
    assert!(table.get(City::Karachi, yesterday).is_some());
    assert!(table.get(City::Lahore, today()).is_some());
    assert!(table.get(City::Lahore, yesterday).is_none());
    assert!(table.get(City::Peshawar, today()).is_none());
    assert_eq!(table.get(City::Peshawar, yesterday).unwrap().condition, "Mist");
    assert!(table.iter().all(|row| row.city != City::Quetta));

    let lahore = report.outcome_for(City::Lahore).unwrap();
    assert!(lahore.yesterday.as_ref().unwrap_err().is_malformed());
    let quetta = report.outcome_for(City::Quetta).unwrap();
    assert_eq!(quetta.today.as_ref().unwrap_err().status(), Some(404));

    // Dashboard views over the same data.
    let karachi = select(&table, City::Karachi, Day::Today, today());
    assert_eq!(karachi.observation().unwrap().temperature_celsius, 35.0);
    assert!(select(&table, City::Quetta, Day::Today, today()).is_empty());

    let temps = pivot(&table, Metric::Temperature);
    assert_eq!(temps.cities(), vec![City::Karachi, City::Lahore, City::Peshawar]);
    assert_eq!(temps.value(City::Peshawar, today()), None);
    assert_eq!(temps.value(City::Lahore, yesterday), None);
}

#[tokio::test]
async fn test_fetch_all_everything_down_gives_empty_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let table = fetch_all(&provider(&server), City::all(), today()).await;

    assert!(table.is_empty());
}

#[tokio::test]
async fn test_cache_hits_provider_once_per_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ok_json(current_body(31.0, 50, "Sunny")))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/history.json"))
        .respond_with(ok_json(history_body(30.0, 55.0, "Sunny")))
        .expect(2)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 7, 6, 9, 0, 0).unwrap()));
    let fetcher = Fetcher::new(Arc::new(provider(&server)), vec![City::Sialkot], clock.clone());
    let cache = ResultCache::new(fetcher, clock.clone());

    let first = cache.get_or_fetch().await;
    clock.advance(chrono::Duration::minutes(30));
    let second = cache.get_or_fetch().await;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    clock.advance(chrono::Duration::minutes(31));
    let third = cache.get_or_fetch().await;
    assert_eq!(third.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
    // `.expect(2)` on each mock is verified when `server` drops.
}
