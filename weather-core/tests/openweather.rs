//! OpenWeather client tests against a wiremock server.

use std::time::Duration;

use weather_core::{
    ClientConfig, LookupMode, OpenWeatherProvider, Query, WeatherError, WeatherProvider,
    fetch_weather,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenWeatherProvider {
    let config = ClientConfig {
        timeout: Duration::from_secs(5),
        ..ClientConfig::new(server.uri(), "TEST_KEY")
    };
    OpenWeatherProvider::new(config).unwrap()
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Paris",
        "dt": 1717250400,
        "sys": { "country": "FR" },
        "main": { "temp": 19.4, "feels_like": 18.9, "humidity": 64 },
        "wind": { "speed": 3.6 },
        "visibility": 9000,
        "weather": [{ "id": 801, "description": "few clouds", "icon": "02d" }]
    })
}

fn forecast_body() -> serde_json::Value {
    let slot = |dt_txt: &str, temp: f64| {
        serde_json::json!({
            "dt_txt": dt_txt,
            "main": { "temp": temp, "humidity": 70 },
            "wind": { "speed": 2.2 },
            "weather": [{ "id": 500, "description": "light rain", "icon": "10n" }]
        })
    };

    serde_json::json!({
        "list": [
            slot("2024-06-01 18:00:00", 17.0),
            slot("2024-06-01 21:00:00", 14.5),
            slot("2024-06-02 00:00:00", 12.0),
            slot("2024-06-02 03:00:00", 11.0),
            slot("2024-06-02 06:00:00", 13.5),
        ]
    })
}

#[tokio::test]
async fn geocode_sends_key_units_and_city() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Paris", "lat": 48.85, "lon": 2.35, "country": "FR" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let hits = provider(&server).geocode("Paris").await.unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].lat, 48.85);
    assert_eq!(hits[0].country.as_deref(), Some("FR"));
}

#[tokio::test]
async fn current_by_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;

    let current = provider(&server)
        .current(&Query::Coords {
            lat: 48.85,
            lon: 2.35,
        })
        .await
        .unwrap();

    assert_eq!(current.display_name(), "Paris, FR");
    assert_eq!(current.visibility_m, Some(9000));
    assert_eq!(current.condition.description, "few clouds");
}

#[tokio::test]
async fn error_status_is_reported_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .forecast(&Query::City("Paris".into()))
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("401"), "Error should mention 401 status: {msg}");
    assert!(msg.contains("Invalid API key"));
}

#[tokio::test]
async fn full_cycle_with_geocoding() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Paris", "lat": 48.85, "lon": 2.35, "country": "FR" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "48.85"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "48.85"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let report = fetch_weather(&provider(&server), LookupMode::Geocode, "Paris")
        .await
        .unwrap();

    assert_eq!(report.current.location_name, "Paris");
    assert_eq!(report.forecast.len(), 2);
    assert_eq!(report.forecast[0].min_c(), 14.5);
    assert_eq!(report.forecast[0].max_c(), 17.0);
    assert_eq!(report.forecast[1].entries().len(), 3);
    assert_eq!(report.forecast[1].min_c(), 11.0);
}

#[tokio::test]
async fn direct_cycle_queries_by_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let report = fetch_weather(&provider(&server), LookupMode::Direct, "Paris")
        .await
        .unwrap();
    assert_eq!(report.forecast.len(), 2);
}

#[tokio::test]
async fn malformed_forecast_collapses_to_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = fetch_weather(&provider(&server), LookupMode::Direct, "Paris")
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::Fetch(_)));
}

#[tokio::test]
async fn current_without_readings_collapses_to_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "X",
            "main": { "temp": 1.0 },
            "weather": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let err = fetch_weather(&provider(&server), LookupMode::Direct, "X")
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::Fetch(_)));
    assert_eq!(
        err.user_message(),
        "Failed to fetch weather data. Try again later."
    );
}
