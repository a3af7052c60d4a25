//! End-to-end pipeline tests against mock HTTP servers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use weatherpane_core::{
    BackgroundDirective, BackgroundPolicy, NormalizeError, PipelineError, PresentationPipeline,
    TemperatureUnit,
    background::{BackgroundAssets, HttpAssetProbe, Palette},
    error::Stage,
    location::IpInfoLocator,
    provider::openweather::OpenWeatherSource,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUNRISE: i64 = 1_707_116_400; // 2024-02-05 07:00 UTC
const SUNSET: i64 = 1_707_152_400; // 2024-02-05 17:00 UTC

fn weather_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -9.13, "lat": 38.71 },
        "name": "Lisbon",
        "sys": { "country": "PT", "sunrise": SUNRISE, "sunset": SUNSET },
        "main": { "temp": 16.2, "humidity": 77 },
        "wind": { "speed": 5.1 },
        "weather": [
            { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
        ]
    })
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 5, 12, 0, 0).unwrap()
}

async fn mount_location(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ip": "203.0.113.9",
            "city": "Lisbon",
            "country": "PT"
        })))
        .mount(server)
        .await;
}

async fn mount_weather(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Lisbon,PT"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// Each mounted image must be requested exactly once per run, whatever the phase.
async fn mount_image(server: &MockServer, image_path: &str) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0xFF, 0xD8, 0xFF], "image/jpeg"))
        .expect(1)
        .mount(server)
        .await;
}

fn pipeline(server: &MockServer) -> PresentationPipeline {
    let http = Client::new();
    let base = server.uri();

    let policy = BackgroundPolicy::new(
        BackgroundAssets {
            day_image: format!("{base}/img/day.jpg"),
            night_image: format!("{base}/img/night.jpg"),
        },
        Palette::default(),
    )
    .with_probe_timeout(Duration::from_secs(2));

    PresentationPipeline::new(
        Arc::new(IpInfoLocator::new(format!("{base}/json"), http.clone())),
        Arc::new(OpenWeatherSource::new(
            "TEST_KEY".to_string(),
            format!("{base}/data/2.5/weather"),
            http.clone(),
        )),
        Arc::new(HttpAssetProbe::new(http)),
        policy,
    )
    .with_units(TemperatureUnit::Celsius, TemperatureUnit::Celsius)
}

#[tokio::test]
async fn renders_weather_and_day_background() {
    let server = MockServer::start().await;
    mount_location(&server).await;
    mount_weather(&server, weather_body()).await;
    mount_image(&server, "/img/day.jpg").await;
    mount_image(&server, "/img/night.jpg").await;

    let session = pipeline(&server).run(&noon()).await.expect("pipeline should succeed");

    let p = &session.presentation;
    assert_eq!(session.location.query(), "Lisbon,PT");
    assert_eq!(p.location_label, "Lisbon, PT");
    assert_eq!(p.temperature_label, "17°C");
    assert_eq!(p.description, "broken clouds");
    assert_eq!(p.icon_class, "wi wi-day-cloudy");
    assert_eq!(p.current_time_label, "12:00 PM");
    assert_eq!(p.sunrise_label, "7:00 AM");
    assert_eq!(p.sunset_label, "5:00 PM");
    assert_eq!(p.humidity_label, "77%");
    assert_eq!(p.wind_label, "5.1 m/s");

    let background = session.background.resolve().await;
    assert_eq!(
        background,
        BackgroundDirective::Image(format!("{}/img/day.jpg", server.uri()))
    );
}

#[tokio::test]
async fn missing_day_image_falls_back_to_afternoon_color() {
    let server = MockServer::start().await;
    mount_location(&server).await;
    mount_weather(&server, weather_body()).await;
    // Night image exists but it is daytime.
    mount_image(&server, "/img/night.jpg").await;

    let session = pipeline(&server).run(&noon()).await.unwrap();
    let background = session.background.resolve().await;

    assert_eq!(background, BackgroundDirective::Color("#87CEEB".to_string()));
}

#[tokio::test]
async fn non_image_asset_counts_as_missing() {
    let server = MockServer::start().await;
    mount_location(&server).await;
    mount_weather(&server, weather_body()).await;
    Mock::given(method("GET"))
        .and(path("/img/night.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not found</html>"))
        .mount(&server)
        .await;

    let evening = Utc.with_ymd_and_hms(2024, 2, 5, 19, 0, 0).unwrap();
    let session = pipeline(&server).run(&evening).await.unwrap();

    assert_eq!(
        session.background.resolve().await,
        BackgroundDirective::Color("#FF4500".to_string())
    );
}

#[tokio::test]
async fn location_failure_halts_before_weather_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = pipeline(&server).run(&noon()).await.unwrap_err();

    assert!(err.is_network());
    match err {
        PipelineError::HttpStatus { stage, status, body } => {
            assert_eq!(stage, Stage::Location);
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn location_without_city_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ip": "203.0.113.9",
            "country": "PT"
        })))
        .mount(&server)
        .await;

    let err = pipeline(&server).run(&noon()).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::MalformedResponse { stage: Stage::Location, .. }
    ));
    assert!(err.to_string().contains("city"));
}

#[tokio::test]
async fn weather_without_conditions_is_rejected() {
    let server = MockServer::start().await;
    mount_location(&server).await;

    let mut body = weather_body();
    body["weather"] = serde_json::json!([]);
    mount_weather(&server, body).await;

    let err = pipeline(&server).run(&noon()).await.unwrap_err();

    assert!(!err.is_network());
    assert!(matches!(
        err,
        PipelineError::Normalize(NormalizeError::EmptyConditions)
    ));
}

#[tokio::test]
async fn weather_error_status_is_reported_with_body() {
    let server = MockServer::start().await;
    mount_location(&server).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
        )
        .mount(&server)
        .await;

    let err = pipeline(&server).run(&noon()).await.unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("weather request failed with status 401"));
    assert!(msg.contains("Invalid API key"));
}
