//! Device service client against a mock server.

use chrono::NaiveDate;
use common::{
    req::{Device, DeviceType, MeasureQuery, MetricValue, Order, Sensor},
    ApiClient, ApiError,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri())
        .unwrap()
        .with_token(Some("t0ken".into()))
}

fn sensor() -> Sensor {
    Sensor {
        id: "s1".into(),
        device: "zb:01".into(),
        sensor_type: "zigbee_temp".into(),
        name: None,
        comments: None,
        last_record: None,
        metrics: vec![],
    }
}

#[tokio::test]
async fn lists_devices_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a1", "name": "Alpha", "device_type": "air_quality", "last_record": "2024-01-01T08:00:00Z"},
            {"id": "zb:01", "name": "Door", "type": "zigbee", "latitude": -37.9, "longitude": 145.1}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client(&server).devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[1].device_type, DeviceType::Zigbee);
    assert_eq!(devices[1].latitude, Some(-37.9));
}

#[tokio::test]
async fn requests_fail_fast_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let anonymous = ApiClient::new(&server.uri()).unwrap();

    assert!(matches!(anonymous.devices().await, Err(ApiError::Unauthenticated)));
}

#[tokio::test]
async fn maps_status_codes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/devices/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/devices/a1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client(&server);

    assert!(matches!(client.devices().await, Err(ApiError::Unauthorized)));
    assert!(matches!(client.device("missing").await, Err(ApiError::NotFound(_))));
    match client.remove_device("a1").await {
        Err(ApiError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(matches!(client(&server).devices().await, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn fetches_device_with_sensors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/devices/zb:01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "zb:01",
            "name": "Door",
            "device_type": "zigbee",
            "sensors": [{
                "id": "s1",
                "device": "zb:01",
                "type": "zigbee_contact",
                "last_record": "2024-02-01T10:00:00Z",
                "metrics": [{"name": "contact", "display_name": "Contact", "is_bool": true}]
            }]
        })))
        .mount(&server)
        .await;

    let device = client(&server).device("zb:01").await.unwrap();

    assert_eq!(device.device.name, "Door");
    assert_eq!(device.sensors.len(), 1);
    assert!(device.sensors[0].metrics[0].is_boolean);
}

#[tokio::test]
async fn adds_and_updates_devices_as_json() {
    let server = MockServer::start().await;
    let device = Device {
        id: "aq:02".into(),
        name: "Office".into(),
        device_type: DeviceType::AirQuality,
        latitude: Some(1.5),
        longitude: None,
        room: None,
        last_record: None,
        sensor_types: None,
    };
    let expected = json!({"id": "aq:02", "name": "Office", "device_type": "air_quality", "latitude": 1.5});

    Mock::given(method("POST"))
        .and(path("/devices"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/devices/aq:02"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.add_device(&device).await.unwrap();
    client.update_device(&device).await.unwrap();
}

#[tokio::test]
async fn ids_with_spaces_and_plus_reach_the_right_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/devices/lab%201+b"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).remove_device("lab 1+b").await.unwrap();
}

#[tokio::test]
async fn measures_query_uses_camel_case_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/measures"))
        .and(query_param("deviceId", "zb:01"))
        .and(query_param("sensorId", "s1"))
        .and(query_param("sensorType", "zigbee_temp"))
        .and(query_param("name", "temperature"))
        .and(query_param("date", "2024-02-01"))
        .and(query_param("processed", "true"))
        .and(query_param("order", "desc"))
        .and(query_param("count", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"time": "2024-02-01T10:05:00Z", "value": 21.5},
            {"time": "2024-02-01T10:00:00Z", "value": 21.0}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = MeasureQuery::new(
        &sensor(),
        "temperature",
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    );
    query.order = Order::Desc;
    query.count = Some(15);

    let measures = client(&server).measures(&query).await.unwrap();

    assert_eq!(measures.len(), 2);
    assert_eq!(measures[0].value, MetricValue::Number(21.5));
}

#[tokio::test]
async fn metrics_query_uses_metric_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metrics"))
        .and(query_param("metric", "contact"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"time": "2024-02-01T10:00:00", "value": false}
        ])))
        .mount(&server)
        .await;

    let mut query = MeasureQuery::new(&sensor(), "contact", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    query.count = Some(10);

    let metrics = client(&server).metrics(&(&query).into()).await.unwrap();

    assert_eq!(metrics[0].value, MetricValue::Bool(false));
}
