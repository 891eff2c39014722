use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use shotlink::db::database::Database;
use shotlink::engine::FlightModel;
use shotlink::hub::{ShotHub, ShotSource};
use shotlink::server::{self, OpenApiOptions};
use shotlink::RESULT_KEY;

const SHOT: &str = r#"{"ball_speed_meters_per_second": 70.0, "vertical_launch_angle_degrees": 12.5, "horizontal_launch_angle_degrees": -2.0, "total_spin_rpm": 2800.0, "spin_axis_degrees": 15.0}"#;

fn hub() -> Arc<ShotHub> {
    Arc::new(ShotHub::new(
        Arc::new(FlightModel::default()),
        Database::new(":memory:").unwrap(),
        16,
    ))
}

async fn start_native(hub: Arc<ShotHub>) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::run_native(listener, hub));
    addr
}

async fn start_openapi(hub: Arc<ShotHub>, handshake: bool) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let options = OpenApiOptions {
        handshake,
        game_id: "test-range".to_string(),
    };
    tokio::spawn(server::run_openapi(listener, hub, options));
    addr
}

#[tokio::test]
async fn native_persistent_connection_answers_every_line() {
    let addr = start_native(hub()).await;
    let stream = TcpStream::connect(addr).await.unwrap();
    let (reader, mut writer) = stream.into_split();
    let mut replies = BufReader::new(reader).lines();

    writer.write_all(format!("{}\n", SHOT).as_bytes()).await.unwrap();
    let first: Value = serde_json::from_str(&replies.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(first[RESULT_KEY]["shot_name"], "Pull Fade");

    writer.write_all(b"this is not json\n").await.unwrap();
    let second: Value = serde_json::from_str(&replies.next_line().await.unwrap().unwrap()).unwrap();
    assert!(second["error"].as_str().unwrap().starts_with("Invalid JSON"));

    writer.write_all(format!("{}\n", SHOT).as_bytes()).await.unwrap();
    let third: Value = serde_json::from_str(&replies.next_line().await.unwrap().unwrap()).unwrap();
    assert!(third[RESULT_KEY]["carry_distance_meters"].as_f64().unwrap() > 100.0);
}

#[tokio::test]
async fn native_request_response_mode() {
    let hub = hub();
    let addr = start_native(hub.clone()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream.write_all(SHOT.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut reply = String::new();
    stream.read_to_string(&mut reply).await.unwrap();
    assert!(reply.ends_with('\n'));
    assert_eq!(reply.lines().count(), 1);

    let value: Value = serde_json::from_str(reply.trim()).unwrap();
    assert_eq!(value["spin_axis_degrees"], 15.0);
    assert_eq!(hub.latest().unwrap().source, ShotSource::Native);
}

#[tokio::test]
async fn native_calculation_errors_are_reported() {
    let addr = start_native(hub()).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"{\"vertical_launch_angle_degrees\": 10.0}\n")
        .await
        .unwrap();
    stream.shutdown().await.unwrap();

    let mut reply = String::new();
    stream.read_to_string(&mut reply).await.unwrap();
    let value: Value = serde_json::from_str(reply.trim()).unwrap();
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Calculation error: missing required field"));
}

#[tokio::test]
async fn openapi_sends_handshake_and_never_replies() {
    let hub = hub();
    let mut feed = hub.subscribe();
    let addr = start_openapi(hub.clone(), true).await;

    let stream = TcpStream::connect(addr).await.unwrap();
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    let handshake: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(handshake["Code"], 201);
    assert_eq!(handshake["GameId"], "test-range");

    writer
        .write_all(b"{\"DeviceID\":\"M1\",\"ShotDataOptions\":{\"IsHeartBeat\":true}}\n")
        .await
        .unwrap();
    writer
        .write_all(
            b"{\"DeviceID\":\"M1\",\"Units\":\"Yards\",\"ShotNumber\":7,\"BallData\":{\"Speed\":150.0,\"VLA\":14.0,\"HLA\":0.0,\"TotalSpin\":3000.0,\"SpinAxis\":0.0}}\n",
        )
        .await
        .unwrap();

    let summary = tokio::time::timeout(Duration::from_secs(5), feed.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.shot_name, "Straight");
    assert_eq!(summary.source, ShotSource::OpenApi);

    writer.shutdown().await.unwrap();
    assert_eq!(lines.next_line().await.unwrap(), None);
}

#[tokio::test]
async fn openapi_without_handshake_stays_silent() {
    let hub = hub();
    let addr = start_openapi(hub.clone(), false).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"{\"BallData\":{\"Speed\":150.0,\"VLA\":14.0}}")
        .await
        .unwrap();
    stream.shutdown().await.unwrap();

    let mut received = String::new();
    stream.read_to_string(&mut received).await.unwrap();
    assert!(received.is_empty());
    assert_eq!(hub.database().shot_count().unwrap(), 1);
}
