//! OSRM directions client against a local stub server.
//!
//! The stub answers a single request with a canned body and hands the
//! request line back to the test.

mod fixtures;

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use fixtures::*;
use route_pins::directions::{
    DirectionsConfig, DirectionsError, OsrmDirections, RouteRequest, TravelMode,
};
use route_pins::session::{MapSession, SessionConfig};
use route_pins::surface::HeadlessSurface;
use route_pins::traits::RouteProvider;

/// Serves one response and returns (base_url, receiver of the request line).
fn stub_osrm(status: &'static str, body: String) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let base_url = format!("http://{}", listener.local_addr().expect("stub addr"));
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("read request line");
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).expect("read header");
            if header == "\r\n" || header.is_empty() {
                break;
            }
        }
        let _ = tx.send(request_line.trim_end().to_string());

        let mut stream = stream;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).expect("write response");
    });

    (base_url, rx)
}

fn client(base_url: String) -> OsrmDirections {
    OsrmDirections::new(DirectionsConfig {
        base_url,
        timeout_secs: 5,
    })
    .expect("build directions client")
}

fn ok_body() -> String {
    format!(
        r#"{{
            "code": "Ok",
            "routes": [{{
                "geometry": "{}",
                "distance": 41234.5,
                "duration": 2710.2,
                "legs": [{{
                    "steps": [
                        {{ "maneuver": {{ "location": [-5.181322, 33.985489] }} }},
                        {{ "maneuver": {{ "location": [-5.573040, 33.881071] }} }}
                    ]
                }}]
            }}],
            "waypoints": []
        }}"#,
        CANONICAL_ENCODED.replace('\\', "\\\\")
    )
}

#[test]
fn test_route_maps_response() {
    let (base_url, requests) = stub_osrm("200 OK", ok_body());
    let directions = client(base_url);

    let summary = directions.route(&RouteRequest::default()).expect("route");
    assert_eq!(summary.overview_polyline, CANONICAL_ENCODED);
    assert_eq!(summary.distance_m, 41234.5);
    assert_eq!(summary.duration_s, 2710.2);
    assert_points_close(
        &summary.step_locations,
        &[DEMO_ORIGIN, DEMO_DESTINATION],
        1e-6,
    );

    let request_line = requests.recv().expect("request line");
    assert!(
        request_line.starts_with(
            "GET /route/v1/car/-5.181322,33.985489;-5.573040,33.881071?overview=full"
        ),
        "unexpected request: {}",
        request_line
    );
}

#[test]
fn test_walking_uses_foot_profile() {
    let (base_url, requests) = stub_osrm("200 OK", ok_body());
    let request = RouteRequest {
        mode: TravelMode::Walking,
        ..RouteRequest::default()
    };
    client(base_url).route(&request).expect("route");

    let request_line = requests.recv().expect("request line");
    assert!(request_line.starts_with("GET /route/v1/foot/"), "{}", request_line);
}

#[test]
fn test_no_route_reported() {
    let body = r#"{"code":"NoRoute","message":"Impossible route between points"}"#.to_string();
    let (base_url, _requests) = stub_osrm("400 Bad Request", body);

    let err = client(base_url).route(&RouteRequest::default()).unwrap_err();
    match err {
        DirectionsError::NoRoute { code, message } => {
            assert_eq!(code, "NoRoute");
            assert_eq!(message, "Impossible route between points");
        }
        other => panic!("expected NoRoute, got {:?}", other),
    }
}

#[test]
fn test_server_error_without_json() {
    let (base_url, _requests) = stub_osrm("503 Service Unavailable", "busy".to_string());
    let err = client(base_url).route(&RouteRequest::default()).unwrap_err();
    assert!(matches!(err, DirectionsError::Status(503)), "{:?}", err);
}

#[test]
fn test_ok_without_routes() {
    let (base_url, _requests) = stub_osrm("200 OK", r#"{"code":"Ok","routes":[]}"#.to_string());
    let err = client(base_url).route(&RouteRequest::default()).unwrap_err();
    assert!(matches!(err, DirectionsError::NoRoute { .. }));
}

#[test]
fn test_session_end_to_end() {
    let (base_url, _requests) = stub_osrm("200 OK", ok_body());
    let directions = client(base_url);
    let mut session = MapSession::new(HeadlessSurface::new(), SessionConfig::default()).unwrap();

    let displayed = session
        .request_route(&directions, &RouteRequest::default())
        .expect("display route");
    assert_eq!(displayed.markers.len(), 2);
    assert_eq!(session.markers().surface().visible_count(), 2);
}
