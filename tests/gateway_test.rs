//! End-to-end tests against a real server bound to a loopback port.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::time;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use philosophy_gateway::app_state::AppState;
use philosophy_gateway::config::GatewayConfig;
use philosophy_gateway::domain::{ConvictionCounter, PhilosophicalSchool};
use philosophy_gateway::persistence::Store;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

/// Starts the gateway on an ephemeral port and returns its address.
async fn start_server(config: GatewayConfig) -> SocketAddr {
    let Ok(state) = AppState::build(&config, Store::in_memory(), ConvictionCounter::new()) else {
        panic!("state");
    };
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    let app = philosophy_gateway::app(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing listens on.
async fn dead_addr() -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    drop(listener);
    addr
}

async fn get_json(url: String) -> (u16, Value) {
    let Ok(resp) = reqwest::get(url).await else {
        panic!("request failed");
    };
    let status = resp.status().as_u16();
    let Ok(body) = resp.json::<Value>().await else {
        panic!("invalid json");
    };
    (status, body)
}

async fn post_json(url: String, body: &Value) -> (u16, Value) {
    let Ok(resp) = reqwest::Client::new().post(url).json(body).send().await else {
        panic!("request failed");
    };
    let status = resp.status().as_u16();
    let Ok(body) = resp.json::<Value>().await else {
        panic!("invalid json");
    };
    (status, body)
}

/// Waits until the server reports `expected` live WebSocket connections.
async fn wait_for_connections(addr: SocketAddr, expected: u64) {
    let polled = time::timeout(WAIT, async {
        loop {
            let (_, health) = get_json(format!("http://{addr}/health")).await;
            if health["connections"].as_u64() == Some(expected) {
                break;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(polled.is_ok(), "server never reached {expected} connections");
}

async fn connect(addr: SocketAddr) -> Client {
    let Ok((ws, _)) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect");
    };
    ws
}

async fn send(ws: &mut Client, value: &Value) {
    let Ok(()) = ws.send(Message::Text(value.to_string().into())).await else {
        panic!("ws send");
    };
}

/// Next text frame as JSON.
async fn next_event(ws: &mut Client) -> Value {
    loop {
        let Ok(Some(Ok(message))) = time::timeout(WAIT, ws.next()).await else {
            panic!("no frame received");
        };
        if let Message::Text(text) = message {
            let Ok(value) = serde_json::from_str(text.as_str()) else {
                panic!("frame is not json: {text}");
            };
            return value;
        }
    }
}

async fn assert_silent(ws: &mut Client) {
    let next = time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(next.is_err(), "unexpected frame: {next:?}");
}

#[tokio::test]
async fn health_reports_services_and_connections() {
    let addr = start_server(GatewayConfig::default()).await;
    let (status, body) = get_json(format!("http://{addr}/health")).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["ai_service"], "http://127.0.0.1:3001");
    assert_eq!(body["connections"], 0);
}

#[tokio::test]
async fn http_increment_reaches_every_websocket_client() {
    let addr = start_server(GatewayConfig::default()).await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    wait_for_connections(addr, 2).await;

    let (status, body) = post_json(format!("http://{addr}/api/v1/conviction"), &json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 1);
    assert_eq!(body["light_effect"], false);

    for ws in [&mut a, &mut b] {
        let event = next_event(ws).await;
        assert_eq!(event["type"], "conviction_update");
        assert_eq!(event["count"], 1);
        assert_eq!(event["light_effect"], false);
        assert!(event["timestamp"].is_string());
    }
}

#[tokio::test]
async fn light_effect_turns_on_past_five() {
    let addr = start_server(GatewayConfig::default()).await;
    let url = format!("http://{addr}/api/v1/conviction");

    let mut last = Value::Null;
    for _ in 0..6 {
        last = post_json(url.clone(), &json!({})).await.1;
    }
    assert_eq!(last["count"], 6);
    assert_eq!(last["light_effect"], true);

    let (_, meter) = get_json(url).await;
    assert_eq!(meter["id"], 1);
    assert_eq!(meter["count"], 6);
    assert!(meter["last_hit"].is_string());
}

#[tokio::test]
async fn websocket_click_increments_and_broadcasts_to_all() {
    let addr = start_server(GatewayConfig::default()).await;
    let mut sender = connect(addr).await;
    let mut watcher = connect(addr).await;
    wait_for_connections(addr, 2).await;

    send(&mut sender, &json!({ "type": "conviction_click" })).await;

    for ws in [&mut sender, &mut watcher] {
        let event = next_event(ws).await;
        assert_eq!(event["type"], "conviction_update");
        assert_eq!(event["count"], 1);
    }

    let (_, meter) = get_json(format!("http://{addr}/api/v1/conviction")).await;
    assert_eq!(meter["count"], 1);
}

#[tokio::test]
async fn visitor_join_is_relayed_to_everyone() {
    let addr = start_server(GatewayConfig::default()).await;
    let mut sender = connect(addr).await;
    let mut watcher = connect(addr).await;
    wait_for_connections(addr, 2).await;

    send(&mut sender, &json!({ "type": "visitor_join", "name": "Socrates" })).await;

    for ws in [&mut sender, &mut watcher] {
        let event = next_event(ws).await;
        assert_eq!(event["type"], "visitor_update");
        assert_eq!(event["data"]["name"], "Socrates");
    }
}

#[tokio::test]
async fn unknown_message_is_echoed_only_to_its_sender() {
    let addr = start_server(GatewayConfig::default()).await;
    let mut sender = connect(addr).await;
    let mut watcher = connect(addr).await;
    wait_for_connections(addr, 2).await;

    send(&mut sender, &json!({ "type": "ping", "n": 7 })).await;

    let echo = next_event(&mut sender).await;
    assert_eq!(echo["type"], "echo");
    assert_eq!(echo["data"]["type"], "ping");
    assert_eq!(echo["data"]["n"], 7);
    assert_silent(&mut watcher).await;
}

#[tokio::test]
async fn closed_client_leaves_the_registry() {
    let addr = start_server(GatewayConfig::default()).await;
    let mut gone = connect(addr).await;
    let mut stays = connect(addr).await;
    wait_for_connections(addr, 2).await;

    let _ = gone.close(None).await;
    drop(gone);
    wait_for_connections(addr, 1).await;

    let (status, _) = post_json(format!("http://{addr}/api/v1/conviction"), &json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(next_event(&mut stays).await["count"], 1);
}

#[tokio::test]
async fn malformed_frame_closes_only_that_connection() {
    let addr = start_server(GatewayConfig::default()).await;
    let mut bad = connect(addr).await;
    let mut good = connect(addr).await;
    wait_for_connections(addr, 2).await;

    let Ok(()) = bad.send(Message::Text("not json".into())).await else {
        panic!("ws send");
    };
    wait_for_connections(addr, 1).await;

    send(&mut good, &json!({ "type": "conviction_click" })).await;
    assert_eq!(next_event(&mut good).await["type"], "conviction_update");
}

#[tokio::test]
async fn articles_are_created_and_listed() {
    let addr = start_server(GatewayConfig::default()).await;
    let url = format!("http://{addr}/api/v1/articles");

    let (status, created) = post_json(
        url.clone(),
        &json!({ "title": "On Doubt", "content": "I think, therefore I am." }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["title"], "On Doubt");
    let Some(id) = created["id"].as_i64() else {
        panic!("article id missing");
    };

    let (status, listed) = get_json(url.clone()).await;
    assert_eq!(status, 200);
    assert_eq!(listed["articles"].as_array().map(Vec::len), Some(1));

    let (status, fetched) = get_json(format!("{url}/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(fetched, created);

    let (status, missing) = get_json(format!("{url}/{}", id + 100)).await;
    assert_eq!(status, 404);
    assert_eq!(missing["error"]["code"], 2001);
}

#[tokio::test]
async fn blank_article_is_rejected() {
    let addr = start_server(GatewayConfig::default()).await;
    let (status, body) = post_json(
        format!("http://{addr}/api/v1/articles"),
        &json!({ "title": "  ", "content": "text" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], 1001);
}

#[tokio::test]
async fn simulation_returns_every_school_in_order() {
    let addr = start_server(GatewayConfig::default()).await;
    let (status, body) =
        get_json(format!("http://{addr}/api/v1/philosophy/simulate?type=ethics")).await;

    assert_eq!(status, 200);
    assert_eq!(body["philosophy_type"], "ethics");
    assert_eq!(body["tasks_used"], 5);
    let expected: Vec<Value> = PhilosophicalSchool::ALL
        .iter()
        .map(|school| Value::from(school.thought()))
        .collect();
    assert_eq!(body["parallel_thoughts"], Value::Array(expected));
}

#[tokio::test]
async fn unreachable_ai_service_maps_to_bad_gateway() {
    let dead = dead_addr().await;
    let config = GatewayConfig {
        ai_service_url: format!("http://{dead}"),
        sns_service_url: format!("http://{dead}"),
        ..GatewayConfig::default()
    };
    let addr = start_server(config).await;

    let (status, body) = get_json(format!("http://{addr}/api/v1/ai/personalities")).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"]["code"], 3002);

    let (status, _) = get_json(format!("http://{addr}/api/v1/sns/feed")).await;
    assert_eq!(status, 502);
}

#[tokio::test]
async fn ai_chat_is_proxied_to_the_upstream() {
    use axum::Json;
    use axum::routing::post;

    let Ok(upstream) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind");
    };
    let Ok(upstream_addr) = upstream.local_addr() else {
        panic!("local addr");
    };
    let fake = axum::Router::new().route(
        "/chat",
        post(|Json(body): Json<Value>| async move {
            Json(json!({ "character": body["character"], "reply": "Know thyself." }))
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(upstream, fake).await;
    });

    let config = GatewayConfig {
        ai_service_url: format!("http://{upstream_addr}"),
        ..GatewayConfig::default()
    };
    let addr = start_server(config).await;

    let (status, body) = post_json(
        format!("http://{addr}/api/v1/ai/chat"),
        &json!({ "character": "socrates", "message": "Who am I?" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["character"], "socrates");
    assert_eq!(body["reply"], "Know thyself.");
}
