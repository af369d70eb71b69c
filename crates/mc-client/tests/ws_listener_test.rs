//! WebSocket listener tests against a real axum `/ws` endpoint, including the
//! fixed-delay reconnect behaviour.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::routing::any;
use axum::Router;

use mc_api_types::{AgentStatus, WsEvent};
use mc_client::ws::{run_listener, WsOptions};

#[derive(Clone)]
struct WsHarness {
    connections: Arc<AtomicUsize>,
    /// Frames sent verbatim on every accepted connection.
    frames: Arc<Vec<String>>,
}

async fn ws_route(ws: WebSocketUpgrade, State(h): State<WsHarness>) -> axum::response::Response {
    ws.on_upgrade(move |socket| feed(socket, h))
}

async fn feed(mut socket: WebSocket, h: WsHarness) {
    h.connections.fetch_add(1, Ordering::SeqCst);
    for frame in h.frames.iter() {
        if socket.send(Message::Text(frame.clone().into())).await.is_err() {
            return;
        }
    }
    // Dropping the socket closes the connection; the client is expected to
    // reconnect after its fixed delay.
}

async fn serve(h: WsHarness) -> SocketAddr {
    let app = Router::new().route("/ws", any(ws_route)).with_state(h);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn fast_opts() -> WsOptions {
    WsOptions {
        reconnect_delay: Duration::from_millis(100),
    }
}

#[tokio::test]
async fn test_listener_decodes_known_frames_and_skips_unknown() {
    let harness = WsHarness {
        connections: Arc::new(AtomicUsize::new(0)),
        frames: Arc::new(vec![
            r#"{"type":"agent_status","data":{"id":"dev","status":"WORKING"}}"#.to_string(),
            r#"{"type":"not_a_real_event","data":{}}"#.to_string(),
            r#"{"type":"task_updated","data":{"id":"t9"}}"#.to_string(),
        ]),
    };
    let addr = serve(harness).await;

    let (tx, rx) = flume::unbounded();
    let connected = Arc::new(AtomicBool::new(false));
    let listener = tokio::spawn(run_listener(
        format!("ws://{addr}/ws"),
        fast_opts(),
        tx,
        connected.clone(),
    ));

    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv_async())
        .await
        .expect("timed out waiting for first event")
        .unwrap();
    assert_eq!(
        first,
        WsEvent::AgentStatus {
            id: "dev".into(),
            status: AgentStatus::Working
        }
    );

    // The unknown frame must be dropped, so the very next event is the
    // task_updated one.
    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv_async())
        .await
        .expect("timed out waiting for second event")
        .unwrap();
    assert_eq!(second, WsEvent::TaskUpdated { id: "t9".into() });

    drop(rx);
    listener.abort();
}

#[tokio::test]
async fn test_listener_reconnects_after_close() {
    let connections = Arc::new(AtomicUsize::new(0));
    let harness = WsHarness {
        connections: connections.clone(),
        frames: Arc::new(vec![
            r#"{"type":"task_deleted","data":{"id":"gone"}}"#.to_string()
        ]),
    };
    let addr = serve(harness).await;

    let (tx, rx) = flume::unbounded();
    let connected = Arc::new(AtomicBool::new(false));
    let listener = tokio::spawn(run_listener(
        format!("ws://{addr}/ws"),
        fast_opts(),
        tx,
        connected.clone(),
    ));

    // Each accepted connection delivers the frame once and then closes, so
    // receiving it twice proves a reconnect happened.
    for _ in 0..2 {
        let ev = tokio::time::timeout(Duration::from_secs(5), rx.recv_async())
            .await
            .expect("timed out waiting for event")
            .unwrap();
        assert_eq!(ev, WsEvent::TaskDeleted { id: "gone".into() });
    }
    assert!(connections.load(Ordering::SeqCst) >= 2);

    drop(rx);
    listener.abort();
}

#[tokio::test]
async fn test_listener_exits_when_receivers_drop() {
    let harness = WsHarness {
        connections: Arc::new(AtomicUsize::new(0)),
        frames: Arc::new(vec![
            r#"{"type":"task_updated","data":{"id":"t1"}}"#.to_string()
        ]),
    };
    let addr = serve(harness).await;

    let (tx, rx) = flume::unbounded();
    let connected = Arc::new(AtomicBool::new(false));
    let listener = tokio::spawn(run_listener(
        format!("ws://{addr}/ws"),
        fast_opts(),
        tx,
        connected.clone(),
    ));

    let _ = tokio::time::timeout(Duration::from_secs(5), rx.recv_async()).await;
    drop(rx);

    // With every receiver gone the loop must terminate on its own instead of
    // reconnecting forever.
    tokio::time::timeout(Duration::from_secs(5), listener)
        .await
        .expect("listener did not exit after receivers dropped")
        .unwrap();
}
