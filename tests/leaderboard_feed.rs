//! Leaderboard feed over real TCP connections

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::time::timeout;

use quiz_rs::broadcast::BroadcastRegistry;
use quiz_rs::quiz::Question;
use quiz_rs::registry::SessionStore;
use quiz_rs::server::{FeedConfig, LeaderboardFeed, QuizService};

const WAIT: Duration = Duration::from_secs(5);

async fn start_feed(config: FeedConfig) -> (QuizService, std::net::SocketAddr) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let broadcaster = Arc::new(BroadcastRegistry::new());
    let service = QuizService::new(Arc::new(SessionStore::new()), Arc::clone(&broadcaster));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let feed = LeaderboardFeed::new(config.bind(addr), broadcaster);
    tokio::spawn(async move { feed.serve(listener).await });

    (service, addr)
}

async fn wait_for_sinks(service: &QuizService, expected: usize) {
    timeout(WAIT, async {
        while service.broadcaster().sink_count().await != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("sink count never reached expected value");
}

#[tokio::test]
async fn test_spectator_receives_leaderboard_lines() {
    let (service, addr) = start_feed(FeedConfig::default()).await;
    service
        .create_session(
            "quiz-01",
            vec![Question::new("Q1", "Capital of France?", ["Paris", "Rome"], "Paris")],
        )
        .await
        .unwrap();
    service.register("quiz-01", "alice").await.unwrap();

    let client = TcpStream::connect(addr).await.unwrap();
    let mut lines = BufReader::new(client).lines();
    wait_for_sinks(&service, 1).await;

    service
        .submit_answers("quiz-01", "alice", [("Q1", "Paris")])
        .await
        .unwrap();

    let line = timeout(WAIT, lines.next_line())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let event: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(
        event,
        serde_json::json!({
            "type": "scoreLeaderboard",
            "session": "quiz-01",
            "seq": 1,
            "data": [{"id": "alice", "score": 1}]
        })
    );
}

#[tokio::test]
async fn test_disconnect_unregisters_sink() {
    let (service, addr) = start_feed(FeedConfig::default()).await;

    let first = TcpStream::connect(addr).await.unwrap();
    let _second = TcpStream::connect(addr).await.unwrap();
    wait_for_sinks(&service, 2).await;

    drop(first);
    wait_for_sinks(&service, 1).await;
}

#[tokio::test]
async fn test_connection_limit() {
    let (service, addr) = start_feed(FeedConfig::default().max_connections(1)).await;

    let _first = TcpStream::connect(addr).await.unwrap();
    wait_for_sinks(&service, 1).await;

    // Rejected connections are closed straight away
    let mut rejected = TcpStream::connect(addr).await.unwrap();
    let mut buf = [0u8; 16];
    let read = timeout(WAIT, rejected.read(&mut buf)).await.unwrap();
    assert!(matches!(read, Ok(0) | Err(_)));

    assert_eq!(service.broadcaster().sink_count().await, 1);
}

#[tokio::test]
async fn test_run_until_returns_on_shutdown() {
    let broadcaster = Arc::new(BroadcastRegistry::new());
    let feed = LeaderboardFeed::new(FeedConfig::with_addr("127.0.0.1:0".parse().unwrap()), broadcaster);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        feed.run_until(async {
            let _ = shutdown_rx.await;
        })
        .await
    });

    shutdown_tx.send(()).unwrap();
    let result = timeout(WAIT, handle).await.unwrap().unwrap();
    assert!(result.is_ok());
}
