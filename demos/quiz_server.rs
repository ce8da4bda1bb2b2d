//! Quiz server demo with a live leaderboard feed
//!
//! Run with: cargo run --example quiz_server [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example quiz_server                    # feed on 0.0.0.0:9091
//!   cargo run --example quiz_server 127.0.0.1:9191     # feed on 127.0.0.1:9191
//!
//! ## Watching the leaderboard
//!
//!   nc localhost 9091
//!
//! Every line is one JSON event:
//!   {"type":"scoreLeaderboard","data":[{"id":"alice","score":1},...]}
//!
//! The demo registers two participants on session "quiz-01" and has them
//! answer one question every few seconds so spectators see updates.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use quiz_rs::broadcast::BroadcastRegistry;
use quiz_rs::quiz::Question;
use quiz_rs::registry::SessionStore;
use quiz_rs::server::{FeedConfig, LeaderboardFeed, QuizService};

fn questions() -> Vec<Question> {
    vec![
        Question::new(
            "question-1",
            "What is the capital of France?",
            ["Paris", "London", "Berlin"],
            "Paris",
        ),
        Question::new(
            "question-2",
            "What is the largest planet in our solar system?",
            ["Earth", "Saturn", "Jupiter"],
            "Jupiter",
        ),
    ]
}

/// Replay a scripted round of answers so the feed has something to show
async fn simulate_players(service: QuizService) -> quiz_rs::Result<()> {
    let script = [
        ("alice", "question-1", "Paris"),
        ("bob", "question-1", "London"),
        ("alice", "question-2", "Earth"),
        ("bob", "question-2", "Jupiter"),
    ];

    let mut ticker = tokio::time::interval(Duration::from_secs(3));
    for (participant, question, answer) in script.iter().cycle() {
        ticker.tick().await;
        let outcomes = service
            .submit_answers("quiz-01", participant, [(*question, *answer)])
            .await?;
        tracing::info!(
            participant,
            question,
            answer,
            correct = outcomes[0].correct,
            score = outcomes[0].score,
            "Simulated answer"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr: SocketAddr = match std::env::args().nth(1) {
        Some(addr) => addr.parse()?,
        None => FeedConfig::default().bind_addr,
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quiz_rs=debug".parse()?)
                .add_directive("quiz_server=debug".parse()?),
        )
        .init();

    let store = Arc::new(SessionStore::new());
    let broadcaster = Arc::new(BroadcastRegistry::new());
    let service = QuizService::new(Arc::clone(&store), Arc::clone(&broadcaster));

    service.create_session("quiz-01", questions()).await?;
    service.register("quiz-01", "alice").await?;
    service.register("quiz-01", "bob").await?;

    println!("Leaderboard feed on {}", bind_addr);
    println!("Watch it with: nc {} {}", bind_addr.ip(), bind_addr.port());
    println!();

    let feed = LeaderboardFeed::new(FeedConfig::with_addr(bind_addr), broadcaster);

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        println!("\nShutting down...");
    };

    tokio::select! {
        result = feed.run_until(shutdown) => {
            if let Err(e) = result {
                eprintln!("Feed error: {}", e);
            }
        }
        result = simulate_players(service) => {
            if let Err(e) = result {
                eprintln!("Simulation error: {}", e);
            }
        }
    }

    Ok(())
}
