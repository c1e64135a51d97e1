//! End-to-end tests against a real listener
//!
//! Binds the router on an ephemeral port and drives it over HTTP with reqwest,
//! together with a running sweep task.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use response_cache::{
    api::create_router,
    cache::{CacheStore, MockClock},
    AppState, SweepTask,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_profile_cache_over_http() {
    let addr = spawn_server(AppState::new(CacheStore::new())).await;
    let client = reqwest::Client::new();
    let profile_url = format!("http://{}/api/user/profile", addr);

    let created = client
        .put(&profile_url)
        .header("x-user-id", "42")
        .json(&json!({"nickname": "Amina"}))
        .send()
        .await
        .unwrap();
    assert!(created.status().is_success());

    let miss = client
        .get(&profile_url)
        .header("x-user-id", "42")
        .send()
        .await
        .unwrap();
    assert_eq!(miss.headers()["x-cache"], "MISS");
    let miss_body: Value = miss.json().await.unwrap();

    let hit = client
        .get(&profile_url)
        .header("x-user-id", "42")
        .send()
        .await
        .unwrap();
    assert_eq!(hit.headers()["x-cache"], "HIT");
    let hit_body: Value = hit.json().await.unwrap();

    assert_eq!(miss_body, hit_body);
    assert_eq!(hit_body["user"]["nickname"], "Amina");
}

#[tokio::test]
async fn test_background_sweep_reclaims_expired_entries() {
    let clock = MockClock::starting_at(0);
    let state = AppState::new(CacheStore::with_clock(Arc::new(clock.clone())));
    let sweeper = SweepTask::start(state.cache.clone(), Duration::from_millis(25));
    let addr = spawn_server(state).await;
    let client = reqwest::Client::new();

    client
        .put(format!("http://{}/api/user/profile", addr))
        .header("x-user-id", "1")
        .json(&json!({"nickname": "One"}))
        .send()
        .await
        .unwrap();
    client
        .get(format!("http://{}/api/rewards", addr))
        .header("x-user-id", "1")
        .send()
        .await
        .unwrap();

    clock.advance(Duration::from_secs(6 * 60));
    tokio::time::sleep(Duration::from_millis(150)).await;

    let stats: Value = client
        .get(format!("http://{}/api/cache/stats", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["swept"], 1);

    sweeper.stop().await;
}
