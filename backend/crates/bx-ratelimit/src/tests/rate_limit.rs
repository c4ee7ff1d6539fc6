use crate::{
    FixedWindowLimiter, MemoryRateLimitStore, RateLimitConfig, RateLimitError, RateLimitStore,
    RedisRateLimitStore,
};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

const HOUR: u64 = 3600;
// 2024-01-01T00:00:00Z, aligned to an hour
const T0: u64 = 1_704_067_200;

fn limiter(max_requests: u64) -> (Arc<MemoryRateLimitStore>, FixedWindowLimiter) {
    let store = Arc::new(MemoryRateLimitStore::new());
    let limiter = FixedWindowLimiter::new(
        store.clone(),
        RateLimitConfig {
            max_requests,
            window_secs: HOUR,
        },
    )
    .unwrap();
    (store, limiter)
}

#[tokio::test]
async fn given_first_request_when_check_then_count_one_and_reset_is_window_end() {
    let (_store, limiter) = limiter(3600);

    let decision = limiter.check_at("1.2.3.4", T0 + 10).await.unwrap();

    assert!(!decision.limited);
    assert_eq!(decision.count, 1);
    assert_eq!(decision.reset, T0 + HOUR);
    assert_eq!(decision.remaining(), 3599);
}

#[tokio::test]
async fn given_threshold_reached_when_next_request_then_limited() {
    let (_store, limiter) = limiter(3600);

    for _ in 0..3600 {
        let decision = limiter.check_at("1.2.3.4", T0).await.unwrap();
        assert!(!decision.limited);
    }

    let decision = limiter.check_at("1.2.3.4", T0 + 1).await.unwrap();
    assert!(decision.limited);
    assert_eq!(decision.count, 3601);
    assert_eq!(decision.remaining(), 0);
}

#[tokio::test]
async fn given_limited_client_when_window_rolls_over_then_count_restarts() {
    let (_store, limiter) = limiter(2);

    for _ in 0..5 {
        limiter.check_at("1.2.3.4", T0 + 100).await.unwrap();
    }

    let decision = limiter.check_at("1.2.3.4", T0 + HOUR).await.unwrap();
    assert!(!decision.limited);
    assert_eq!(decision.count, 1);
    assert_eq!(decision.reset, T0 + 2 * HOUR);
}

#[tokio::test]
async fn given_two_clients_when_check_then_counted_independently() {
    let (_store, limiter) = limiter(1);

    limiter.check_at("a", T0).await.unwrap();
    let a = limiter.check_at("a", T0).await.unwrap();
    let b = limiter.check_at("b", T0).await.unwrap();

    assert!(a.limited);
    assert!(!b.limited);
}

#[tokio::test]
async fn given_concurrent_requests_when_check_then_no_lost_updates() {
    let (_store, limiter) = limiter(10_000);
    let n = 200;

    let mut tasks = Vec::new();
    for _ in 0..n {
        let limiter = limiter.clone();
        tasks.push(tokio::spawn(async move {
            limiter.check_at("1.2.3.4", T0).await.unwrap().count
        }));
    }

    let mut counts = Vec::new();
    for task in tasks {
        counts.push(task.await.unwrap());
    }
    counts.sort_unstable();

    assert_eq!(counts, (1..=n).collect::<Vec<u64>>());
}

#[tokio::test]
async fn given_new_window_when_check_then_old_counters_purged() {
    let (store, limiter) = limiter(10);

    limiter.check_at("a", T0).await.unwrap();
    limiter.check_at("b", T0).await.unwrap();
    assert_eq!(store.len(), 2);

    limiter.check_at("a", T0 + HOUR).await.unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn given_zero_window_when_new_then_invalid_config() {
    let result = FixedWindowLimiter::new(
        Arc::new(MemoryRateLimitStore::new()),
        RateLimitConfig {
            max_requests: 1,
            window_secs: 0,
        },
    );

    assert!(matches!(result, Err(RateLimitError::InvalidConfig { .. })));
}

struct FailingStore;

#[async_trait]
impl RateLimitStore for FailingStore {
    async fn incr_with_expiry(&self, _key: &str, _expire_at: u64) -> crate::Result<u64> {
        Err(RateLimitError::store("unreachable"))
    }
}

#[tokio::test]
async fn given_failing_store_when_check_then_error_propagates() {
    let limiter =
        FixedWindowLimiter::new(Arc::new(FailingStore), RateLimitConfig::default()).unwrap();

    let result = limiter.check_at("1.2.3.4", T0).await;

    assert!(matches!(result, Err(RateLimitError::Store { .. })));
}

#[tokio::test(start_paused = true)]
async fn given_unreachable_redis_when_check_then_error_instead_of_hang() {
    // Creating the store never touches the network
    let store = RedisRateLimitStore::new("redis://127.0.0.1:1").unwrap();
    let limiter = FixedWindowLimiter::new(Arc::new(store), RateLimitConfig::default()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(60), limiter.check_at("1.2.3.4", T0))
        .await
        .expect("check settles within the connect timeout");

    assert!(result.is_err());
}
