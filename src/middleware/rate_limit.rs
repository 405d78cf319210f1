use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Window {
    opened: Instant,
    served: u32,
}

/// Fixed one-second window shared by every caller of a router group.
#[derive(Clone, Debug)]
pub struct RequestLimiter {
    per_second: u32,
    window: Arc<Mutex<Window>>,
}

impl RequestLimiter {
    pub fn per_second(limit: u32) -> Self {
        Self {
            per_second: limit.max(1),
            window: Arc::new(Mutex::new(Window {
                opened: Instant::now(),
                served: 0,
            })),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut window = self.window.lock().expect("request limiter mutex poisoned");
        if window.opened.elapsed() >= WINDOW {
            window.opened = Instant::now();
            window.served = 0;
        }
        if window.served >= self.per_second {
            return false;
        }
        window.served += 1;
        true
    }
}

pub async fn limit_middleware(
    State(limiter): State<RequestLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.try_acquire() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "too_many_requests" })),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_up_to_the_limit_within_one_window() {
        let limiter = RequestLimiter::per_second(3);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn zero_limit_is_clamped_to_one() {
        let limiter = RequestLimiter::per_second(0);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn budget_returns_when_the_window_rolls_over() {
        let limiter = RequestLimiter::per_second(1);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        std::thread::sleep(Duration::from_millis(1100));
        assert!(limiter.try_acquire());
    }
}
