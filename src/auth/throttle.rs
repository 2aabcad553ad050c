use std::collections::HashMap;
use chrono::{DateTime, Utc, Duration};
use tokio::sync::RwLock;

use crate::config::AuthConfig;

#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    pub window_size: Duration,
    pub max_failures: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window_size: Duration::minutes(1),
            max_failures: 10,
        }
    }
}

impl From<&AuthConfig> for ThrottleConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            window_size: Duration::seconds(config.throttle_window_secs),
            max_failures: config.throttle_max_failures,
        }
    }
}

#[derive(Debug)]
struct FailureWindow {
    timestamps: Vec<DateTime<Utc>>,
}

impl FailureWindow {
    fn new() -> Self {
        Self {
            timestamps: Vec::new(),
        }
    }

    fn cleanup_old_failures(&mut self, window_size: Duration) {
        let cutoff = Utc::now() - window_size;
        self.timestamps.retain(|ts| *ts > cutoff);
    }

    fn add_failure(&mut self) {
        self.timestamps.push(Utc::now());
    }

    fn failure_count(&self) -> usize {
        self.timestamps.len()
    }
}

/// Sliding window of failed login attempts per username. Once a username
/// exceeds the limit the login handler stops running bcrypt for it until
/// the window drains.
pub struct LoginThrottle {
    windows: RwLock<HashMap<String, FailureWindow>>,
    config: ThrottleConfig,
}

impl LoginThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Whether a login attempt for this username may proceed.
    pub async fn check(&self, username: &str) -> bool {
        let mut windows = self.windows.write().await;

        let window = match windows.get_mut(username) {
            Some(window) => window,
            None => return true,
        };

        window.cleanup_old_failures(self.config.window_size);
        window.failure_count() < self.config.max_failures as usize
    }

    /// Record a failed attempt for this username.
    pub async fn record_failure(&self, username: &str) {
        let mut windows = self.windows.write().await;
        let window = windows
            .entry(username.to_string())
            .or_insert_with(FailureWindow::new);
        window.cleanup_old_failures(self.config.window_size);
        window.add_failure();
    }

    /// A successful login clears the username's failure history.
    pub async fn record_success(&self, username: &str) {
        self.windows.write().await.remove(username);
    }

    pub async fn cleanup(&self) {
        let mut windows = self.windows.write().await;

        // Remove windows with no recent failures
        windows.retain(|_, window| {
            window.cleanup_old_failures(self.config.window_size);
            !window.timestamps.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Duration as TokioDuration};

    #[tokio::test]
    async fn test_throttle_allows_under_limit() {
        let throttle = LoginThrottle::new(ThrottleConfig::default());

        for _ in 0..9 {
            throttle.record_failure("valet").await;
        }
        assert!(throttle.check("valet").await);
    }

    #[tokio::test]
    async fn test_throttle_blocks_over_limit() {
        let throttle = LoginThrottle::new(ThrottleConfig::default());

        for _ in 0..10 {
            throttle.record_failure("valet").await;
        }
        assert!(!throttle.check("valet").await);

        // Other usernames are unaffected
        assert!(throttle.check("desk").await);
    }

    #[tokio::test]
    async fn test_throttle_success_resets() {
        let throttle = LoginThrottle::new(ThrottleConfig::default());

        for _ in 0..10 {
            throttle.record_failure("demo").await;
        }
        assert!(!throttle.check("demo").await);

        throttle.record_success("demo").await;
        assert!(throttle.check("demo").await);
    }

    #[tokio::test]
    async fn test_throttle_window_expiry() {
        let config = ThrottleConfig {
            window_size: Duration::seconds(1),
            max_failures: 2,
        };
        let throttle = LoginThrottle::new(config);

        throttle.record_failure("demo").await;
        throttle.record_failure("demo").await;
        assert!(!throttle.check("demo").await);

        // Wait for window to pass
        sleep(TokioDuration::from_millis(1100)).await;
        assert!(throttle.check("demo").await);
    }

    #[tokio::test]
    async fn test_cleanup_drops_stale_windows() {
        let config = ThrottleConfig {
            window_size: Duration::seconds(1),
            max_failures: 2,
        };
        let throttle = LoginThrottle::new(config);

        throttle.record_failure("demo").await;
        sleep(TokioDuration::from_millis(1100)).await;
        throttle.cleanup().await;

        assert!(throttle.windows.read().await.is_empty());
    }
}
