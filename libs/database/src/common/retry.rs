use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

/// Backoff policy for startup connections
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,

    pub initial_delay_ms: u64,

    pub max_delay_ms: u64,

    /// Growth factor applied after each failed attempt
    pub backoff_multiplier: f64,

    /// Randomize each sleep between 50% and 100% of the computed delay
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Sleep before the retry numbered `retry` (zero based), jitter not applied
    fn delay_before(&self, retry: u32) -> Duration {
        let grown = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(retry as i32);
        Duration::from_millis(grown.min(self.max_delay_ms as f64) as u64)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Environment variables:
/// - `DB_CONNECT_RETRIES` (default: 3)
/// - `DB_RETRY_INITIAL_DELAY_MS` (default: 100)
/// - `DB_RETRY_MAX_DELAY_MS` (default: 5000)
#[cfg(feature = "config")]
impl FromEnv for RetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_retries: env_parse("DB_CONNECT_RETRIES", "3")?,
            initial_delay_ms: env_parse("DB_RETRY_INITIAL_DELAY_MS", "100")?,
            max_delay_ms: env_parse("DB_RETRY_MAX_DELAY_MS", "5000")?,
            ..Self::default()
        })
    }
}

/// Run `operation` until it succeeds or `config.max_retries` retries have failed,
/// sleeping with exponential backoff in between. The last error is returned.
///
/// ```ignore
/// use database::common::{retry_with_backoff, RetryConfig};
///
/// let policy = RetryConfig { max_retries: 5, ..Default::default() };
/// let db = retry_with_backoff(|| database::postgres::connect(&db_url), &policy).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: &RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retries = 0;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if retries > 0 {
                    debug!(retries, "Succeeded after retrying");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if retries >= config.max_retries {
            warn!(attempts = retries + 1, error = %error, "Giving up after repeated failures");
            return Err(error);
        }

        let mut delay = config.delay_before(retries);
        if config.use_jitter {
            delay = jitter(delay);
        }
        debug!(
            attempt = retries + 1,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Attempt failed, backing off"
        );

        tokio::time::sleep(delay).await;
        retries += 1;
    }
}

/// Scale `delay` by a pseudo-random factor in [0.5, 1.0)
fn jitter(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let sample = RandomState::new().hash_one(std::time::Instant::now()) % 500;
    delay.mul_f64(0.5 + sample as f64 / 1000.0)
}
