use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Runs an async request up to `attempts` times, sleeping `delay_ms`
/// between tries. Returns the first success or the last error.
pub async fn with_retry<F, Fut, T>(mut operation: F, attempts: usize, delay_ms: u64) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await.map_err(anyhow::Error::from) {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt >= attempts {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, attempts, err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
