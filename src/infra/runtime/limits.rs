use std::time::Duration;

use crate::infra::config::ToolConfig;

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_TIMEOUT_MS: u64 = 6_000;

/// Build a reqwest client with sane defaults (connect + request timeouts).
pub fn make_http_client() -> reqwest::Client {
    make_http_client_with(&ToolConfig::default())
}

/// Same as [`make_http_client`], with timeouts taken from `cfg` when set.
pub fn make_http_client_with(cfg: &ToolConfig) -> reqwest::Client {
    let connect = cfg.connect_timeout_ms.unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS);
    let total = cfg.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
    reqwest::Client::builder()
        .connect_timeout(Duration::from_millis(connect))
        .timeout(Duration::from_millis(total))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default reqwest client");
            reqwest::Client::new()
        })
}

/// Exponential backoff for async ops. `attempts` is the number of retries
/// after the first try; `should_retry` decides whether an error is worth one.
pub async fn retry_async<T, E, Fut, F, R>(mut attempts: u32, should_retry: R, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let mut try_num: u32 = 0;
    let mut delay_ms: u64 = 50;
    loop {
        match op(try_num).await {
            Ok(v) => return Ok(v),
            Err(e) => {
                if attempts == 0 || !should_retry(&e) {
                    return Err(e);
                }
                attempts -= 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                delay_ms = (delay_ms * 2).min(1_000);
                try_num += 1;
            }
        }
    }
}
