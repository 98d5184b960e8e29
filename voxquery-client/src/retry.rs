use std::future::Future;
use std::time::Duration;

/// Runs `op` once, then retries on failure with exponential backoff.
///
/// `retries` is the number of retries on top of the initial attempt, so
/// `retries = 3` means up to 4 calls with delays `d, 2d, 4d` between them.
/// Call sites rely on that counting, so it is part of the contract. When
/// every attempt fails, the last error is returned unwrapped.
pub async fn retry_with_backoff<T, E, F, Fut>(
    mut op: F,
    retries: u32,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut remaining = retries;
    let mut delay = initial_delay;

    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if remaining == 0 => return Err(e),
            Err(e) => {
                log::warn!("operation failed ({e}); retrying in {delay:?}, {remaining} retries left");
                tokio::time::sleep(delay).await;
                delay *= 2;
                remaining -= 1;
            }
        }
    }
}

pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_exhausts_retries_plus_one() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls2 = calls.clone();

        let started = tokio::time::Instant::now();
        let result: Result<(), &str> = retry_with_backoff(
            move || {
                let calls = calls2.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("still broken")
                }
            },
            3,
            Duration::from_millis(1000),
        )
        .await;

        assert_eq!(result, Err("still broken"));
        // One unconditional call plus three retries.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // Delays follow 1s, 2s, 4s.
        assert_eq!(started.elapsed(), Duration::from_millis(7000));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls2 = calls.clone();

        let result: Result<u32, &str> = retry_with_backoff(
            move || {
                let calls = calls2.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 { Err("flaky") } else { Ok(n) }
                }
            },
            3,
            Duration::from_millis(10),
        )
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_retries_calls_exactly_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls2 = calls.clone();

        let result: Result<(), &str> = retry_with_backoff(
            move || {
                let calls = calls2.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("no")
                }
            },
            0,
            Duration::from_millis(1),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
