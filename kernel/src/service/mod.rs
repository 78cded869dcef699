use shared::error::{AppError, AppResult};
use std::{future::Future, time::Duration};

pub mod conflict;
pub mod lifecycle;
pub mod search;

/// Runs a store or notifier call under `limit`; expiry becomes `AppError::Timeout`.
pub(crate) async fn bounded<T, F>(operation: &'static str, limit: Duration, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| AppError::Timeout {
            operation,
            after: limit,
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slow_calls_time_out() {
        let res: AppResult<()> = bounded("store read", Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;
        assert!(matches!(
            res,
            Err(AppError::Timeout {
                operation: "store read",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let res = bounded("store read", Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(res.ok(), Some(7));
    }
}
