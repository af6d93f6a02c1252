use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Marker error returned when a [`CancellationToken`] fires first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Drive `operation` to completion unless `token` is cancelled first.
///
/// A token that is already cancelled on entry never polls `operation`, so no
/// statement is sent to the database. Once the database has accepted a single
/// statement it either commits or it does not; dropping the future mid-flight
/// never leaves a half-applied row.
///
/// # Example
/// ```ignore
/// use database::cancellable;
///
/// let model = cancellable(&token, Entity::find_by_id(id).one(&db)).await??;
/// ```
pub async fn cancellable<F, T>(token: &CancellationToken, operation: F) -> Result<T, Cancelled>
where
    F: Future<Output = T>,
{
    if token.is_cancelled() {
        return Err(Cancelled);
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!("Database operation cancelled before completion");
            Err(Cancelled)
        }
        output = operation => Ok(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_completes_when_not_cancelled() {
        let token = CancellationToken::new();
        let result = cancellable(&token, async { 7 }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_already_cancelled_never_polls_operation() {
        let token = CancellationToken::new();
        token.cancel();

        let polled = Arc::new(AtomicBool::new(false));
        let flag = polled.clone();
        let result = cancellable(&token, async move {
            flag.store(true, Ordering::SeqCst);
        })
        .await;

        assert_eq!(result, Err(Cancelled));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancelled_while_pending() {
        let token = CancellationToken::new();
        let trigger = token.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let result = cancellable(&token, std::future::pending::<()>()).await;
        assert_eq!(result, Err(Cancelled));
    }

    #[tokio::test]
    async fn test_child_token_follows_parent() {
        let parent = CancellationToken::new();
        let child = parent.child_token();
        parent.cancel();

        assert_eq!(cancellable(&child, async { 1 }).await, Err(Cancelled));
    }
}
