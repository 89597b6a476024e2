use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// 在调用方给定的期限内执行存储操作；超时按存储不可用处理 (可重试)
///
/// 超时后 future 被丢弃，其中未提交的事务随之回滚。
pub async fn within_deadline<T, F>(deadline: Duration, operation: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("Operation exceeded deadline of {deadline:?}");
            Err(AppError::Unavailable(format!(
                "operation did not complete within {deadline:?}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let value = within_deadline(Duration::from_secs(1), async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_elapsed_deadline_is_unavailable() {
        let err = within_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_inner_errors_pass_through() {
        let err = within_deadline::<(), _>(Duration::from_secs(1), async {
            Err(AppError::Conflict("dup".into()))
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
