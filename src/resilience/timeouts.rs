//! Timeout enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other provider errors

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::geo::types::{ProviderError, ProviderResult};

/// Run a provider call under a deadline.
pub async fn with_deadline<T, F>(timeout_ms: u64, fut: F) -> ProviderResult<T>
where
    F: Future<Output = ProviderResult<T>>,
{
    match timeout(Duration::from_millis(timeout_ms), fut).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout_ms)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expires() {
        let result: ProviderResult<()> = with_deadline(50, async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(ProviderError::Timeout(50))));
    }

    #[tokio::test]
    async fn test_inner_result_passes_through() {
        let ok = with_deadline(50, async { Ok::<_, ProviderError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: ProviderResult<()> = with_deadline(50, async { Err(ProviderError::Status(502)) }).await;
        assert!(matches!(err, Err(ProviderError::Status(502))));
    }
}
