use async_trait::async_trait;

use crate::domain::{AlertRequest, ApiResponse};
use crate::error::Result;

/// Submits alerts to the alerting service.
///
/// Implementations own transport, authentication and timeouts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertApiClient: Send + Sync {
    async fn create(&self, request: &AlertRequest) -> Result<ApiResponse>;
}
