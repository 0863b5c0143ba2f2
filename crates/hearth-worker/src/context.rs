//! Job handler context trait
//!
//! The worker pool calls `dispatch_job` for every claimed job. Implementations
//! match on the job kind and perform the delivery.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use hearth_core::models::Job;

#[async_trait]
pub trait JobHandlerContext: Send + Sync {
    /// Run the job and return a JSON summary of what was done.
    async fn dispatch_job(self: Arc<Self>, job: &Job) -> Result<serde_json::Value>;
}
