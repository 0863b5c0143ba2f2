use anyhow::{Context, Result};
use hearth_core::Config;
use hearth_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize blob storage")?;
    tracing::info!(
        root = %config.local_storage_path(),
        base_url = %config.local_storage_base_url(),
        max_upload_bytes = config.max_upload_size_bytes(),
        "Local blob storage ready"
    );
    Ok(storage)
}
