use crate::{LocalStorage, Storage, StorageResult};
use hearth_core::Config;
use std::sync::Arc;

/// Create the blob store from configuration.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(
        config.local_storage_path(),
        config.local_storage_base_url().to_string(),
    )
    .await?;

    tracing::info!(
        path = %config.local_storage_path(),
        base_url = %config.local_storage_base_url(),
        "Local blob storage ready"
    );

    Ok(Arc::new(storage))
}
