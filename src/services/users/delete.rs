use tracing::info;

use super::UserService;
use crate::errors::{Result, ScoalaError};

pub async fn delete(service: &UserService, id: &str) -> Result<()> {
    if !service.storage().delete_user(id).await? {
        return Err(ScoalaError::user_not_found("Method delete: User not found."));
    }

    service.evict_cached_user(id).await;
    info!("User {} deleted", id);
    Ok(())
}
