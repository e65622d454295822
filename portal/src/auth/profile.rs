//! # Profile Writer
//!
//! Creates the durable `users/{uid}` record on first sign-up: empty
//! joined-clubs, liked-content, and attending-events lists.
//!
//! Creation goes through the store's conditional create, so a repeat call
//! for an existing identifier is a no-op instead of silently resetting the
//! membership lists back to empty.

use std::sync::Arc;

use lib_store::StoreError;
use shared::UserProfile;

use crate::core::error::{AuthError, Result};
use crate::core::service::ProfileStore;

#[derive(Clone)]
pub struct ProfileWriter {
    store: Arc<dyn ProfileStore>,
}

impl ProfileWriter {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Write the initial profile record for a new identifier.
    ///
    /// An already existing record counts as success and is left untouched.
    /// Any other failure surfaces as [`AuthError::ProfileWriteFailed`]; the
    /// caller keeps the authenticated session so the write can be retried
    /// without re-running authentication.
    #[tracing::instrument(skip(self, bearer), fields(user_id = %user_id))]
    pub async fn create_profile(
        &self,
        user_id: &str,
        email: &str,
        display_name: Option<String>,
        notify_on_new_post: bool,
        bearer: &str,
    ) -> Result<()> {
        let profile = UserProfile::new_account(user_id, email, display_name, notify_on_new_post);

        match self.store.create_user_profile(&profile, bearer).await {
            Ok(()) => {
                tracing::info!("Profile record created");
                Ok(())
            }
            Err(StoreError::AlreadyExists) => {
                tracing::debug!("Profile record already present, leaving it untouched");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Profile write failed");
                Err(AuthError::ProfileWriteFailed(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mocks::MockProfileStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_profile_writes_empty_lists() {
        let store = Arc::new(MockProfileStore::new());
        let writer = ProfileWriter::new(Arc::clone(&store) as Arc<dyn ProfileStore>);

        writer
            .create_profile("uid-1", "student@ucsc.edu", None, true, "token")
            .await
            .unwrap();

        let created = store.created.lock();
        assert_eq!(created.len(), 1);
        assert!(created[0].joined_clubs.is_empty());
        assert!(created[0].liked_content.is_empty());
        assert!(created[0].events_attend.is_empty());
    }

    #[tokio::test]
    async fn test_existing_profile_is_not_overwritten() {
        let store = Arc::new(MockProfileStore::new().with_create_error(StoreError::AlreadyExists));
        let writer = ProfileWriter::new(Arc::clone(&store) as Arc<dyn ProfileStore>);

        let result = writer
            .create_profile("uid-1", "student@ucsc.edu", None, true, "token")
            .await;

        assert!(result.is_ok());
        assert!(store.created.lock().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_as_profile_write_failed() {
        let store = Arc::new(MockProfileStore::new().with_create_error(StoreError::Network(
            "connection reset".to_string(),
        )));
        let writer = ProfileWriter::new(store as Arc<dyn ProfileStore>);

        let result = writer
            .create_profile("uid-1", "student@ucsc.edu", None, true, "token")
            .await;

        assert!(matches!(result, Err(AuthError::ProfileWriteFailed(_))));
    }
}
