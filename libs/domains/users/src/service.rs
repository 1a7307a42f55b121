use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::events::{EventPublisher, UserEvent};
use crate::models::{FieldMask, User, UserFilter};
use crate::repository::UserRepository;

/// Page size used when a caller asks for `limit = 0`.
pub const DEFAULT_LIMIT: u64 = 100;

/// Business rules for users: pagination defaults, fetch-before-delete and
/// best-effort event publication after every mutation.
pub struct UserService<R: UserRepository, P: EventPublisher> {
    repository: Arc<R>,
    publisher: Arc<P>,
}

impl<R: UserRepository, P: EventPublisher> Clone for UserService<R, P> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            publisher: Arc::clone(&self.publisher),
        }
    }
}

impl<R: UserRepository, P: EventPublisher> UserService<R, P> {
    pub fn new(repository: R, publisher: P) -> Self {
        Self {
            repository: Arc::new(repository),
            publisher: Arc::new(publisher),
        }
    }

    /// Persist a new user; `user` receives its id and creation time.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create_user(&self, user: &mut User) -> UserResult<()> {
        self.repository.create(user).await?;

        self.publish(UserEvent::Created { user: user.clone() }).await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> UserResult<Vec<User>> {
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        self.repository.list(filter, offset, limit).await
    }

    /// Write the masked attributes; `user` receives the new update time.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn update_user(&self, user: &mut User, mask: &FieldMask) -> UserResult<()> {
        self.repository.update(user, mask).await?;

        self.publish(UserEvent::Updated {
            user: user.clone(),
            update_fields: mask.clone(),
        })
        .await;
        Ok(())
    }

    /// Fetch, delete, then publish the pre-deletion snapshot.
    ///
    /// Another caller may delete the same user between the fetch and the
    /// delete; the second step then reports `NotFound`.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        let user = self
            .repository
            .get(id)
            .await
            .map_err(|e| UserError::DeleteLookup(Box::new(e)))?;

        self.repository.delete(id).await?;

        self.publish(UserEvent::Deleted { user }).await;
        Ok(())
    }

    /// Failures are logged and dropped; the mutation already happened.
    async fn publish(&self, event: UserEvent) {
        let topic = event.topic();
        if let Err(e) = self.publisher.publish(topic, &event).await {
            error!(
                user_id = %event.user().id,
                topic_name = topic,
                error = %e,
                "unable to produce message"
            );
        }
    }
}
