//! The authenticated user's own record.

use postboard_core::domain::User;
use postboard_core::{DomainError, DomainResult};

use super::Resolvers;
use crate::middleware::auth::AuthContext;

impl Resolvers {
    /// Fetch the current user.
    pub async fn user(&self, ctx: &AuthContext) -> DomainResult<User> {
        let user_id = ctx.require()?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound { entity_type: "User" })
    }

    /// Overwrite the current user's status.
    pub async fn update_status(&self, ctx: &AuthContext, status: String) -> DomainResult<User> {
        let mut user = self.user(ctx).await?;

        user.set_status(status);
        let user = self.users.save(user).await?;

        tracing::info!(user_id = %user.id, "Status updated");
        Ok(user)
    }
}
