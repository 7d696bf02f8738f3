//! Registration and login.

use std::sync::Arc;

use postboard_core::domain::User;
use postboard_core::validation::validate_registration;
use postboard_core::{DomainError, DomainResult};
use postboard_shared::dto::{AuthPayload, LoginInput, UserInput};

use super::Resolvers;

impl Resolvers {
    /// Register a new user.
    pub async fn create_user(&self, input: UserInput) -> DomainResult<User> {
        let UserInput {
            name,
            email,
            password,
        } = input;

        validate_registration(&email, &password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("User already exists".to_string()));
        }

        let password_hash = self.hash_password(password).await?;
        let user = self.users.save(User::new(name, email, password_hash)).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, input: LoginInput) -> DomainResult<AuthPayload> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("User not found".to_string()))?;

        if !self
            .verify_password(input.password, user.password_hash.clone())
            .await?
        {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(DomainError::Unauthorized("Password incorrect".to_string()));
        }

        let token = self.tokens.generate_token(user.id, &user.email)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthPayload {
            token,
            user_id: user.id.to_string(),
            expires_in: u64::try_from(self.tokens.expiration_seconds()).unwrap_or_default(),
        })
    }

    // Hashing is CPU bound, so it runs on the blocking pool and is awaited to completion.
    async fn hash_password(&self, password: String) -> DomainResult<String> {
        let passwords = Arc::clone(&self.passwords);
        let hash = tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))??;
        Ok(hash)
    }

    async fn verify_password(&self, password: String, hash: String) -> DomainResult<bool> {
        let passwords = Arc::clone(&self.passwords);
        let matches = tokio::task::spawn_blocking(move || passwords.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))??;
        Ok(matches)
    }
}
