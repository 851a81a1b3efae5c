//! User Directory
//!
//! Registration, profile maintenance and per-request credential checks.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::config::MarketplaceConfig;
use crate::domain::entity::user::{ContactDetails, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId, email::Email, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{MarketplaceError, MarketplaceResult};

pub struct RegisterUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub cpf: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

pub struct UserDirectory<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<MarketplaceConfig>,
}

impl<U> UserDirectory<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<MarketplaceConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn register(&self, input: RegisterUserInput) -> MarketplaceResult<User> {
        let email = Email::new(&input.email)?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(MarketplaceError::EmailTaken);
        }

        let password = UserPassword::hash(input.password, &self.config.password_hasher())?;

        let user = User::new(
            &input.name,
            email,
            password,
            input.role,
            ContactDetails {
                phone_number: input.phone_number,
                cpf: input.cpf,
                date_of_birth: input.date_of_birth,
            },
        )?;

        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(user)
    }

    pub async fn list(&self) -> MarketplaceResult<Vec<User>> {
        self.user_repo.list().await
    }

    pub async fn get(&self, user_id: &UserId) -> MarketplaceResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(MarketplaceError::UserNotFound)
    }

    pub async fn update(&self, user_id: &UserId, name: &str, email: &str) -> MarketplaceResult<User> {
        let mut user = self.get(user_id).await?;
        let email = Email::new(email)?;

        if email != user.email && self.user_repo.exists_by_email(&email).await? {
            return Err(MarketplaceError::EmailTaken);
        }

        user.rename(name, email)?;
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.id, "User profile updated");

        Ok(user)
    }

    pub async fn delete(&self, user_id: &UserId) -> MarketplaceResult<()> {
        if !self.user_repo.delete(user_id).await? {
            return Err(MarketplaceError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "User deleted");

        Ok(())
    }

    /// Check email + password and require `expected_role`.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        expected_role: UserRole,
    ) -> MarketplaceResult<User> {
        let email = Email::new(email).map_err(|_| MarketplaceError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(MarketplaceError::InvalidCredentials)?;

        if !user.password.verify(password, &self.config.password_hasher()) {
            return Err(MarketplaceError::InvalidCredentials);
        }

        if user.role != expected_role {
            return Err(MarketplaceError::RoleMismatch {
                expected: expected_role,
            });
        }

        Ok(user)
    }
}
