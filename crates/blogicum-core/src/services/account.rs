//! Registration, login and password changes.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::User;
use crate::error::{DomainError, RepoError, ValidationErrors};
use crate::forms::{LoginForm, PasswordChangeForm, RegistrationForm};
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

/// A freshly issued access token and its owner.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

fn internal(e: AuthError) -> DomainError {
    DomainError::Internal(e.to_string())
}

fn username_taken() -> DomainError {
    let mut errors = ValidationErrors::new();
    errors.add("username", "A user with that username already exists.");
    DomainError::Validation(errors)
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    #[tracing::instrument(skip_all, fields(username = %form.username))]
    pub async fn register(&self, form: RegistrationForm) -> Result<Session, DomainError> {
        form.check().into_result()?;

        let username = form.username.trim().to_string();
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(username_taken());
        }

        let password_hash = self.passwords.hash(&form.password1).map_err(internal)?;
        let user = match self.users.save(User::new(username, password_hash)).await {
            Ok(user) => user,
            Err(RepoError::Constraint(_)) => return Err(username_taken()),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %user.id, "User registered");
        self.issue(user)
    }

    #[tracing::instrument(skip_all, fields(username = %form.username))]
    pub async fn login(&self, form: LoginForm) -> Result<Session, DomainError> {
        let user = self
            .users
            .find_by_username(form.username.trim())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = self
            .passwords
            .verify(&form.password, &user.password_hash)
            .map_err(internal)?;
        if !valid {
            tracing::debug!("Password mismatch");
            return Err(DomainError::Unauthorized);
        }

        self.issue(user)
    }

    /// Replace the password of a signed-in user after checking the old one.
    #[tracing::instrument(skip(self, form))]
    pub async fn change_password(
        &self,
        user_id: Uuid,
        form: PasswordChangeForm,
    ) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let mut errors = form.check(&user.username);
        if !form.old_password.is_empty()
            && !self
                .passwords
                .verify(&form.old_password, &user.password_hash)
                .map_err(internal)?
        {
            errors.add(
                "old_password",
                "Your old password was entered incorrectly. Please enter it again.",
            );
        }
        errors.into_result()?;

        user.password_hash = self.passwords.hash(&form.new_password1).map_err(internal)?;
        user.updated_at = chrono::Utc::now();
        let user = self.users.save(user).await?;
        tracing::info!(user_id = %user.id, "Password changed");
        Ok(user)
    }

    /// Create or promote a staff account. Used to bootstrap the first
    /// administrator; an existing user keeps their password.
    #[tracing::instrument(skip(self, password))]
    pub async fn ensure_staff_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        let mut user = match self.users.find_by_username(username).await? {
            Some(user) if user.is_staff => return Ok(user),
            Some(user) => user,
            None => {
                let form = RegistrationForm {
                    username: username.to_string(),
                    password1: password.to_string(),
                    password2: password.to_string(),
                };
                form.check().into_result()?;
                let password_hash = self.passwords.hash(password).map_err(internal)?;
                User::new(username.trim().to_string(), password_hash)
            }
        };

        user.is_staff = true;
        user.updated_at = chrono::Utc::now();
        let user = self.users.save(user).await?;
        tracing::info!(user_id = %user.id, "Staff account ready");
        Ok(user)
    }

    fn issue(&self, user: User) -> Result<Session, DomainError> {
        let access_token = self
            .tokens
            .generate_token(user.id, &user.username)
            .map_err(internal)?;

        Ok(Session {
            user,
            access_token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }
}
