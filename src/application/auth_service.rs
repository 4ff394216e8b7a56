use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{
    LoginRequest, RegisterRequest, UpdateUserInformationRequest, UpdateUserPasswordRequest, User,
};
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            jwt_secret,
        }
    }

    #[instrument(skip(self), fields(username = %req.username, email = %req.email))]
    pub async fn register_user(&self, req: RegisterRequest) -> Result<User> {
        trace!("Starting user registration");

        let username_taken = self
            .user_repository
            .find_user_by_username(&req.username)
            .await?
            .is_some();
        let email_taken = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some();

        if username_taken || email_taken {
            warn!(username = %req.username, email = %req.email, "User already exists");
            return Err(DomainError::DuplicateUser.into());
        }

        if req.password != req.confirmed_password {
            warn!(username = %req.username, "Password confirmation mismatch during registration");
            return Err(DomainError::PasswordMismatch.into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            first_name: req.first_name,
            last_name: req.last_name,
            username: req.username,
            email: req.email,
            password_hash,
        };

        debug!(user_id = %user.id, username = %user.username, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        info!(
            user_id = %user.id,
            username = %user.username,
            "User registered successfully"
        );

        Ok(user)
    }

    #[instrument(skip(self), fields(identifier = %req.username_or_email))]
    pub async fn login(&self, req: LoginRequest) -> Result<String> {
        trace!("Starting login");

        // The storefront login form takes a single identifier field, so try
        // the username first and fall back to the email.
        let by_username = self
            .user_repository
            .find_user_by_username(&req.username_or_email)
            .await?;
        let user = match by_username {
            Some(user) => Some(user),
            None => {
                self.user_repository
                    .find_user_by_email(&req.username_or_email)
                    .await?
            }
        };

        let user = user.ok_or_else(|| {
            warn!(identifier = %req.username_or_email, "User not found during login");
            DomainError::UserNotFound
        })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::WrongPassword.into());
        }

        let token = generate_token(&user.id, &self.jwt_secret, req.remember_me).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(
            user_id = %user.id,
            remember_me = req.remember_me,
            "Login successful"
        );

        Ok(token)
    }

    #[instrument(skip(self), fields(user_id = user_id))]
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        trace!("Fetching user");

        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = user_id, "User not found");
                DomainError::UserNotFound.into()
            })
    }

    /// Fails with "record not found" when no user has this id.
    #[instrument(skip(self), fields(user_id = user_id))]
    pub async fn ensure_user_record(&self, user_id: &str) -> Result<()> {
        trace!("Checking user record exists");

        if self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .is_none()
        {
            warn!(user_id = user_id, "Record not found");
            return Err(DomainError::RecordNotFound.into());
        }
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %req.id))]
    pub async fn update_information(&self, req: UpdateUserInformationRequest) -> Result<()> {
        trace!("Updating user information");

        let mut user = self
            .user_repository
            .find_user_by_id(&req.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %req.id, "Record not found during information update");
                DomainError::RecordNotFound
            })?;

        // The new username/email must not belong to a different user.
        if let Some(other) = self
            .user_repository
            .find_user_by_username(&req.username)
            .await?
            && other.id != user.id
        {
            warn!(username = %req.username, "Username already taken");
            return Err(DomainError::DuplicateUser.into());
        }
        if let Some(other) = self.user_repository.find_user_by_email(&req.email).await?
            && other.id != user.id
        {
            warn!(email = %req.email, "Email already taken");
            return Err(DomainError::DuplicateUser.into());
        }

        user.first_name = req.first_name;
        user.last_name = req.last_name;
        user.username = req.username;
        user.email = req.email;

        self.user_repository.update_user(user.clone()).await?;

        info!(user_id = %user.id, "User information updated successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %req.id))]
    pub async fn update_password(&self, req: UpdateUserPasswordRequest) -> Result<()> {
        trace!("Updating user password");

        let mut user = self
            .user_repository
            .find_user_by_id(&req.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %req.id, "Record not found during password update");
                DomainError::RecordNotFound
            })?;

        let current_ok = verify_password(&req.current_password, &user.password_hash)
            .map_err(|e| {
                error!(error = %e, "Failed to verify password");
                DomainError::Internal(format!("Failed to verify password: {}", e))
            })?;

        if !current_ok {
            warn!(user_id = %user.id, "Current password incorrect during password update");
            return Err(DomainError::WrongCurrentPassword.into());
        }

        if req.new_password != req.confirmed_password {
            warn!(user_id = %user.id, "Password confirmation mismatch during password update");
            return Err(DomainError::PasswordMismatch.into());
        }

        user.password_hash = hash_password(&req.new_password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        self.user_repository.update_user(user.clone()).await?;

        info!(user_id = %user.id, "User password updated successfully");
        Ok(())
    }
}
