use crate::domain::user::{
    LoginRequest, RegisterRequest, UpdateUserInformationRequest, UpdateUserPasswordRequest, User,
};
use crate::presentation::handlers::{ApiError, AppState, require_valid};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, info, instrument};

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Public view of a user record. Never carries the password hash.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            email: user.email,
        }
    }
}

#[instrument(skip(state, req), fields(username = %req.username))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(username = %req.username, email = %req.email, "Registration request received");
    require_valid(&*req)?;

    let user = state
        .auth_service
        .register_user(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    let response = RegisterResponse {
        id: user.id,
        username: user.username,
        email: user.email,
    };

    info!(user_id = %response.id, username = %response.username, "User registered successfully");
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, req), fields(identifier = %req.username_or_email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(identifier = %req.username_or_email, "Login request received");
    require_valid(&*req)?;

    let token = state
        .auth_service
        .login(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to login");
            ApiError::from(e)
        })?;

    info!("Login successful");
    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: token,
    }))
}

#[instrument(skip(state), fields(user_id = %*path, requester = %auth.user_id))]
pub async fn get_user(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    info!(user_id = %user_id, "Get user request received");

    let user = state.auth_service.get_user(&user_id).await.map_err(|e| {
        error!(user_id = %user_id, error = %e, "Failed to get user");
        ApiError::from(e)
    })?;

    info!(user_id = %user.id, "User retrieved successfully");
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[instrument(skip(state, req), fields(user_id = %req.id, requester = %auth.user_id))]
pub async fn update_user_information(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    req: web::Json<UpdateUserInformationRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(user_id = %req.id, "Update user information request received");

    // Unknown account ids are reported before field validation runs
    state
        .auth_service
        .ensure_user_record(&req.id)
        .await
        .map_err(|e| {
            error!(user_id = %req.id, error = %e, "Account lookup failed");
            ApiError::from(e)
        })?;
    require_valid(&*req)?;

    state
        .auth_service
        .update_information(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update user information");
            ApiError::from(e)
        })?;

    info!("User information updated successfully");
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state, req), fields(user_id = %req.id, requester = %auth.user_id))]
pub async fn update_user_password(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    req: web::Json<UpdateUserPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(user_id = %req.id, "Update user password request received");

    // Unknown account ids are reported before field validation runs
    state
        .auth_service
        .ensure_user_record(&req.id)
        .await
        .map_err(|e| {
            error!(user_id = %req.id, error = %e, "Account lookup failed");
            ApiError::from(e)
        })?;
    require_valid(&*req)?;

    state
        .auth_service
        .update_password(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update user password");
            ApiError::from(e)
        })?;

    info!("User password updated successfully");
    Ok(HttpResponse::NoContent().finish())
}
