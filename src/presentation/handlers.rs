use crate::application::auth_service::AuthService;
use crate::application::checkout_service::CheckoutService;
use crate::data::order_repository::InMemoryOrderRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::order::PaymentRequest;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

// AppState holding the services
pub struct AppState {
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub checkout_service: CheckoutService<InMemoryOrderRepository>,
}

// Uniform error response format for business-rule failures
#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

// Storefront API Error Types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<String>),
    #[error("{0}")]
    BusinessRule(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Validation(_) => actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BusinessRule(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::Database(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        match self {
            ApiError::Validation(messages) => {
                warn!(status = %status, messages = ?messages, "Validation error");
                // 422 carries the plain list of validation messages
                HttpResponse::build(status).json(messages)
            }
            ApiError::BusinessRule(message) => {
                warn!(error = %message, status = %status, "Business rule violation");
                HttpResponse::build(status).json(MessageResponse {
                    message: message.clone(),
                })
            }
            ApiError::Unauthorized(message) => {
                warn!(error = %message, status = %status, "Unauthorized");
                HttpResponse::build(status).json(MessageResponse {
                    message: message.clone(),
                })
            }
            ApiError::Database(_) | ApiError::Internal(_) => {
                error!(error = %error_msg, status = %status, "Internal error");
                HttpResponse::build(status).json(MessageResponse {
                    message: "Internal server error".to_string(),
                })
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            Some(domain_err) => ApiError::BusinessRule(domain_err.to_string()),
            None => ApiError::Database(err.to_string()),
        }
    }
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field)),
                    );
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}

/// Runs the declarative validation rules and flattens failures into the
/// message list the API returns with status 422.
pub fn require_valid<T: Validate>(value: &T) -> Result<(), ApiError> {
    value.validate().map_err(|errors| {
        let mut messages = Vec::new();
        collect_messages(&errors, &mut messages);
        messages.sort();
        ApiError::Validation(messages)
    })
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move {
            user.ok_or_else(|| ApiError::Unauthorized("User not authenticated".to_string()))
        })
    }
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[derive(Serialize)]
pub struct PaymentResponse {
    pub order_id: String,
    pub order_number: u32,
    pub total: u64,
    pub currency: String,
}

#[instrument(skip(state, req), fields(items = req.books.len()))]
pub async fn payment(
    state: web::Data<AppState>,
    req: web::Json<PaymentRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(items = req.books.len(), currency = %req.currency, "Payment request received");
    require_valid(&*req)?;

    let order = state
        .checkout_service
        .place_order(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to place order");
            ApiError::from(e)
        })?;

    let response = PaymentResponse {
        order_id: order.id,
        order_number: order.order_number,
        total: order.total.inner(),
        currency: order.currency,
    };

    info!(
        order_id = %response.order_id,
        order_number = response.order_number,
        "Order placed successfully"
    );
    Ok(HttpResponse::Created().json(response))
}
