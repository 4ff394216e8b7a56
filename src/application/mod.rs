pub mod auth_service;
pub mod checkout_service;
