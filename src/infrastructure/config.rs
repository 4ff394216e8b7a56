use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub cors_origin: Option<String>,
}

impl AppConfig {
    /// Reads configuration from the environment, after loading `.env` if
    /// present. Missing values fall back to development defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev-only-insecure-secret".to_string()),
            cors_origin: env::var("CORS_ORIGIN").ok(),
        }
    }
}
