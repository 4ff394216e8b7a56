use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use bookworm_api::application::auth_service::AuthService;
use bookworm_api::application::checkout_service::CheckoutService;
use bookworm_api::data::order_repository::InMemoryOrderRepository;
use bookworm_api::data::user_repository::InMemoryUserRepository;
use bookworm_api::infrastructure::config::AppConfig;
use bookworm_api::infrastructure::logging::init_logging;
use bookworm_api::presentation::auth::{
    get_user, login, register, update_user_information, update_user_password,
};
use bookworm_api::presentation::handlers::{AppState, health_check, payment};
use bookworm_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();
    info!("Logging initialized");

    let config = AppConfig::from_env();
    info!(bind_addr = %config.bind_addr, "Configuration loaded");

    let user_repository = InMemoryUserRepository::new();
    let order_repository = InMemoryOrderRepository::new();
    info!("In-memory repositories created");

    let auth_service = Arc::new(AuthService::new(
        Arc::new(user_repository),
        config.jwt_secret.clone(),
    ));
    let checkout_service = CheckoutService::new(Arc::new(order_repository));
    info!("Services created");

    let state = web::Data::new(AppState {
        auth_service,
        checkout_service,
    });

    let jwt_secret = config.jwt_secret.clone();
    let cors_origin = config.cors_origin.clone();

    info!("Configuring HTTP server");
    let server = HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
            // Development default: the storefront runs on a different port
            None => Cors::permissive(),
        };

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health_check))
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(register))
                            .route("/login", web::post().to(login)),
                    )
                    .service(
                        web::scope("/account")
                            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
                            .route("/information", web::post().to(update_user_information))
                            .route("/password", web::post().to(update_user_password))
                            .route("/{id}", web::get().to(get_user)),
                    )
                    .service(web::scope("/checkout").route("/payment", web::post().to(payment))),
            )
    });

    info!(address = %config.bind_addr, "Binding server to address");
    let server = server.bind(&config.bind_addr)?;

    info!(
        address = %config.bind_addr,
        routes = %"GET /api/health, POST /api/auth/register, POST /api/auth/login, GET /api/account/{id}, POST /api/account/information, POST /api/account/password, POST /api/checkout/payment",
        "Starting HTTP server"
    );
    server.run().await
}
