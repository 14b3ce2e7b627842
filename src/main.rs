use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use payrolld::database::{init_database, repositories, seed};
use payrolld::handlers::shared::ApiResponse;
use payrolld::middleware::RequestId;
use payrolld::routes;
use payrolld::services::{AuthService, HolidayService};
use payrolld::{AppState, Config};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Payroll Administration API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("Starting Payroll Administration API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "Configuration loaded (environment: {})",
        config.environment
    );
    if config.is_production() && config.jwt_secret == "secret" {
        log::warn!(
            "Running in production with the default token secret; set JWT_SECRET or the token:secret setting"
        );
    }

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    println!("Database initialized");

    // Initialize repositories and services
    let user_repository = repositories::UserRepository::new(pool.clone());
    let group_repository = repositories::AccessGroupRepository::new(pool.clone());
    let flag_repository = repositories::AccessFlagRepository::new(pool.clone());
    let settings_repository = repositories::SettingsRepository::new(pool.clone());
    let auth_service = AuthService::new(
        user_repository.clone(),
        settings_repository.clone(),
        config.clone(),
    );
    let holiday_service = HolidayService::new(config.holiday_api_url.clone());

    // Seed default access groups/flags and bootstrap the root account
    seed::ensure_defaults(&group_repository, &flag_repository).await?;
    seed::ensure_root_user(&user_repository, &group_repository, &config.data_dir).await?;

    // Create app state and repository data
    let app_state = web::Data::new(AppState { auth_service });
    let pool_data = web::Data::new(pool);
    let user_repo_data = web::Data::new(user_repository);
    let group_repo_data = web::Data::new(group_repository);
    let flag_repo_data = web::Data::new(flag_repository);
    let settings_repo_data = web::Data::new(settings_repository);
    let holiday_service_data = web::Data::new(holiday_service);

    let server_address = config.server_address();
    println!("Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(pool_data.clone())
            .app_data(user_repo_data.clone())
            .app_data(group_repo_data.clone())
            .app_data(flag_repo_data.clone())
            .app_data(settings_repo_data.clone())
            .app_data(holiday_service_data.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let response =
                    HttpResponse::BadRequest().json(ApiResponse::<()>::error("Invalid Data"));
                actix_web::error::InternalError::from_response(err, response).into()
            }))
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Access-Token",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
