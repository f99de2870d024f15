mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use service::{
    assistant_service::AssistantService, invoice_service::InvoiceService,
    job_service::JobService, payment_service::PaymentService, stripe::StripeClient,
    webhook_service::WebhookService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub job_service: Arc<JobService>,
    pub invoice_service: Arc<InvoiceService>,
    pub payment_service: Arc<PaymentService>,
    pub webhook_service: Arc<WebhookService>,
    pub assistant_service: Arc<AssistantService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        // The processor client is constructed once here and injected;
        // its lifecycle is owned by process startup/shutdown.
        let stripe_client = Arc::new(StripeClient::new(&config));

        let job_service = Arc::new(JobService::new(db_client_arc.clone()));
        let invoice_service = Arc::new(InvoiceService::new(db_client_arc.clone()));
        let payment_service = Arc::new(PaymentService::new(
            db_client_arc.clone(),
            stripe_client.clone(),
        ));
        let webhook_service = Arc::new(WebhookService::new(
            invoice_service.clone(),
            config.stripe_webhook_secret.clone(),
        ));
        let assistant_service = Arc::new(AssistantService::new(&config));

        Self {
            env: config,
            db_client: db_client_arc,
            job_service,
            invoice_service,
            payment_service,
            webhook_service,
            assistant_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .init();

    dotenv().ok();

    let config = Config::init();

    // Connect to PostgreSQL
    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            println!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);

    let allowed_origins = vec![
        config
            .frontend_origin
            .parse::<HeaderValue>()
            .expect("FRONTEND_ORIGIN must be a valid origin"),
        "http://localhost:3000".parse::<HeaderValue>().unwrap(),
        "http://localhost:8000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    println!("🚀 Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
