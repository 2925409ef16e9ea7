use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::RateLimiter;
use actix_web::{web, App, HttpServer};
use hotel_gateway::config::app::AppConfig;
use hotel_gateway::infra::state::build_state;
use hotel_gateway::middleware::rate_limit::{api_rate_limit_config, login_rate_limit_config};
use hotel_gateway::middleware::{
    cors_middleware, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
use hotel_gateway::routes;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    let (host, port) = (config.host.clone(), config.port);
    let backend_url = config.backend_api_url.clone();

    let app_state = match build_state().with_config(config).build() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    println!("🚀 Starting hotel gateway on http://{host}:{port}");
    println!("↪️  Proxying to {backend_url}");

    let data = web::Data::new(app_state);
    // One store per limiter, shared by every worker.
    let login_limits = InMemoryBackend::builder().build();
    let api_limits = InMemoryBackend::builder().build();

    HttpServer::new(move || {
        let login_limiter = || {
            RateLimiter::builder(login_limits.clone(), login_rate_limit_config().build())
                .add_headers()
                .build()
        };
        let api_limiter = RateLimiter::builder(api_limits.clone(), api_rate_limit_config().build())
            .add_headers()
            .build();

        App::new()
            .wrap(cors_middleware())
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::health::configure_routes)
            .service(routes::auth::login_resource().wrap(login_limiter()))
            .service(routes::superadmin::login_resource().wrap(login_limiter()))
            .service(
                web::scope("/api")
                    .wrap(api_limiter)
                    .configure(routes::configure_api),
            )
            .configure(routes::pages::configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
