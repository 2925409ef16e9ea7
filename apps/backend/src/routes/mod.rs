use actix_web::web;

pub mod auth;
pub mod currency_rates;
pub mod health;
pub mod hotel;
pub mod pages;
pub mod proxy;
pub mod reference;
pub mod superadmin;

/// Everything under `/api`, relative to that scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").configure(auth::configure_routes))
        .service(web::scope("/superadmin").configure(superadmin::configure_routes))
        .configure(currency_rates::configure_routes)
        .configure(reference::configure_routes)
        .configure(hotel::configure_routes);
}

/// Configure application routes for tests and non-HttpServer contexts.
///
/// `main.rs` registers the same routes but puts the login endpoints and the
/// `/api` scope behind rate limiters.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .service(web::scope("/api").configure(configure_api))
        .configure(pages::configure_routes);
}
