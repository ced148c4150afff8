//! HTTP routes over the registry and the prober

pub mod ping;
pub mod service;

use actix_web::web;

use crate::services::health::health_check;

/// Register every route, API routes under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .route("/services", web::get().to(service::list_services))
            .route("/services/add", web::post().to(service::add_services))
            .route("/services/delete", web::delete().to(service::remove_services))
            .route("/services/ping", web::get().to(ping::ping_services))
            .route("/service/{name}", web::get().to(service::get_service))
            .route("/service/{name}/add", web::post().to(service::add_service))
            .route("/service/{name}/update", web::put().to(service::update_service))
            .route("/service/{name}/delete", web::delete().to(service::remove_service))
            .route("/service/{name}/ping", web::get().to(ping::ping_service)),
    );
}
