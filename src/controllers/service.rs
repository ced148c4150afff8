use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;

use crate::errors::{BulkServiceError, ServiceError};
use crate::models::{ServiceConfig, ServiceRef};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddServiceQuery {
    pub url: String,
    #[serde(default = "default_ping")]
    pub ping: bool,
}

fn default_ping() -> bool {
    true
}

// List all registered services
pub async fn list_services(data: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    info!("Request to list all services");
    let services = data.registry.list().await?;
    info!("Returning list of {} services", services.len());

    Ok(HttpResponse::Ok().json(services))
}

pub async fn get_service(
    data: web::Data<AppState>,
    service_name: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let name = service_name.into_inner();
    info!("Request for configuration of service: {}", name);

    let service = data.registry.get(&name).await?;
    Ok(HttpResponse::Ok().json(service))
}

// Register a new service to monitor
pub async fn add_service(
    data: web::Data<AppState>,
    service_name: web::Path<String>,
    query: web::Query<AddServiceQuery>,
) -> Result<HttpResponse, ServiceError> {
    let name = service_name.into_inner();
    let query = query.into_inner();
    info!("Request to register service: {}", name);

    let service = ServiceConfig::new(name, query.url).with_auto_ping(query.ping);
    let added = data.registry.add(service).await?;

    Ok(HttpResponse::Created().json(added))
}

pub async fn add_services(
    data: web::Data<AppState>,
    services: web::Json<Vec<ServiceConfig>>,
) -> Result<HttpResponse, BulkServiceError<ServiceConfig>> {
    let services = services.into_inner();
    info!("Request to register {} services", services.len());

    let added = data.bulk.add_all(services).await?;
    Ok(HttpResponse::Created().json(added))
}

pub async fn update_service(
    data: web::Data<AppState>,
    service_name: web::Path<String>,
    service: web::Json<ServiceConfig>,
) -> Result<HttpResponse, ServiceError> {
    let name = service_name.into_inner();
    info!("Request to update service: {}", name);

    let updated = data
        .registry
        .update(&ServiceRef::new(name), service.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

// Remove a service from monitoring
pub async fn remove_service(
    data: web::Data<AppState>,
    service_name: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let name = service_name.into_inner();
    info!("Request to remove service: {}", name);

    let removed = data.registry.delete(&ServiceRef::new(name)).await?;
    Ok(HttpResponse::Ok().json(removed))
}

pub async fn remove_services(
    data: web::Data<AppState>,
    services: web::Json<Vec<ServiceRef>>,
) -> Result<HttpResponse, BulkServiceError<ServiceConfig>> {
    let services = services.into_inner();
    info!("Request to remove {} services", services.len());

    let removed = data.bulk.delete_all(services).await?;
    Ok(HttpResponse::Ok().json(removed))
}
