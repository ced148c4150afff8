use actix_web::{web, HttpResponse};
use log::info;

use crate::errors::{BulkServiceError, ServiceError};
use crate::models::{PingResult, PingTarget};
use crate::state::AppState;

pub async fn ping_service(
    data: web::Data<AppState>,
    service_name: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let name = service_name.into_inner();
    info!("Request to ping service: {}", name);

    let result = data.prober.ping_by_name(&name).await?;
    Ok(HttpResponse::Ok().json(result))
}

// Targets without a url are looked up in the registry
pub async fn ping_services(
    data: web::Data<AppState>,
    targets: web::Json<Vec<PingTarget>>,
) -> Result<HttpResponse, BulkServiceError<PingResult>> {
    let targets = targets.into_inner();
    info!("Request to ping {} services", targets.len());

    let results = data.bulk.probe_all(targets).await?;
    Ok(HttpResponse::Ok().json(results))
}
