use actix_web::{HttpResponse, Responder};

// Liveness of this service itself, not of the monitored ones
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json("OK")
}
