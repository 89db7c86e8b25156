use actix_web::{HttpResponse, Responder, web};

pub mod calculations;
pub mod payroll;

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).service(
        web::scope("/api/v1")
            .configure(payroll::configure)
            .configure(calculations::configure),
    );
}
