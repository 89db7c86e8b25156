use actix_web::web;

use crate::handlers::payroll;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payroll")
            .route("/calculate", web::post().to(payroll::calculate))
            .route("/runs", web::post().to(payroll::run_company))
            .route("/runs/paid", web::post().to(payroll::mark_paid))
            .route("/entries", web::get().to(payroll::list_entries)),
    );
}
