use actix_web::web;

use crate::handlers::calculations;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/calculations").route("/sipe", web::post().to(calculations::sipe)));
}
