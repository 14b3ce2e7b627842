use actix_web::web;

use crate::handlers::holidays;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/holidays").route("", web::get().to(holidays::lookup)));
}
