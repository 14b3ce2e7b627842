use actix_web::web;

use crate::handlers::flags;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/flags").route("", web::get().to(flags::list)));
}
