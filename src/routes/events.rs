use actix_web::web;

use crate::handlers::events;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/events").route("", web::post().to(events::generate)));
}
