use actix_web::web;

use crate::handlers::system;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/system")
            .route("", web::get().to(system::get_settings))
            .route("", web::put().to(system::put_settings))
            .route("", web::delete().to(system::delete_settings))
            .route(
                "/{setting}/{value}",
                web::put().to(system::put_setting),
            ),
    );
}
