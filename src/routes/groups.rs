use actix_web::web;

use crate::handlers::groups;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/groups")
            .route("", web::get().to(groups::list))
            .route("", web::post().to(groups::create))
            .route("/{group}", web::get().to(groups::get))
            .route("/{group}", web::put().to(groups::update))
            .route("/{group}", web::delete().to(groups::delete))
            .route("/{group}/flags/{flag}", web::put().to(groups::assign_flag))
            .route(
                "/{group}/flags/{flag}",
                web::delete().to(groups::unassign_flag),
            ),
    );
}
