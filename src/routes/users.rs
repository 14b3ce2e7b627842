use actix_web::web;

use crate::handlers::users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(users::list))
            .route("", web::post().to(users::create))
            .route("/{user}", web::get().to(users::get))
            .route("/{user}", web::put().to(users::update))
            .route("/{user}", web::delete().to(users::delete))
            .route("/{user}/flags/{flag}", web::put().to(users::assign_flag))
            .route(
                "/{user}/flags/{flag}",
                web::delete().to(users::unassign_flag),
            ),
    );
}
