use actix_web::{HttpResponse, web};
use serde::Serialize;

pub mod auth;
pub mod events;
pub mod flags;
pub mod groups;
pub mod holidays;
pub mod system;
pub mod users;

use crate::handlers;
use crate::handlers::shared::ApiResponse;

/// Route metadata served by `GET /api`.
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub endpoint: &'static str,
    pub description: &'static str,
}

pub fn describe() -> Vec<RouteInfo> {
    let route = |method, endpoint, description| RouteInfo {
        method,
        endpoint,
        description,
    };

    vec![
        route("GET", "/api", "Get all available endpoints"),
        route("GET", "/api/statistics", "Get the platform statistics"),
        route("GET", "/api/holidays", "Get the holidays for a country"),
        route("GET", "/api/system", "Get the current system configuration"),
        route(
            "PUT",
            "/api/system",
            "Update the current system configuration. Each field represents a new or updated setting",
        ),
        route(
            "PUT",
            "/api/system/{setting}/{value}",
            "Update the current system configuration",
        ),
        route(
            "DELETE",
            "/api/system",
            "Remove settings from the current system configuration",
        ),
        route("GET", "/api/users", "Get a list of all the users"),
        route("POST", "/api/users", "Create a new user"),
        route("GET", "/api/users/{user}", "Get data about a certain user"),
        route("PUT", "/api/users/{user}", "Update the data of a certain user"),
        route("DELETE", "/api/users/{user}", "Delete a certain user"),
        route(
            "PUT",
            "/api/users/{user}/flags/{flag}",
            "Assign an individual flag to a certain user",
        ),
        route(
            "DELETE",
            "/api/users/{user}/flags/{flag}",
            "Unassign an individual flag from a certain user",
        ),
        route("GET", "/api/groups", "Get a list of all the access groups"),
        route("POST", "/api/groups", "Create a new access group"),
        route(
            "GET",
            "/api/groups/{group}",
            "Get data about a certain access group",
        ),
        route(
            "PUT",
            "/api/groups/{group}",
            "Update the data of a certain group",
        ),
        route("DELETE", "/api/groups/{group}", "Delete a group"),
        route(
            "PUT",
            "/api/groups/{group}/flags/{flag}",
            "Assign an access flag to an access group",
        ),
        route(
            "DELETE",
            "/api/groups/{group}/flags/{flag}",
            "Unassign an access flag from an access group",
        ),
        route("GET", "/api/flags", "Get all access flags"),
        route(
            "POST",
            "/api/events",
            "Generate a list of work events from an input",
        ),
        route(
            "GET",
            "/api/auth",
            "Get the user data associated with an access token",
        ),
        route("POST", "/api/auth", "Generate an access token"),
    ]
}

async fn index() -> HttpResponse {
    ApiResponse::success(describe())
}

/// Unknown /api routes respond with the envelope rather than a bare 404.
async fn fallback() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error("Bad Request"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("", web::get().to(index))
            .route("/statistics", web::get().to(handlers::system::statistics))
            .configure(auth::configure)
            .configure(holidays::configure)
            .configure(system::configure)
            .configure(users::configure)
            .configure(groups::configure)
            .configure(flags::configure)
            .configure(events::configure)
            .default_service(web::route().to(fallback)),
    );
}
