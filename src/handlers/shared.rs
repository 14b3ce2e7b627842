use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// Response envelope used by every endpoint: `payload` and `error` are always
/// present, serialized as `null` when absent.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub payload: Option<T>,
    pub error: Option<String>,
    pub status: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(payload: T) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            payload: Some(payload),
            error: None,
            status: true,
        })
    }
}

impl ApiResponse<()> {
    /// Success with a null payload, e.g. after a delete.
    pub fn empty() -> HttpResponse {
        HttpResponse::Ok().json(Self {
            payload: None,
            error: None,
            status: true,
        })
    }

    pub fn error(message: &str) -> Self {
        Self {
            payload: None,
            error: Some(message.to_string()),
            status: false,
        }
    }
}
