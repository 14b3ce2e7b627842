pub mod auth;
pub mod holidays;
pub mod two_factor;

pub use auth::{AccessToken, AuthService};
pub use holidays::HolidayService;
