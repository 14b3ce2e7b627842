pub mod auth;
pub mod events;
pub mod flags;
pub mod groups;
pub mod holidays;
pub mod shared;
pub mod system;
pub mod users;
