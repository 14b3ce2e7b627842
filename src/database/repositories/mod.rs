pub mod access;
pub mod settings;
pub mod user;

pub use access::{AccessFlagRepository, AccessGroupRepository};
pub use settings::SettingsRepository;
pub use user::UserRepository;
