pub mod access;
pub mod setting;
pub mod user;

pub use access::{
    AccessFlag, AccessGroup, CreateGroupInput, FlagInfo, GroupDetail, GroupInfo, UpdateGroupInput,
};
pub use setting::Setting;
pub use user::{
    CreateUserInput, CreatedUserInfo, LoginInput, ResolvedUser, UpdateUserInput, User, UserInfo,
};
