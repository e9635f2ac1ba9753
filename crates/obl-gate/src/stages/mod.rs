pub mod email;
pub mod role;

pub use email::EmailStage;
pub use role::RoleStage;
