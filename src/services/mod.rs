mod auth_service;
mod community_service;
mod dashboard_service;
mod directory_service;
mod membership_service;
mod token_denylist;
mod user_service;

pub use auth_service::*;
pub use community_service::*;
pub use dashboard_service::*;
pub use directory_service::*;
pub use membership_service::*;
pub use token_denylist::*;
pub use user_service::*;
