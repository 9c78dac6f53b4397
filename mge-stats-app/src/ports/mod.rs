pub mod identity;
pub mod steam_profile;
