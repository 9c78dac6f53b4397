pub mod login;
pub mod viewer;
