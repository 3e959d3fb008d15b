pub mod auth;
pub mod dashboard;
pub mod navigation;
pub mod profiles;
