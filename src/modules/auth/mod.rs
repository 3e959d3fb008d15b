pub mod controller;
pub mod provider;
pub mod router;
pub mod service;
