//! # Shoky Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: session token signing configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`session`]: profile resolution retry policy for the auth context
//! - [`server`]: listener address
//!
//! Every struct exposes `from_env()` and falls back to development defaults,
//! except `DATABASE_URL` which is read by `shoky-db` and is required.
//!
//! # Example
//!
//! ```ignore
//! use shoky_config::{CorsConfig, JwtConfig, ServerConfig, SessionConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let session_config = SessionConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! println!("listening on {}", server_config.address());
//! ```

pub mod cors;
pub mod jwt;
pub mod server;
pub mod session;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;
