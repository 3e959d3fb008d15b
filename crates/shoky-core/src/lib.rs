//! # Shoky Core
//!
//! Foundational types shared by every Shoky Hub crate:
//!
//! - [`errors`]: the HTTP-aware [`AppError`] used by handlers and services
//! - [`password`]: bcrypt hashing and verification for stored credentials
//!
//! # Example
//!
//! ```ignore
//! use shoky_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("correct horse battery staple")?;
//! if !verify_password("guess", &hash)? {
//!     return Err(AppError::unauthorized("Invalid email or password".to_string()));
//! }
//! ```

pub mod errors;
pub mod password;

pub use errors::AppError;
pub use password::{hash_password, verify_password};
