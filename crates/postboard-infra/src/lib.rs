//! # Postboard Infrastructure
//!
//! Concrete implementations of the ports defined in `postboard-core`.
//! This crate contains the database, credential and file storage integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store only
//! - `postgres` - PostgreSQL persistence via SeaORM
//! - `auth` - JWT tokens plus bcrypt/Argon2 password hashing

pub mod database;
pub mod memory;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::DatabaseConnections;
pub use memory::{InMemoryDatabase, InMemoryPostRepository, InMemoryUserRepository};
pub use storage::LocalImageStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, BcryptPasswordService, JwtConfig, JwtTokenService};
